use std::f64::consts::PI;

/// Overshoot constant of the back easings.
const BACK_C1: f64 = 1.70158;

/// Easing functions used to map normalized animation progress.
///
/// Input is clamped to `[0, 1]`; the output is not (back easings overshoot, `ThereAndBack`
/// returns to `0`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Smoothstep `3t² - 2t³`.
    #[default]
    Smooth,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    InOutSine,
    /// Pulls back below `0` before accelerating.
    InBack,
    /// Overshoots `1` before settling.
    OutBack,
    /// Goes `0 -> 1 -> 0` with a smooth profile.
    ThereAndBack,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        // Exact endpoints: scene membership is decided by comparing eased progress to 0 and 1.
        if t == 0.0 {
            return 0.0;
        }
        if t == 1.0 {
            return if self == Self::ThereAndBack { 0.0 } else { 1.0 };
        }
        match self {
            Self::Linear => t,
            Self::Smooth => t * t * (3.0 - 2.0 * t),
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::InBack => {
                let c3 = BACK_C1 + 1.0;
                c3 * t * t * t - BACK_C1 * t * t
            }
            Self::OutBack => {
                let c3 = BACK_C1 + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u * u * u + BACK_C1 * u * u
            }
            Self::ThereAndBack => {
                let u = if t < 0.5 { 2.0 * t } else { 2.0 - 2.0 * t };
                u * u * (3.0 - 2.0 * u)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
