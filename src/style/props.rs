use serde::{Deserialize, Serialize};

use crate::style::color::Color;

/// Drawing properties attached to every drawable object.
///
/// The animation core treats this bundle as opaque data: it copies, merges and interpolates it
/// but only ever asks whether a fill is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub stroke: Color,
    pub fill: Color,
    /// Stroke width in pixels.
    pub thickness: f64,
    /// Radius of point markers in pixels.
    pub dot_radius: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: Color::WHITE,
            fill: Color::TRANSPARENT,
            thickness: 2.0,
            dot_radius: 3.0,
        }
    }
}

impl Style {
    pub fn stroked(stroke: Color, thickness: f64) -> Self {
        Self {
            stroke,
            thickness,
            ..Self::default()
        }
    }

    pub fn filled(fill: Color) -> Self {
        Self {
            stroke: fill,
            fill,
            thickness: 0.0,
            ..Self::default()
        }
    }

    pub fn copy_from(&mut self, other: &Style) {
        self.clone_from(other);
    }

    pub fn merge(&mut self, patch: &StylePatch) {
        if let Some(c) = patch.stroke {
            self.stroke = c;
        }
        if let Some(c) = patch.fill {
            self.fill = c;
        }
        if let Some(t) = patch.thickness {
            self.thickness = t;
        }
        if let Some(r) = patch.dot_radius {
            self.dot_radius = r;
        }
    }

    pub fn has_fill(&self) -> bool {
        self.fill.a > 0.0
    }

    pub fn fill_alpha(&self) -> f64 {
        self.fill.a
    }

    pub fn has_stroke(&self) -> bool {
        self.stroke.a > 0.0 && self.thickness > 0.0
    }

    /// Multiply both stroke and fill alpha by `k`.
    pub fn with_alpha_scale(&self, k: f64) -> Self {
        let mut out = self.clone();
        out.stroke.a *= k;
        out.fill.a *= k;
        out
    }

    pub fn lerp(&self, other: &Style, t: f64) -> Self {
        Self {
            stroke: self.stroke.lerp(other.stroke, t),
            fill: self.fill.lerp(other.fill, t),
            thickness: self.thickness + (other.thickness - self.thickness) * t,
            dot_radius: self.dot_radius + (other.dot_radius - self.dot_radius) * t,
        }
    }
}

/// Partial style used to override selected fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePatch {
    pub stroke: Option<Color>,
    pub fill: Option<Color>,
    pub thickness: Option<f64>,
    pub dot_radius: Option<f64>,
}
