use kurbo::{Affine, Point, Vec2};

use crate::style::color::Color;
use crate::style::props::Style;

/// Interpolation contract for animated value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with factor `t`. `t` may leave `[0, 1]` under overshooting
    /// easings.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Color {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.lerp(*b, t)
    }
}

impl Lerp for Style {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.lerp(b, t)
    }
}

/// Coefficient-wise interpolation.
impl Lerp for Affine {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let ca = a.as_coeffs();
        let cb = b.as_coeffs();
        let mut out = [0.0; 6];
        for (i, o) in out.iter_mut().enumerate() {
            *o = ca[i] + (cb[i] - ca[i]) * t;
        }
        Affine::new(out)
    }
}
