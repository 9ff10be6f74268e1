use kurbo::{Affine, BezPath, Point, Vec2};

use crate::foundation::math::normalized;
use crate::geom::object::{Arrow, MathObject};
use crate::geom::shape::Shape;
use crate::style::props::Style;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelimiterKind {
    Brace,
    Bracket,
    Parenthesis,
    /// Double-headed measuring arrow.
    LengthArrow,
}

/// Placement of a delimiter along the segment `a`-`b`.
///
/// The delimiter sits on the right-hand side of the direction `a -> b` (below a left-to-right
/// segment), `gap` units away from it, and reaches `amplitude` units further out.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DelimiterPlacement {
    pub kind: DelimiterKind,
    #[serde(default = "default_gap")]
    pub gap: f64,
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
}

fn default_gap() -> f64 {
    0.1
}

fn default_amplitude() -> f64 {
    0.2
}

impl DelimiterPlacement {
    pub fn new(kind: DelimiterKind) -> Self {
        Self {
            kind,
            gap: default_gap(),
            amplitude: default_amplitude(),
        }
    }

    /// Local frame: x runs from `a` to `b`, y points away from the segment.
    fn frame(&self, a: Point, b: Point) -> Option<(Affine, f64)> {
        let dir = normalized(b - a)?;
        let out = Vec2::new(dir.y, -dir.x);
        let origin = a + out * self.gap;
        let affine = Affine::new([dir.x, dir.y, out.x, out.y, origin.x, origin.y]);
        Some((affine, a.distance(b)))
    }

    /// Delimiter geometry for `a`-`b`. Coincident points give an empty shape.
    pub fn build(&self, a: Point, b: Point) -> MathObject {
        let Some((frame, len)) = self.frame(a, b) else {
            return MathObject::Shape(Shape::empty(Style::default()));
        };
        let amp = self.amplitude.max(0.0);
        let mut path = BezPath::new();
        match self.kind {
            DelimiterKind::Bracket => {
                path.move_to((0.0, 0.0));
                path.line_to((0.0, amp));
                path.line_to((len, amp));
                path.line_to((len, 0.0));
            }
            DelimiterKind::Parenthesis => {
                path.move_to((0.0, 0.0));
                path.quad_to((0.5 * len, 2.0 * amp), (len, 0.0));
            }
            DelimiterKind::Brace => {
                let mid = 0.5 * amp;
                let w = amp.min(0.25 * len);
                let half = 0.5 * len;
                path.move_to((0.0, 0.0));
                path.quad_to((0.0, mid), (w, mid));
                path.line_to((half - w, mid));
                path.quad_to((half, mid), (half, amp));
                path.quad_to((half, mid), (half + w, mid));
                path.line_to((len - w, mid));
                path.quad_to((len, mid), (len, 0.0));
            }
            DelimiterKind::LengthArrow => {
                let y = 0.5 * amp;
                let head = amp.min(0.25 * len);
                let arrow = Arrow::between(
                    frame * Point::new(0.0, y),
                    frame * Point::new(len, y),
                    head,
                    true,
                    &Style::default(),
                );
                return MathObject::Arrow(arrow);
            }
        }
        path.apply_affine(frame);
        MathObject::Shape(Shape::new(path, Style::default()))
    }

    /// Anchor point `distance` units beyond the outermost point of the delimiter, at the middle
    /// of the segment. Coincident points give `a` shifted by the gap downwards.
    pub fn tip(&self, a: Point, b: Point, distance: f64) -> Point {
        match self.frame(a, b) {
            Some((frame, len)) => frame * Point::new(0.5 * len, self.amplitude.max(0.0) + distance),
            None => a - Vec2::new(0.0, self.gap + self.amplitude.max(0.0) + distance),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/construct/delimiter.rs"]
mod tests;
