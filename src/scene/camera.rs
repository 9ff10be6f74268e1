use kurbo::{Affine, Point, Rect, Vec2};

use crate::foundation::core::Canvas;
use crate::foundation::error::{GeomotionError, GeomotionResult};

/// Maps the math view rectangle onto the pixel canvas (y axis up in math space).
///
/// The scale is uniform: the view is fitted inside the canvas and centred, so the visible math
/// region may be larger than `view` along one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    view: Rect,
    canvas: Canvas,
    scale: f64,
}

impl Camera {
    pub fn new(view: Rect, canvas: Canvas) -> GeomotionResult<Self> {
        let view = view.abs();
        if !(view.width() > 0.0 && view.height() > 0.0) {
            return Err(GeomotionError::validation(
                "camera view must have positive width and height",
            ));
        }
        if canvas.width == 0 || canvas.height == 0 {
            return Err(GeomotionError::validation("canvas must be non-empty"));
        }
        let sx = f64::from(canvas.width) / view.width();
        let sy = f64::from(canvas.height) / view.height();
        Ok(Self {
            view,
            canvas,
            scale: sx.min(sy),
        })
    }

    pub fn view(&self) -> Rect {
        self.view
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Pixels per math unit.
    pub fn pixels_per_unit(&self) -> f64 {
        self.scale
    }

    /// Math-to-pixel transform.
    pub fn math_to_pixel(&self) -> Affine {
        let s = self.scale;
        let c = self.view.center();
        let half_w = 0.5 * f64::from(self.canvas.width);
        let half_h = 0.5 * f64::from(self.canvas.height);
        Affine::new([s, 0.0, 0.0, -s, half_w - c.x * s, half_h + c.y * s])
    }

    pub fn pixel_to_math(&self, p: Point) -> Point {
        self.math_to_pixel().inverse() * p
    }

    /// Whole math region covered by the canvas.
    pub fn visible_rect(&self) -> Rect {
        let inv = self.math_to_pixel().inverse();
        let w = f64::from(self.canvas.width);
        let h = f64::from(self.canvas.height);
        Rect::from_points(inv * Point::new(0.0, 0.0), inv * Point::new(w, h))
    }

    /// Clip the infinite line through `a` and `b` to [`Camera::visible_rect`].
    ///
    /// Returns `None` for coincident points or a line missing the view.
    pub fn clip_line(&self, a: Point, b: Point) -> Option<(Point, Point)> {
        let d: Vec2 = b - a;
        if d.hypot() <= 1e-12 {
            return None;
        }
        let r = self.visible_rect();
        let mut t0 = f64::NEG_INFINITY;
        let mut t1 = f64::INFINITY;
        for (p, q) in [
            (-d.x, a.x - r.x0),
            (d.x, r.x1 - a.x),
            (-d.y, a.y - r.y0),
            (d.y, r.y1 - a.y),
        ] {
            if p.abs() <= 1e-12 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
        }
        if t0 > t1 {
            return None;
        }
        Some((a + d * t0, a + d * t1))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/camera.rs"]
mod tests;
