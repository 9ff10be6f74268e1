use kurbo::{Affine, BezPath, Point, Rect, Shape as _, Vec2};

use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::style::props::Style;

/// Flattening tolerance used when converting analytic shapes to Bézier paths.
pub const SHAPE_TOLERANCE: f64 = 1e-4;

/// A styled Bézier path in math coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub path: BezPath,
    pub style: Style,
}

impl Shape {
    pub fn new(path: BezPath, style: Style) -> Self {
        Self { path, style }
    }

    pub fn empty(style: Style) -> Self {
        Self::new(BezPath::new(), style)
    }

    /// Nothing to draw, but the path still starts at `anchor`.
    pub fn empty_at(anchor: Point, style: Style) -> Self {
        let mut path = BezPath::new();
        path.move_to(anchor);
        Self::new(path, style)
    }

    pub fn segment(a: Point, b: Point) -> Self {
        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        Self::new(path, Style::default())
    }

    pub fn polyline(points: &[Point]) -> Self {
        let mut path = BezPath::new();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                path.move_to(*p);
            } else {
                path.line_to(*p);
            }
        }
        Self::new(path, Style::default())
    }

    pub fn polygon(points: &[Point]) -> Self {
        let mut shape = Self::polyline(points);
        if !points.is_empty() {
            shape.path.close_path();
        }
        shape
    }

    /// Regular polygon with `sides` vertices, the first one at angle 0.
    pub fn regular_polygon(center: Point, radius: f64, sides: usize) -> Self {
        let sides = sides.max(3);
        let points: Vec<Point> = (0..sides)
            .map(|i| {
                let th = std::f64::consts::TAU * (i as f64) / (sides as f64);
                center + Vec2::from_angle(th) * radius
            })
            .collect();
        Self::polygon(&points)
    }

    /// Circle of `radius` around `center`. A zero or negative radius gives an empty path.
    pub fn circle(center: Point, radius: f64) -> Self {
        if radius <= 0.0 || !radius.is_finite() {
            return Self::empty(Style::default());
        }
        let path = kurbo::Circle::new(center, radius).to_path(SHAPE_TOLERANCE);
        Self::new(path, Style::default())
    }

    pub fn ellipse(center: Point, radii: Vec2, rotation: f64) -> Self {
        let path = kurbo::Ellipse::new(center, radii, rotation).to_path(SHAPE_TOLERANCE);
        Self::new(path, Style::default())
    }

    pub fn arc(center: Point, radius: f64, start_angle: f64, sweep: f64) -> Self {
        let arc = kurbo::Arc::new(center, Vec2::new(radius, radius), start_angle, sweep, 0.0);
        let mut path = BezPath::new();
        path.move_to(center + Vec2::from_angle(start_angle) * radius);
        arc.to_cubic_beziers(SHAPE_TOLERANCE, |p1, p2, p3| path.curve_to(p1, p2, p3));
        Self::new(path, Style::default())
    }

    pub fn rectangle(rect: Rect) -> Self {
        Self::new(rect.to_path(SHAPE_TOLERANCE), Style::default())
    }

    /// Parse an SVG path `d` attribute.
    pub fn from_svg_path(d: &str) -> GeomotionResult<Self> {
        let path = BezPath::from_svg(d)
            .map_err(|e| GeomotionError::validation(format!("invalid svg path data: {e}")))?;
        Ok(Self::new(path, Style::default()))
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.path.segments().next().is_none()
    }

    /// Bounding box, `None` for an empty path.
    pub fn bounds(&self) -> Option<Rect> {
        if self.is_empty() {
            return None;
        }
        Some(self.path.bounding_box())
    }

    pub fn apply_affine(&mut self, affine: Affine) {
        self.path.apply_affine(affine);
    }

    /// First point of the path, if any.
    pub fn start_point(&self) -> Option<Point> {
        match self.path.elements().first() {
            Some(kurbo::PathEl::MoveTo(p)) => Some(*p),
            _ => None,
        }
    }
}
