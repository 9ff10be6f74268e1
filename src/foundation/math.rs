use crate::foundation::core::{Point, Vec2};

/// Lengths below this are treated as zero by the geometric helpers.
pub(crate) const GEOM_EPS: f64 = 1e-12;

/// Circle through three points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circumcircle {
    pub center: Point,
    pub radius: f64,
    /// `true` when the points are collinear (or coincident). The circle then collapses to the
    /// centroid with radius `0`.
    pub degenerate: bool,
}

pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::ORIGIN;
    }
    let n = points.len() as f64;
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    (sum / n).to_point()
}

pub fn circumcircle(a: Point, b: Point, c: Point) -> Circumcircle {
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * ab.cross(ac);
    let scale = ab.hypot2().max(ac.hypot2()).max(1.0);
    if d.abs() <= GEOM_EPS * scale {
        return Circumcircle {
            center: centroid(&[a, b, c]),
            radius: 0.0,
            degenerate: true,
        };
    }
    let ux = (ac.y * ab.hypot2() - ab.y * ac.hypot2()) / d;
    let uy = (ab.x * ac.hypot2() - ac.x * ab.hypot2()) / d;
    let center = a + Vec2::new(ux, uy);
    Circumcircle {
        center,
        radius: center.distance(a),
        degenerate: false,
    }
}

/// Unit vector, or `None` for (near) zero-length input.
pub fn normalized(v: Vec2) -> Option<Vec2> {
    let len = v.hypot();
    if len <= GEOM_EPS || !len.is_finite() {
        return None;
    }
    Some(v / len)
}

/// Counter-clockwise normal (`(-y, x)`).
pub fn normal(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Intersection of the infinite lines `p1 + s*(p2-p1)` and `q1 + t*(q2-q1)`.
///
/// Returns `None` when the lines are parallel or one of them is degenerate.
pub fn line_intersection(p1: Point, p2: Point, q1: Point, q2: Point) -> Option<Point> {
    let r = p2 - p1;
    let s = q2 - q1;
    let denom = r.cross(s);
    let scale = r.hypot() * s.hypot();
    if scale <= GEOM_EPS || denom.abs() <= GEOM_EPS * scale {
        return None;
    }
    let t = (q1 - p1).cross(s) / denom;
    Some(p1 + r * t)
}

/// Point and direction of the perpendicular bisector of `a`-`b`.
///
/// Coincident points give a vertical line through `a`.
pub fn perpendicular_bisector(a: Point, b: Point) -> (Point, Vec2) {
    let mid = a.midpoint(b);
    match normalized(b - a) {
        Some(dir) => (mid, normal(dir)),
        None => (mid, Vec2::new(0.0, 1.0)),
    }
}

/// Direction of the bisector of the angle `a`-`vertex`-`c`.
///
/// A zero-length arm falls back to the other arm; two zero-length arms give the x axis.
/// Opposite arms (a straight angle) give the normal of the first arm.
pub fn angle_bisector(a: Point, vertex: Point, c: Point) -> Vec2 {
    match (normalized(a - vertex), normalized(c - vertex)) {
        (Some(u), Some(v)) => normalized(u + v).unwrap_or_else(|| normal(u)),
        (Some(u), None) => u,
        (None, Some(v)) => v,
        (None, None) => Vec2::new(1.0, 0.0),
    }
}

/// Ellipse through `p` with foci `f1`, `f2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocalEllipse {
    pub center: Point,
    pub semi_major: f64,
    pub semi_minor: f64,
    pub rotation: f64,
}

pub fn ellipse_from_foci(f1: Point, f2: Point, p: Point) -> FocalEllipse {
    let center = f1.midpoint(f2);
    let semi_major = 0.5 * (p.distance(f1) + p.distance(f2));
    let c = 0.5 * f1.distance(f2);
    // Rounding can push a^2 - c^2 slightly negative when p lies on the focal segment.
    let semi_minor = (semi_major * semi_major - c * c).max(0.0).sqrt();
    let d = f2 - f1;
    let rotation = if d.hypot() <= GEOM_EPS {
        0.0
    } else {
        d.y.atan2(d.x)
    };
    FocalEllipse {
        center,
        semi_major,
        semi_minor,
        rotation,
    }
}

/// Clamp a finite value into `[0, 1]`; non-finite input maps to `0`.
pub fn clamp01(t: f64) -> f64 {
    if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
