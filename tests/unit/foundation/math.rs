use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn circumcircle_of_right_triangle_is_centered_on_hypotenuse() {
    let c = circumcircle(
        Point::new(0.0, 0.0),
        Point::new(2.0, 0.0),
        Point::new(0.0, 2.0),
    );
    assert!(!c.degenerate);
    assert!(close(c.center.x, 1.0));
    assert!(close(c.center.y, 1.0));
    assert!(close(c.radius, 2f64.sqrt()));
}

#[test]
fn collinear_points_give_degenerate_circle_at_centroid() {
    let c = circumcircle(
        Point::new(0.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(2.0, 2.0),
    );
    assert!(c.degenerate);
    assert_eq!(c.radius, 0.0);
    assert!(close(c.center.x, 1.0));
    assert!(c.center.x.is_finite() && c.center.y.is_finite());
}

#[test]
fn parallel_lines_do_not_intersect() {
    let p = line_intersection(
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 1.0),
        Point::new(1.0, 1.0),
    );
    assert!(p.is_none());
}

#[test]
fn crossing_lines_intersect() {
    let p = line_intersection(
        Point::new(-1.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(0.5, -1.0),
        Point::new(0.5, 1.0),
    )
    .unwrap();
    assert!(close(p.x, 0.5));
    assert!(close(p.y, 0.0));
}

#[test]
fn bisector_of_right_angle_is_diagonal() {
    let d = angle_bisector(
        Point::new(1.0, 0.0),
        Point::new(0.0, 0.0),
        Point::new(0.0, 3.0),
    );
    assert!(close(d.x, d.y));
    assert!(close(d.hypot(), 1.0));
}

#[test]
fn coincident_points_give_vertical_perpendicular_bisector() {
    let (p, d) = perpendicular_bisector(Point::new(1.0, 2.0), Point::new(1.0, 2.0));
    assert_eq!(p, Point::new(1.0, 2.0));
    assert_eq!(d, Vec2::new(0.0, 1.0));
}

#[test]
fn ellipse_through_vertex_has_expected_axes() {
    let e = ellipse_from_foci(
        Point::new(-1.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(2.0, 0.0),
    );
    assert!(close(e.semi_major, 2.0));
    assert!(close(e.semi_minor, 3f64.sqrt()));
    assert!(close(e.rotation, 0.0));
}

#[test]
fn point_on_focal_segment_gives_flat_ellipse() {
    let e = ellipse_from_foci(
        Point::new(-1.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 0.0),
    );
    assert_eq!(e.semi_minor, 0.0);
}
