use super::*;

#[test]
fn bracket_sits_below_left_to_right_segment() {
    let mut p = DelimiterPlacement::new(DelimiterKind::Bracket);
    p.gap = 0.5;
    p.amplitude = 1.0;
    let obj = p.build(Point::ORIGIN, Point::new(4.0, 0.0));
    let b = obj.bounding_box().unwrap();
    assert!((b.y1 + 0.5).abs() < 1e-12);
    assert!((b.y0 + 1.5).abs() < 1e-12);
    assert!((b.width() - 4.0).abs() < 1e-12);
}

#[test]
fn tip_is_beyond_the_delimiter() {
    let p = DelimiterPlacement {
        kind: DelimiterKind::Brace,
        gap: 0.1,
        amplitude: 0.2,
    };
    let tip = p.tip(Point::ORIGIN, Point::new(2.0, 0.0), 0.3);
    assert!((tip.x - 1.0).abs() < 1e-12);
    assert!((tip.y + 0.6).abs() < 1e-12);
}

#[test]
fn length_arrow_is_double_headed() {
    let p = DelimiterPlacement::new(DelimiterKind::LengthArrow);
    let MathObject::Arrow(a) = p.build(Point::ORIGIN, Point::new(1.0, 0.0)) else {
        panic!("expected arrow");
    };
    assert!(a.start_head.is_some() && a.end_head.is_some());
}

#[test]
fn coincident_points_give_empty_shape() {
    let p = DelimiterPlacement::new(DelimiterKind::Parenthesis);
    let obj = p.build(Point::ORIGIN, Point::ORIGIN);
    assert!(obj.is_empty());
    assert_eq!(obj.kind(), crate::geom::object::ObjectKind::Shape);
}
