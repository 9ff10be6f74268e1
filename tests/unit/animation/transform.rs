use super::*;
use crate::animation::animation::{Animation, AnimationKind};
use crate::animation::ease::Ease;
use crate::scene::config::SceneConfig;
use kurbo::Rect;

fn scene() -> Scene {
    Scene::new(SceneConfig::default()).unwrap()
}

fn proxy_of(anim: &Animation) -> ObjectId {
    match anim.kind() {
        AnimationKind::Transform(t) => t.proxy().unwrap(),
        other => panic!("unexpected kind {other:?}"),
    }
}

fn square(x0: f64, size: f64) -> Shape {
    Shape::rectangle(Rect::new(x0, 0.0, x0 + size, size))
}

#[test]
fn select_pairs_kinds() {
    use ObjectKind as K;
    assert_eq!(
        TransformStrategy::select(K::Point, K::Point),
        Some(TransformStrategy::PointToPoint)
    );
    assert_eq!(
        TransformStrategy::select(K::Shape, K::Shape),
        Some(TransformStrategy::PointInterpolation)
    );
    assert_eq!(
        TransformStrategy::select(K::Shape, K::MultiShape),
        Some(TransformStrategy::MultiShapeInterpolation)
    );
    assert_eq!(
        TransformStrategy::select(K::Arrow, K::Arrow),
        Some(TransformStrategy::ArrowInterpolation)
    );
    assert_eq!(TransformStrategy::select(K::Point, K::Shape), None);
}

#[test]
fn point_moves_to_its_destiny() {
    let mut s = scene();
    let a = s.add_object(MathObject::point(Point::new(0.0, 0.0)));
    let b = s.insert(MathObject::point(Point::new(2.0, 2.0)));
    let mut anim = Animation::transform(a, b, 1.0).with_ease(Ease::Linear);
    assert!(anim.initialize(&mut s));
    let proxy = proxy_of(&anim);
    assert_eq!(s.visible(), &[a]);

    for _ in 0..15 {
        anim.process(&mut s);
    }
    assert_eq!(s.visible(), &[proxy]);
    let mid = s.object(proxy).and_then(MathObject::as_point).unwrap();
    assert!((mid - Point::new(1.0, 1.0)).hypot() < 1e-9);

    anim.finish(&mut s);
    assert_eq!(s.visible(), &[b]);
    assert!(s.object(proxy).is_none());
    // The origin itself is left untouched.
    assert_eq!(s.object(a).and_then(MathObject::as_point), Some(Point::ORIGIN));
}

#[test]
fn destiny_takes_the_draw_position_of_the_origin() {
    let mut s = scene();
    let below = s.add_object(MathObject::point(Point::ORIGIN));
    let a = s.add_object(MathObject::Shape(square(0.0, 1.0)));
    let above = s.add_object(MathObject::point(Point::ORIGIN));
    let b = s.add_object(MathObject::Shape(square(3.0, 2.0)));
    let mut anim = Animation::transform(a, b, 1.0);
    anim.initialize(&mut s);
    assert_eq!(s.visible(), &[below, a, above]);
    anim.process(&mut s);
    anim.finish(&mut s);
    assert_eq!(s.visible(), &[below, b, above]);
}

#[test]
fn shape_morph_passes_between_the_endpoints() {
    let mut s = scene();
    let a = s.add_object(MathObject::Shape(square(0.0, 1.0)));
    let b = s.insert(MathObject::Shape(square(4.0, 1.0)));
    let mut anim = Animation::transform(a, b, 1.0).with_ease(Ease::Linear);
    anim.initialize(&mut s);
    let proxy = proxy_of(&anim);

    let start = s.object(proxy).and_then(MathObject::bounding_box).unwrap();
    assert!((start.x0 - 0.0).abs() < 1e-9 && (start.x1 - 1.0).abs() < 1e-9);

    for _ in 0..15 {
        anim.process(&mut s);
    }
    let mid = s.object(proxy).and_then(MathObject::bounding_box).unwrap();
    assert!((mid.x0 - 2.0).abs() < 1e-9, "{mid:?}");
    assert!((mid.x1 - 3.0).abs() < 1e-9, "{mid:?}");
}

#[test]
fn unmatched_parts_fade_into_the_destiny_centre() {
    let mut s = scene();
    let a = s.add_object(MathObject::MultiShape(MultiShape {
        shapes: vec![square(0.0, 1.0), square(2.0, 1.0)],
    }));
    let b = s.insert(MathObject::Shape(square(0.0, 1.0)));
    let mut anim = Animation::transform(a, b, 1.0);
    anim.initialize(&mut s);
    let proxy = proxy_of(&anim);
    let Some(MathObject::MultiShape(start)) = s.object(proxy) else {
        panic!("expected a multi shape proxy");
    };
    assert_eq!(start.shapes.len(), 2);
    anim.finish(&mut s);
    assert_eq!(s.visible(), &[b]);
}

#[test]
fn unsupported_pair_is_skipped() {
    let mut s = scene();
    let a = s.add_object(MathObject::point(Point::ORIGIN));
    let b = s.insert(MathObject::Shape(square(0.0, 1.0)));
    let mut anim = Animation::transform(a, b, 1.0);
    assert!(!anim.initialize(&mut s));
    assert_eq!(s.visible(), &[a]);

    let mut forced =
        Animation::transform_with(a, b, TransformStrategy::ArrowInterpolation, 1.0);
    assert!(!forced.initialize(&mut s));
}
