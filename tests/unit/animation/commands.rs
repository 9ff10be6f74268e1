use super::*;
use crate::animation::animation::Animation;
use crate::animation::ease::Ease;
use crate::construct::construction::Construction;
use crate::geom::shape::Shape;
use crate::scene::config::SceneConfig;
use crate::style::color::Color;
use kurbo::Rect;

fn scene() -> Scene {
    Scene::new(SceneConfig::default()).unwrap()
}

fn pos(scene: &Scene, id: ObjectId) -> Point {
    scene.object(id).and_then(MathObject::as_point).unwrap()
}

fn near(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn replaying_a_progress_gives_the_same_state() {
    let mut s = scene();
    let a = s.add_object(MathObject::point(Point::new(1.0, 1.0)));
    let mut anim = Animation::shift(vec![a], Vec2::new(2.0, 0.0), 1.0).with_ease(Ease::Linear);
    anim.initialize(&mut s);
    anim.do_anim(0.5, &mut s);
    anim.do_anim(0.5, &mut s);
    assert!(near(pos(&s, a), Point::new(2.0, 1.0)));
    anim.do_anim(0.25, &mut s);
    assert!(near(pos(&s, a), Point::new(1.5, 1.0)));
}

#[test]
fn scale_defaults_to_the_bounding_box_centre() {
    let op = CommandOp::Scale {
        factor: 2.0,
        center: None,
    };
    let square = MathObject::Shape(Shape::rectangle(Rect::new(0.0, 0.0, 2.0, 2.0)));
    let b = op.apply(&square, 1.0).bounding_box().unwrap();
    assert!((b.x0 + 1.0).abs() < 1e-9 && (b.x1 - 3.0).abs() < 1e-9, "{b:?}");
    assert_eq!(op.apply(&square, 0.0), square);
}

#[test]
fn rotate_about_an_explicit_centre() {
    let op = CommandOp::Rotate {
        angle: std::f64::consts::FRAC_PI_2,
        center: Some(Point::ORIGIN),
    };
    let p = op
        .apply(&MathObject::point(Point::new(1.0, 0.0)), 1.0)
        .as_point()
        .unwrap();
    assert!(near(p, Point::new(0.0, 1.0)), "{p:?}");
}

#[test]
fn affine_interpolates_from_identity() {
    let op = CommandOp::Affine(Affine::translate((4.0, 0.0)));
    let p = op
        .apply(&MathObject::point(Point::ORIGIN), 0.5)
        .as_point()
        .unwrap();
    assert!(near(p, Point::new(2.0, 0.0)), "{p:?}");
}

#[test]
fn set_style_blends_colours() {
    let op = CommandOp::SetStyle(Style::stroked(Color::rgb(1.0, 0.0, 0.0), 4.0));
    let obj = MathObject::Shape(
        Shape::segment(Point::ORIGIN, Point::new(1.0, 0.0))
            .with_style(Style::stroked(Color::rgb(0.0, 0.0, 1.0), 2.0)),
    );
    let style = op.apply(&obj, 0.5).style().cloned().unwrap();
    assert!((style.stroke.r - 0.5).abs() < 1e-9);
    assert!((style.stroke.b - 0.5).abs() < 1e-9);
    assert!((style.thickness - 3.0).abs() < 1e-9);
}

#[test]
fn fade_in_adds_its_targets() {
    let mut s = scene();
    let a = s.insert(MathObject::point(Point::ORIGIN));
    let mut anim = Animation::fade_in(vec![a], 1.0).with_ease(Ease::Linear);
    anim.initialize(&mut s);
    assert!(s.contains(a));
    assert_eq!(s.object(a).and_then(MathObject::style).unwrap().fill.a, 0.0);
    anim.finish(&mut s);
    assert_eq!(s.object(a).and_then(MathObject::style).unwrap().fill.a, 1.0);
}

#[test]
fn fade_out_hides_and_restores_the_object() {
    let mut s = scene();
    let a = s.add_object(MathObject::point(Point::ORIGIN));
    let mut anim = Animation::fade_out(vec![a], 1.0);
    anim.initialize(&mut s);
    anim.process(&mut s);
    assert!(s.contains(a));
    anim.finish(&mut s);
    assert!(!s.contains(a));
    // Adding it back shows the original style.
    s.add(a);
    assert_eq!(s.object(a).and_then(MathObject::style).unwrap().fill.a, 1.0);
}

#[test]
fn derived_targets_are_free_while_commanded() {
    let mut s = scene();
    let a = s.insert(MathObject::point(Point::new(0.0, 0.0)));
    let b = s.insert(MathObject::point(Point::new(2.0, 0.0)));
    let m = s.construct(Construction::MidPoint { a, b }).unwrap();

    let mut anim = Animation::shift(vec![m], Vec2::new(0.0, 1.0), 1.0);
    anim.initialize(&mut s);
    assert!(s.is_free(m));
    anim.finish(&mut s);
    s.update();
    assert!(!s.is_free(m));
    // Released back to its construction, the midpoint snaps back.
    assert!(near(pos(&s, m), Point::new(1.0, 0.0)));
}

#[test]
fn command_without_targets_is_skipped() {
    let mut s = scene();
    let mut anim = Animation::shift(Vec::new(), Vec2::new(1.0, 0.0), 1.0);
    assert!(!anim.initialize(&mut s));
    let mut unknown = Animation::fade_in(vec![ObjectId(7)], 1.0);
    assert!(!unknown.initialize(&mut s));
}
