use super::*;
use crate::animation::animation::{Animation, AnimationKind};
use crate::geom::object::InfiniteLine;
use crate::scene::config::SceneConfig;
use crate::style::color::Color;
use kurbo::{Point, Rect};

fn camera() -> Camera {
    let cfg = SceneConfig::default();
    Camera::new(cfg.view, cfg.canvas).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn baseline() -> MathObject {
    let pts: Vec<Point> = (0..5_u32).map(|i| Point::new(f64::from(i), 0.0)).collect();
    MathObject::Shape(Shape::polyline(&pts))
}

fn red_square() -> MathObject {
    MathObject::Shape(
        Shape::rectangle(Rect::new(0.0, 0.0, 1.0, 1.0))
            .with_style(Style::filled(Color::rgb(1.0, 0.0, 0.0))),
    )
}

#[test]
fn select_follows_the_object_kind() {
    let d = CreationDefaults::default();
    assert_eq!(
        CreationStrategy::select(&baseline(), &d),
        Some(CreationStrategy::SimpleShape)
    );
    assert_eq!(
        CreationStrategy::select(&MathObject::point(Point::ORIGIN), &d),
        Some(CreationStrategy::DrawThenFill {
            percent_drawing: d.percent_drawing,
            gap: d.gap
        })
    );
    assert_eq!(
        CreationStrategy::select(&MathObject::Group(Vec::new()), &d),
        Some(CreationStrategy::Composite)
    );
    assert_eq!(CreationStrategy::select(&MathObject::Scalar(1.0), &d), None);
}

#[test]
fn explicit_strategies_check_the_kind() {
    assert!(CreationStrategy::MultiShape { gap: 0.1 }.supports(ObjectKind::Shape));
    assert!(!CreationStrategy::Arrow.supports(ObjectKind::Shape));
    assert!(!CreationStrategy::Line.supports(ObjectKind::Point));
    assert!(
        CreationStrategy::DrawThenFill {
            percent_drawing: 0.5,
            gap: 0.0
        }
        .supports(ObjectKind::Point)
    );
}

#[test]
fn phase_split_only_applies_to_filled_objects() {
    let s = CreationStrategy::DrawThenFill {
        percent_drawing: 0.6,
        gap: 0.1,
    };
    let (draw, fill) = s.phase_split(&red_square(), 5.0);
    assert!(close(draw, 3.0) && close(fill, 2.0));
    assert_eq!(s.phase_split(&baseline(), 5.0), (5.0, 0.0));
    assert_eq!(
        CreationStrategy::SimpleShape.phase_split(&red_square(), 5.0),
        (5.0, 0.0)
    );
}

#[test]
fn stagger_progress_delays_each_part() {
    assert!(close(stagger_progress(0, 3, 0.3, 0.2), 0.5));
    assert_eq!(stagger_progress(2, 3, 0.4, 0.2), 0.0);
    assert_eq!(stagger_progress(2, 3, 1.0, 0.2), 1.0);
    assert_eq!(stagger_progress(0, 1, 0.7, 0.5), 0.7);
    // The gap is capped so the last part still finishes at the end.
    assert!(close(stagger_progress(3, 4, 1.0, 0.5), 1.0));
    assert!(close(stagger_progress(3, 4, 0.875, 0.5), 0.5));
}

#[test]
fn render_endpoints_are_empty_and_complete() {
    let cam = camera();
    let obj = baseline();
    let empty = CreationStrategy::SimpleShape.render(&obj, 0.0, &cam);
    assert!(empty.is_empty());
    assert_eq!(CreationStrategy::SimpleShape.render(&obj, 1.0, &cam), obj);
}

#[test]
fn simple_shape_reveals_along_the_path() {
    let cam = camera();
    let MathObject::Shape(half) = CreationStrategy::SimpleShape.render(&baseline(), 0.5, &cam)
    else {
        panic!("expected a shape");
    };
    let b = half.bounds().unwrap();
    assert!(close(b.x0, 0.0));
    assert!(close(b.x1, 2.0), "{b:?}");
}

#[test]
fn line_grows_from_the_middle_of_the_view() {
    let cam = camera();
    let line = MathObject::Line(InfiniteLine {
        a: Point::new(-1.0, 0.0),
        b: Point::new(1.0, 0.0),
        style: Style::default(),
    });
    let MathObject::Shape(seg) = CreationStrategy::Line.render(&line, 0.5, &cam) else {
        panic!("expected a shape");
    };
    let b = seg.bounds().unwrap();
    assert!(close(b.x0, -2.0) && close(b.x1, 2.0), "{b:?}");
}

#[test]
fn draw_then_fill_outlines_before_filling() {
    let cam = camera();
    let s = CreationStrategy::DrawThenFill {
        percent_drawing: 0.6,
        gap: 0.0,
    };
    let MathObject::Shape(drawing) = s.render(&red_square(), 0.3, &cam) else {
        panic!("expected a shape");
    };
    assert_eq!(drawing.style.fill.a, 0.0);
    assert_eq!(drawing.style.stroke, Color::rgb(1.0, 0.0, 0.0));
    assert!(close(drawing.style.thickness, DRAW_THICKNESS));

    let MathObject::Shape(filling) = s.render(&red_square(), 0.8, &cam) else {
        panic!("expected a shape");
    };
    assert!(close(filling.style.fill.a, 0.5));
    assert!(close(filling.style.thickness, DRAW_THICKNESS * 0.5));
}

#[test]
fn points_are_drawn_as_discs() {
    let cam = camera();
    let s = CreationStrategy::DrawThenFill {
        percent_drawing: 0.5,
        gap: 0.0,
    };
    let MathObject::Shape(disc) = s.render(&MathObject::point(Point::ORIGIN), 0.75, &cam) else {
        panic!("expected a shape");
    };
    let b = disc.bounds().unwrap();
    let r = Style::default().dot_radius / cam.pixels_per_unit();
    assert!((b.width() - 2.0 * r).abs() < 1e-3, "{b:?}");
    assert!(close(disc.style.fill.a, 0.5));
}

#[test]
fn creation_swaps_proxy_and_target() {
    let mut scene = Scene::new(SceneConfig::default()).unwrap();
    let target = scene.insert(baseline());
    let mut anim = Animation::create(target, 1.0);
    assert!(anim.initialize(&mut scene));
    let AnimationKind::Create(c) = anim.kind() else {
        panic!("expected a creation");
    };
    let proxy = c.proxy().unwrap();
    assert_eq!(c.strategy(), Some(CreationStrategy::SimpleShape));
    assert!(scene.visible().is_empty());

    anim.process(&mut scene);
    assert_eq!(scene.visible(), &[proxy]);

    anim.finish(&mut scene);
    assert_eq!(scene.visible(), &[target]);
    assert!(scene.object(proxy).is_none());
}

#[test]
fn created_target_ends_on_top() {
    let mut scene = Scene::new(SceneConfig::default()).unwrap();
    let below = scene.add_object(MathObject::point(Point::ORIGIN));
    let target = scene.add_object(baseline());
    let above = scene.add_object(MathObject::point(Point::ORIGIN));
    let mut anim = Animation::create(target, 1.0);
    anim.initialize(&mut scene);
    anim.process(&mut scene);
    anim.finish(&mut scene);
    assert_eq!(scene.visible(), &[below, above, target]);
}

#[test]
fn mismatched_explicit_strategy_is_skipped() {
    let mut scene = Scene::new(SceneConfig::default()).unwrap();
    let target = scene.add_object(baseline());
    let mut anim = Animation::create_with(target, CreationStrategy::Arrow, 1.0);
    assert!(!anim.initialize(&mut scene));
    assert!(anim.is_finished());
    assert_eq!(scene.visible(), &[target]);
}

#[test]
fn group_members_use_the_given_creation_defaults() {
    let cam = camera();
    let group = MathObject::Group(vec![MathObject::point(Point::ORIGIN)]);
    let fill_of = |obj: MathObject| match obj {
        MathObject::Group(items) => match items.as_slice() {
            [MathObject::Shape(disc)] => disc.style.fill.a,
            other => panic!("unexpected members {other:?}"),
        },
        other => panic!("unexpected state {other:?}"),
    };
    let outline_only = CreationDefaults {
        gap: 0.0,
        percent_drawing: 1.0,
    };
    let drawn = CreationStrategy::Composite.render_with(&group, 0.8, &cam, &outline_only);
    assert_eq!(fill_of(drawn), 0.0);
    let default = CreationStrategy::Composite.render(&group, 0.8, &cam);
    assert!(fill_of(default) > 0.0);
}
