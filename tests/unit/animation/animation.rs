use super::*;
use crate::geom::object::MathObject;
use crate::scene::config::SceneConfig;

fn scene_with_point() -> (Scene, ObjectId) {
    let mut scene = Scene::new(SceneConfig::default()).unwrap();
    let id = scene.add_object(MathObject::point(Point::ORIGIN));
    (scene, id)
}

fn pos(scene: &Scene, id: ObjectId) -> Point {
    scene.object(id).and_then(MathObject::as_point).unwrap()
}

fn approx(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn initialize_is_idempotent_while_running() {
    let (mut scene, a) = scene_with_point();
    let mut anim = Animation::shift(vec![a], Vec2::new(1.0, 0.0), 1.0);
    assert_eq!(anim.state(), AnimState::NotStarted);
    assert!(anim.initialize(&mut scene));
    assert_eq!(anim.state(), AnimState::Running);
    assert!(anim.initialize(&mut scene));
    assert_eq!(anim.timing.elapsed_frames(), 0);
}

#[test]
fn process_finishes_after_run_time_frames() {
    let (mut scene, a) = scene_with_point();
    let mut anim = Animation::shift(vec![a], Vec2::new(3.0, 0.0), 1.0).with_ease(Ease::Linear);
    anim.initialize(&mut scene);
    let mut steps = 0;
    while !anim.process(&mut scene) {
        steps += 1;
        if steps == 15 {
            assert!(approx(pos(&scene, a), Point::new(1.5, 0.0)));
        }
    }
    assert_eq!(steps, 29);
    assert!(anim.is_finished());
    assert!(approx(pos(&scene, a), Point::new(3.0, 0.0)));
    // Finished animations ignore further frames.
    assert!(anim.process(&mut scene));
    assert!(approx(pos(&scene, a), Point::new(3.0, 0.0)));
}

#[test]
fn process_starts_an_animation_lazily() {
    let (mut scene, a) = scene_with_point();
    let mut anim = Animation::shift(vec![a], Vec2::new(1.0, 0.0), 1.0);
    assert!(!anim.process(&mut scene));
    assert_eq!(anim.timing.elapsed_frames(), 1);
}

#[test]
fn finish_jumps_to_the_end_once() {
    let (mut scene, a) = scene_with_point();
    let mut anim = Animation::shift(vec![a], Vec2::new(2.0, 0.0), 1.0);
    anim.finish(&mut scene);
    assert!(anim.is_finished());
    assert!(approx(pos(&scene, a), Point::new(2.0, 0.0)));
    anim.finish(&mut scene);
    assert!(approx(pos(&scene, a), Point::new(2.0, 0.0)));
}

#[test]
fn failed_initialization_marks_the_animation_finished() {
    let mut scene = Scene::new(SceneConfig::default()).unwrap();
    let v = scene.insert(MathObject::Scalar(1.0));
    let mut anim = Animation::create(v, 1.0);
    assert!(!anim.initialize(&mut scene));
    assert!(anim.is_finished());
    assert!(!anim.initialize(&mut scene));
    assert!(anim.process(&mut scene));
}

#[test]
fn reset_returns_to_not_started() {
    let (mut scene, a) = scene_with_point();
    let mut anim = Animation::shift(vec![a], Vec2::new(1.0, 0.0), 1.0);
    anim.finish(&mut scene);
    anim.reset(&mut scene);
    assert_eq!(anim.state(), AnimState::NotStarted);
    // Replaying starts from the object's current state.
    anim.finish(&mut scene);
    assert!(approx(pos(&scene, a), Point::new(2.0, 0.0)));
}

#[test]
fn wait_and_sequence_are_linear() {
    assert_eq!(Animation::wait(1.0).timing.ease, Ease::Linear);
    let seq = Animation::sequence(vec![Animation::wait(0.5), Animation::wait(1.5)]);
    assert_eq!(seq.timing.ease, Ease::Linear);
    assert_eq!(seq.timing.run_time, 2.0);
    assert_eq!(seq.name(), "sequence");
    match seq.kind() {
        AnimationKind::Sequence(s) => assert_eq!(s.children().len(), 2),
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn sequence_plays_children_back_to_back() {
    let (mut scene, a) = scene_with_point();
    let mut seq = Animation::sequence(vec![
        Animation::shift(vec![a], Vec2::new(1.0, 0.0), 1.0).with_ease(Ease::Linear),
        Animation::shift(vec![a], Vec2::new(0.0, 1.0), 1.0).with_ease(Ease::Linear),
    ]);
    seq.initialize(&mut scene);
    for _ in 0..15 {
        seq.process(&mut scene);
    }
    assert!(approx(pos(&scene, a), Point::new(0.5, 0.0)));
    for _ in 0..30 {
        seq.process(&mut scene);
    }
    assert!(approx(pos(&scene, a), Point::new(1.0, 0.5)));
    while !seq.process(&mut scene) {}
    assert!(approx(pos(&scene, a), Point::new(1.0, 1.0)));
}

#[test]
fn names_follow_the_kind() {
    let id = ObjectId(0);
    assert_eq!(Animation::create(id, 1.0).name(), "create");
    assert_eq!(Animation::transform(id, ObjectId(1), 1.0).name(), "transform");
    assert_eq!(Animation::fade_out(vec![id], 1.0).name(), "fade_out");
    assert_eq!(Animation::rotate(vec![id], 1.0, None, 1.0).name(), "rotate");
    assert_eq!(Animation::wait(1.0).name(), "wait");
}

#[test]
fn reset_while_running_discards_the_creation_proxy() {
    let mut scene = Scene::new(SceneConfig::default()).unwrap();
    let pts = [Point::ORIGIN, Point::new(1.0, 0.0), Point::new(1.0, 1.0)];
    let target = scene.insert(MathObject::Shape(crate::geom::shape::Shape::polyline(&pts)));
    let mut anim = Animation::create(target, 1.0);
    anim.initialize(&mut scene);
    for _ in 0..5 {
        anim.process(&mut scene);
    }
    let AnimationKind::Create(c) = anim.kind() else {
        panic!("expected a creation");
    };
    let proxy = c.proxy().unwrap();
    assert!(scene.contains(proxy));

    anim.reset(&mut scene);
    assert_eq!(anim.state(), AnimState::NotStarted);
    assert!(scene.object(proxy).is_none());
    assert!(scene.visible().is_empty());

    anim.finish(&mut scene);
    assert_eq!(scene.visible(), &[target]);
}

#[test]
fn reset_while_running_restores_command_targets() {
    let mut scene = Scene::new(SceneConfig::default()).unwrap();
    let a = scene.insert(MathObject::point(Point::new(1.0, 1.0)));
    let mut anim = Animation::fade_in(vec![a], 1.0);
    anim.initialize(&mut scene);
    anim.process(&mut scene);
    assert!(scene.contains(a));
    anim.reset(&mut scene);
    assert!(!scene.contains(a));
    assert_eq!(scene.object(a).and_then(MathObject::style).unwrap().fill.a, 1.0);
}
