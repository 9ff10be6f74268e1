use super::*;
use crate::scene::render::RecordingRenderer;
use kurbo::Point;

const TRIANGLE: &str = r##"{
  "objects": [
    { "label": "mid", "construct": { "type": "mid_point", "a": "A", "b": "B" }, "visible": true },
    { "label": "A", "point": [0, 0], "visible": true },
    { "label": "B", "point": [4, 0], "visible": true },
    { "label": "C", "point": [0, 3] },
    { "label": "tri", "construct": { "type": "polygon", "vertices": ["A", "B", "C"] },
      "style": { "fill": "#00ff00" } },
    { "label": "r", "construct": { "type": "distance", "a": "A", "b": "B" } }
  ],
  "timeline": [
    { "play": [{ "type": "create", "target": "tri", "run_time": 0.5 }] },
    { "move_point": { "target": "B", "to": [2, 2] } },
    { "wait": 0.1 }
  ]
}"##;

fn point_of(scene: &Scene, label: &str) -> Point {
    scene
        .find(label)
        .and_then(|id| scene.object(id))
        .and_then(MathObject::as_point)
        .unwrap()
}

#[test]
fn labels_may_be_used_before_they_are_defined() {
    let script = parse_script(TRIANGLE).unwrap();
    let scene = build_scene(&script).unwrap();
    assert_eq!(point_of(&scene, "mid"), Point::new(2.0, 0.0));
    let r = scene.find("r").and_then(|id| scene.object(id)).cloned();
    assert_eq!(r, Some(MathObject::Scalar(4.0)));

    let order = evaluation_order(&scene);
    let at = |l: &str| order.iter().position(|x| x == l).unwrap();
    assert!(at("A") < at("mid") && at("B") < at("mid"));
    assert!(at("C") < at("tri"));
}

#[test]
fn visible_flags_and_style_patches_are_applied() {
    let scene = build_scene(&parse_script(TRIANGLE).unwrap()).unwrap();
    let id = |l: &str| scene.find(l).unwrap();
    assert!(scene.contains(id("mid")));
    assert!(!scene.contains(id("C")));
    assert!(!scene.contains(id("tri")));
    let fill = scene.object(id("tri")).and_then(MathObject::style).unwrap().fill;
    assert_eq!(fill.to_svg_hex(), "#00ff00");
}

#[test]
fn timeline_moves_points_and_renders_frames() {
    let script = parse_script(TRIANGLE).unwrap();
    let mut scene = build_scene(&script).unwrap();
    let mut r = RecordingRenderer::new();
    let stats = run_timeline(&mut scene, &script.timeline, &mut r).unwrap();
    assert_eq!(stats.frames, 15 + 3);
    assert_eq!(r.frames().len(), 18);
    assert_eq!(point_of(&scene, "mid"), Point::new(1.0, 1.0));
    assert!(scene.contains(scene.find("tri").unwrap()));
}

#[test]
fn derived_points_cannot_be_moved() {
    let script = parse_script(TRIANGLE).unwrap();
    let mut scene = build_scene(&script).unwrap();
    let step = Step::MovePoint {
        target: "mid".into(),
        to: [1.0, 1.0],
    };
    let mut r = RecordingRenderer::new();
    let err = run_timeline(&mut scene, &[step], &mut r).unwrap_err();
    assert!(matches!(err, GeomotionError::Validation(_)), "{err}");
}

#[test]
fn cycles_name_a_label() {
    let text = r#"{
      "objects": [
        { "label": "P", "construct": { "type": "mid_point", "a": "Q", "b": "Q" } },
        { "label": "Q", "construct": { "type": "mid_point", "a": "P", "b": "P" } }
      ]
    }"#;
    let err = build_scene(&parse_script(text).unwrap()).unwrap_err();
    match err {
        GeomotionError::Cycle { node } => assert!(node == "P" || node == "Q", "{node}"),
        other => panic!("expected a cycle, got {other}"),
    }
}

#[test]
fn unknown_labels_are_reported_with_their_owner() {
    let text = r#"{
      "objects": [
        { "label": "A", "point": [0, 0] },
        { "label": "s", "construct": { "type": "segment", "a": "A", "b": "Z" } }
      ]
    }"#;
    let err = build_scene(&parse_script(text).unwrap()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation error: 's' refers to unknown label 'Z'"
    );
}

#[test]
fn animation_defs_map_to_animations() {
    let scene = build_scene(&parse_script(TRIANGLE).unwrap()).unwrap();
    let def: AnimationDef = serde_json::from_str(
        r#"{ "type": "rotate", "targets": ["tri"], "degrees": 90, "ease": "linear" }"#,
    )
    .unwrap();
    let anim = animation_from_def(&scene, &def).unwrap();
    assert_eq!(anim.name(), "rotate");
    assert_eq!(anim.timing.run_time, 1.0);
    assert_eq!(anim.timing.ease, crate::animation::ease::Ease::Linear);

    let missing: AnimationDef =
        serde_json::from_str(r#"{ "type": "fade_in", "targets": ["nope"] }"#).unwrap();
    assert!(animation_from_def(&scene, &missing).is_err());
}

#[test]
fn invalid_config_is_rejected_on_parse() {
    let text = r#"{ "config": { "fps": { "num": 30, "den": 0 } } }"#;
    assert!(parse_script(text).is_err());
}

#[test]
fn references_list_every_label() {
    let def: ConstructDef = serde_json::from_str(
        r#"{ "type": "label", "template": "{} cm", "args": ["r"], "anchor": "A" }"#,
    )
    .unwrap();
    assert_eq!(def.references(), vec!["r", "A"]);
}
