use super::*;

const ALL: [Ease; 12] = [
    Ease::Linear,
    Ease::Smooth,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::InOutSine,
    Ease::InBack,
    Ease::OutBack,
    Ease::ThereAndBack,
];

#[test]
fn endpoints_are_exact() {
    for e in ALL {
        assert_eq!(e.apply(0.0), 0.0, "{e:?} at 0");
        let end = if e == Ease::ThereAndBack { 0.0 } else { 1.0 };
        assert_eq!(e.apply(1.0), end, "{e:?} at 1");
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::Linear.apply(-1.0), 0.0);
    assert_eq!(Ease::Linear.apply(3.0), 1.0);
    assert_eq!(Ease::Smooth.apply(f64::NAN), 0.0);
}

#[test]
fn back_easings_overshoot() {
    assert!(Ease::InBack.apply(0.2) < 0.0);
    assert!(Ease::OutBack.apply(0.8) > 1.0);
    assert_eq!(Ease::ThereAndBack.apply(0.5), 1.0);
}

#[test]
fn parses_snake_case() {
    let e: Ease = serde_json::from_str("\"in_out_cubic\"").unwrap();
    assert_eq!(e, Ease::InOutCubic);
}
