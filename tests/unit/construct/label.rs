use super::*;
use crate::text::compiler::{GlyphCache, NoTextCompiler};
use kurbo::Rect;

#[test]
fn fills_numbers_points_and_braces() {
    let s = fill_template(
        "d = {0:.2}, P = {1}, {{x}}",
        &[
            TemplateArg::Number(1.23456),
            TemplateArg::Point(Point::new(1.0, -2.0)),
        ],
    )
    .unwrap();
    assert_eq!(s, "d = 1.23, P = (1, -2), {x}");
}

#[test]
fn rejects_bad_placeholders() {
    assert!(fill_template("{0", &[TemplateArg::Number(1.0)]).is_err());
    assert!(fill_template("{1}", &[TemplateArg::Number(1.0)]).is_err());
    assert!(fill_template("{a}", &[]).is_err());
    assert!(fill_template("x}", &[]).is_err());
}

#[test]
fn negative_zero_prints_as_zero() {
    assert_eq!(format_number(-0.0, None), "0");
    assert_eq!(format_number(-0.0001, Some(2)), "0.00");
    assert_eq!(format_number(2.5, None), "2.5");
}

#[test]
fn layout_scales_to_height_and_centres_on_anchor() {
    let mut cache = GlyphCache::new();
    cache.insert("A", vec![Shape::rectangle(Rect::new(0.0, 0.0, 2.0, 4.0))]);
    let m = layout_label("A", &cache, Point::new(10.0, 10.0), 1.0);
    let b = m.shapes[0].bounds().unwrap();
    assert!((b.height() - 1.0).abs() < 1e-9);
    assert!((b.width() - 0.5).abs() < 1e-9);
    assert!((b.center().x - 10.0).abs() < 1e-9);
    assert!((b.center().y - 10.0).abs() < 1e-9);
}

#[test]
fn compile_failure_gives_empty_label() {
    let m = layout_label("A", &NoTextCompiler, Point::ORIGIN, 1.0);
    assert!(m.shapes.is_empty());
}
