use super::*;
use crate::foundation::core::Canvas;
use crate::geom::shape::Shape;
use crate::scene::sink::InMemorySink;
use crate::style::props::Style;
use kurbo::{Point, Rect};

fn camera() -> Camera {
    Camera::new(
        Rect::new(-2.0, -2.0, 2.0, 2.0),
        Canvas {
            width: 40,
            height: 40,
        },
    )
    .unwrap()
}

fn red_square() -> MathObject {
    MathObject::Shape(
        Shape::rectangle(Rect::new(-1.0, -1.0, 1.0, 1.0))
            .with_style(Style::filled(Color::rgb(1.0, 0.0, 0.0))),
    )
}

#[test]
fn recording_renderer_keeps_items_per_frame() {
    let cam = camera();
    let mut r = RecordingRenderer::new();
    r.begin_frame(FrameIndex(0), &cam).unwrap();
    r.draw(&red_square(), &cam);
    r.draw(&MathObject::Scalar(2.0), &cam);
    r.end_frame().unwrap();
    r.begin_frame(FrameIndex(1), &cam).unwrap();
    r.end_frame().unwrap();

    assert_eq!(r.frames().len(), 2);
    assert_eq!(r.frames()[0].items.len(), 1);
    assert!(r.last().unwrap().items.is_empty());
}

#[test]
fn end_frame_without_begin_is_an_error() {
    let mut r = RecordingRenderer::new();
    assert!(matches!(r.end_frame(), Err(GeomotionError::Render(_))));
}

#[test]
fn svg_renderer_emits_pixel_space_paths() {
    let cam = camera();
    let mut r = SvgRenderer::new(Color::BLACK);
    r.begin_frame(FrameIndex(3), &cam).unwrap();
    r.draw(&red_square(), &cam);
    r.draw(&MathObject::point(Point::ORIGIN), &cam);
    r.end_frame().unwrap();

    let (idx, doc) = &r.documents()[0];
    assert_eq!(*idx, FrameIndex(3));
    assert!(doc.starts_with("<svg"));
    assert!(doc.ends_with("</svg>"));
    assert_eq!(doc.matches("<path").count(), 2);
    assert!(doc.contains(r#"d="M10"#));
    assert!(doc.contains(r##"fill="#ff0000""##));
}

#[test]
fn raster_renderer_fills_the_square() {
    let cam = camera();
    let mut r = RasterRenderer::new(InMemorySink::new(), Color::BLACK, Fps::default());
    r.begin_frame(FrameIndex(0), &cam).unwrap();
    r.draw(&red_square(), &cam);
    r.end_frame().unwrap();
    let sink = r.finish().unwrap();

    assert_eq!(sink.config().unwrap().width, 40);
    let (_, frame) = &sink.frames()[0];
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(20, 20), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(2, 2), Some([0, 0, 0, 255]));
}
