use anyhow::Context;
use kurbo::{Affine, BezPath, Point};

use crate::foundation::error::GeomotionResult;
use crate::geom::shape::Shape;
use crate::style::color::Color;
use crate::style::props::Style;

/// Parse SVG bytes and return every path as a [`Shape`] in document order.
///
/// Coordinates are taken in the document's user space with the y axis flipped, so glyphs
/// compiled top-down come out upright in math space. Text nodes contribute their flattened
/// outlines.
pub fn shapes_from_svg(bytes: &[u8]) -> GeomotionResult<Vec<Shape>> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    let mut out = Vec::new();
    collect_group(tree.root(), &mut out);
    tracing::debug!(shapes = out.len(), "svg imported");
    Ok(out)
}

fn collect_group(group: &usvg::Group, out: &mut Vec<Shape>) {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => collect_group(g.as_ref(), out),
            usvg::Node::Path(p) => {
                if let Some(shape) = convert_path(p.as_ref()) {
                    out.push(shape);
                }
            }
            usvg::Node::Text(t) => collect_group(t.flattened(), out),
            usvg::Node::Image(_) => {}
        }
    }
}

fn convert_path(p: &usvg::Path) -> Option<Shape> {
    let mut path = BezPath::new();
    let pt = |q: usvg::tiny_skia_path::Point| Point::new(f64::from(q.x), f64::from(q.y));
    for seg in p.data().segments() {
        use usvg::tiny_skia_path::PathSegment;
        match seg {
            PathSegment::MoveTo(a) => path.move_to(pt(a)),
            PathSegment::LineTo(a) => path.line_to(pt(a)),
            PathSegment::QuadTo(a, b) => path.quad_to(pt(a), pt(b)),
            PathSegment::CubicTo(a, b, c) => path.curve_to(pt(a), pt(b), pt(c)),
            PathSegment::Close => path.close_path(),
        }
    }
    if path.elements().is_empty() {
        return None;
    }
    path.apply_affine(Affine::FLIP_Y * to_affine(p.abs_transform()));

    let mut style = Style::filled(Color::WHITE);
    match p.fill() {
        Some(fill) => {
            if let usvg::Paint::Color(c) = fill.paint() {
                style.fill = svg_color(*c, fill.opacity().get());
                style.stroke = style.fill;
            }
        }
        None => style.fill = Color::TRANSPARENT,
    }
    if let Some(stroke) = p.stroke() {
        if let usvg::Paint::Color(c) = stroke.paint() {
            style.stroke = svg_color(*c, stroke.opacity().get());
        }
        style.thickness = f64::from(stroke.width().get());
    }
    Some(Shape::new(path, style))
}

fn svg_color(c: usvg::Color, opacity: f32) -> Color {
    Color::rgba(
        f64::from(c.red) / 255.0,
        f64::from(c.green) / 255.0,
        f64::from(c.blue) / 255.0,
        f64::from(opacity),
    )
}

fn to_affine(t: usvg::Transform) -> Affine {
    Affine::new([
        f64::from(t.sx),
        f64::from(t.ky),
        f64::from(t.kx),
        f64::from(t.sy),
        f64::from(t.tx),
        f64::from(t.ty),
    ])
}

#[cfg(test)]
#[path = "../../tests/unit/text/svg_import.rs"]
mod tests;
