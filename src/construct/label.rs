use kurbo::{Affine, Point};

use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::foundation::ids::ObjectId;
use crate::geom::object::MultiShape;
use crate::geom::shape::Shape;
use crate::text::compiler::TextCompiler;

/// Text label whose content is computed from dependencies.
///
/// `template` may contain `{i}` or `{i:.p}` placeholders, replaced by argument `i` (a scalar or
/// a point) with `p` decimals. `{{` and `}}` are literal braces.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSpec {
    pub template: String,
    pub args: Vec<ObjectId>,
    /// Point the label is centred on; the origin when absent.
    pub anchor: Option<ObjectId>,
    /// Target glyph height in math units; `0` keeps the compiled size.
    pub height: f64,
}

/// Value substituted into a label template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TemplateArg {
    Number(f64),
    Point(Point),
}

pub fn fill_template(template: &str, args: &[TemplateArg]) -> GeomotionResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => field.push(ch),
                        None => {
                            return Err(GeomotionError::construction(format!(
                                "unterminated placeholder in {template:?}"
                            )));
                        }
                    }
                }
                let (index, precision) = parse_field(&field)?;
                let arg = args.get(index).ok_or_else(|| {
                    GeomotionError::construction(format!(
                        "placeholder {{{index}}} has no argument ({} given)",
                        args.len()
                    ))
                })?;
                match *arg {
                    TemplateArg::Number(v) => out.push_str(&format_number(v, precision)),
                    TemplateArg::Point(p) => {
                        out.push('(');
                        out.push_str(&format_number(p.x, precision));
                        out.push_str(", ");
                        out.push_str(&format_number(p.y, precision));
                        out.push(')');
                    }
                }
            }
            '}' => {
                return Err(GeomotionError::construction(format!(
                    "unmatched '}}' in {template:?}"
                )));
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

fn parse_field(field: &str) -> GeomotionResult<(usize, Option<usize>)> {
    let bad = || GeomotionError::construction(format!("invalid placeholder {{{field}}}"));
    let (idx, prec) = match field.split_once(':') {
        Some((i, format)) => {
            let p = format.strip_prefix('.').ok_or_else(bad)?;
            (i, Some(p.trim().parse::<usize>().map_err(|_| bad())?))
        }
        None => (field, None),
    };
    let idx = idx.trim().parse::<usize>().map_err(|_| bad())?;
    Ok((idx, prec))
}

/// Integers print without decimals unless a precision is requested.
pub fn format_number(v: f64, precision: Option<usize>) -> String {
    let v = if v == 0.0 { 0.0 } else { v };
    match precision {
        Some(p) => {
            let s = format!("{v:.p$}");
            // "-0.00" after rounding a tiny negative value.
            if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
                s[1..].to_owned()
            } else {
                s
            }
        }
        None if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        None => format!("{v}"),
    }
}

/// Compile `text` and lay it out centred on `anchor`, scaled to `height`.
///
/// A compile failure is logged and yields an empty multi-shape.
pub fn layout_label(
    text: &str,
    compiler: &dyn TextCompiler,
    anchor: Point,
    height: f64,
) -> MultiShape {
    let shapes = match compiler.compile(text) {
        Ok(shapes) => shapes,
        Err(e) => {
            tracing::error!(text, error = %e, "label text failed to compile");
            return MultiShape::default();
        }
    };
    let Some(bounds) = shapes
        .iter()
        .filter_map(Shape::bounds)
        .reduce(|a, b| a.union(b))
    else {
        return MultiShape { shapes };
    };
    let scale = if height > 0.0 && bounds.height() > 1e-12 {
        height / bounds.height()
    } else {
        1.0
    };
    let place = Affine::translate(anchor.to_vec2())
        * Affine::scale(scale)
        * Affine::translate(-bounds.center().to_vec2());
    let shapes = shapes
        .into_iter()
        .map(|mut s| {
            s.apply_affine(place);
            s
        })
        .collect();
    MultiShape { shapes }
}

#[cfg(test)]
#[path = "../../tests/unit/construct/label.rs"]
mod tests;
