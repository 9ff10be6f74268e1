use kurbo::{Affine, BezPath, ParamCurve as _, Point, Rect, Shape as _, Vec2};

use crate::foundation::math::{normal, normalized};
use crate::geom::shape::Shape;
use crate::scene::camera::Camera;
use crate::style::props::Style;

/// Runtime category of a [`MathObject`], used for strategy dispatch and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Point,
    Scalar,
    Shape,
    MultiShape,
    Arrow,
    Line,
    Axes,
    Group,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Point => "point",
            Self::Scalar => "scalar",
            Self::Shape => "shape",
            Self::MultiShape => "multi_shape",
            Self::Arrow => "arrow",
            Self::Line => "line",
            Self::Axes => "axes",
            Self::Group => "group",
        };
        f.write_str(s)
    }
}

/// Ordered collection of shapes drawn and animated as one object (compiled text, delimiters).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiShape {
    pub shapes: Vec<Shape>,
}

/// A head glyph attached to an arrow at `anchor`.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowHead {
    pub shape: Shape,
    pub anchor: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Arrow {
    pub body: Shape,
    pub start_head: Option<ArrowHead>,
    pub end_head: Option<ArrowHead>,
    pub tail: Point,
    pub tip: Point,
}

impl Arrow {
    /// Straight arrow from `tail` to `tip` with a triangular head of `head_len` math units.
    ///
    /// With `double` a second head is placed at the tail.
    pub fn between(tail: Point, tip: Point, head_len: f64, double: bool, style: &Style) -> Self {
        let dir = normalized(tip - tail).unwrap_or(Vec2::new(1.0, 0.0));
        let len = tail.distance(tip);
        let head_len = head_len.max(0.0).min(if double { 0.5 * len } else { len });
        let head_style = head_style(style);

        let end_head = ArrowHead {
            shape: triangle_head(tip, dir, head_len).with_style(head_style.clone()),
            anchor: tip,
        };
        let start_head = double.then(|| ArrowHead {
            shape: triangle_head(tail, -dir, head_len).with_style(head_style),
            anchor: tail,
        });

        let body_start = if double { tail + dir * head_len } else { tail };
        let body_end = tip - dir * head_len;
        let body = Shape::segment(body_start, body_end).with_style(style.clone());

        Self {
            body,
            start_head,
            end_head: Some(end_head),
            tail,
            tip,
        }
    }

    pub fn heads(&self) -> impl Iterator<Item = &ArrowHead> {
        self.start_head.iter().chain(self.end_head.iter())
    }

    fn heads_mut(&mut self) -> impl Iterator<Item = &mut ArrowHead> {
        self.start_head.iter_mut().chain(self.end_head.iter_mut())
    }

    fn apply_affine(&mut self, affine: Affine) {
        self.body.apply_affine(affine);
        for h in self.heads_mut() {
            h.shape.apply_affine(affine);
            h.anchor = affine * h.anchor;
        }
        self.tail = affine * self.tail;
        self.tip = affine * self.tip;
    }

    fn set_style(&mut self, style: &Style) {
        self.body.style = style.clone();
        let hs = head_style(style);
        for h in self.heads_mut() {
            h.shape.style = hs.clone();
        }
    }

    fn shapes(&self) -> impl Iterator<Item = &Shape> {
        std::iter::once(&self.body).chain(self.heads().map(|h| &h.shape))
    }

    fn shapes_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        let Self {
            body,
            start_head,
            end_head,
            ..
        } = self;
        std::iter::once(body)
            .chain(start_head.iter_mut().map(|h| &mut h.shape))
            .chain(end_head.iter_mut().map(|h| &mut h.shape))
    }
}

fn head_style(style: &Style) -> Style {
    let mut s = style.clone();
    if !s.has_fill() {
        s.fill = s.stroke;
    }
    s
}

fn triangle_head(at: Point, dir: Vec2, len: f64) -> Shape {
    let n = normal(dir);
    let back = at - dir * len;
    Shape::polygon(&[at, back + n * (0.5 * len), back - n * (0.5 * len)])
}

/// Infinite line through `a` and `b`, clipped to the camera view when drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct InfiniteLine {
    pub a: Point,
    pub b: Point,
    pub style: Style,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Axes {
    pub x_axis: Arrow,
    pub y_axis: Arrow,
    pub ticks: Vec<Shape>,
}

/// Hard cap on generated ticks per axis.
const MAX_TICKS: usize = 1000;

impl Axes {
    /// Axes through the origin covering `x_range` x `y_range`, with ticks every `tick_step`.
    pub fn new(
        x_range: (f64, f64),
        y_range: (f64, f64),
        tick_step: f64,
        tick_size: f64,
        style: &Style,
    ) -> Self {
        let head = 0.6 * tick_size.max(0.0);
        let x_axis = Arrow::between(
            Point::new(x_range.0, 0.0),
            Point::new(x_range.1, 0.0),
            head,
            false,
            style,
        );
        let y_axis = Arrow::between(
            Point::new(0.0, y_range.0),
            Point::new(0.0, y_range.1),
            head,
            false,
            style,
        );

        let mut ticks = Vec::new();
        if tick_step > 0.0 && tick_step.is_finite() {
            let half = 0.5 * tick_size;
            for v in tick_values(x_range, tick_step) {
                ticks.push(
                    Shape::segment(Point::new(v, -half), Point::new(v, half))
                        .with_style(style.clone()),
                );
            }
            for v in tick_values(y_range, tick_step) {
                ticks.push(
                    Shape::segment(Point::new(-half, v), Point::new(half, v))
                        .with_style(style.clone()),
                );
            }
        }

        Self {
            x_axis,
            y_axis,
            ticks,
        }
    }
}

fn tick_values(range: (f64, f64), step: f64) -> impl Iterator<Item = f64> {
    let (lo, hi) = if range.0 <= range.1 {
        range
    } else {
        (range.1, range.0)
    };
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last)
        .filter(|k| *k != 0)
        .take(MAX_TICKS)
        .map(move |k| k as f64 * step)
}

/// One path to stroke and fill, in math coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    pub path: BezPath,
    pub style: Style,
}

/// Every drawable the scene manages.
#[derive(Clone, Debug, PartialEq)]
pub enum MathObject {
    Point { pos: Point, style: Style },
    /// A number. Not drawn; used as a dependency by constructions.
    Scalar(f64),
    Shape(Shape),
    MultiShape(MultiShape),
    Arrow(Arrow),
    Line(InfiniteLine),
    Axes(Axes),
    Group(Vec<MathObject>),
}

impl MathObject {
    pub fn point(pos: Point) -> Self {
        Self::Point {
            pos,
            style: Style::filled(crate::style::color::Color::WHITE),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Point { .. } => ObjectKind::Point,
            Self::Scalar(_) => ObjectKind::Scalar,
            Self::Shape(_) => ObjectKind::Shape,
            Self::MultiShape(_) => ObjectKind::MultiShape,
            Self::Arrow(_) => ObjectKind::Arrow,
            Self::Line(_) => ObjectKind::Line,
            Self::Axes(_) => ObjectKind::Axes,
            Self::Group(_) => ObjectKind::Group,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Point { pos, .. } => Some(*pos),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Two points defining this object as a line-like operand (segment, infinite line, arrow).
    pub fn line_points(&self) -> Option<(Point, Point)> {
        match self {
            Self::Line(l) => Some((l.a, l.b)),
            Self::Arrow(a) => Some((a.tail, a.tip)),
            Self::Shape(s) => {
                let mut segs = s.path.segments();
                let first = segs.next()?;
                let last = segs.last().unwrap_or(first);
                Some((first.start(), last.end()))
            }
            _ => None,
        }
    }

    /// Bounding box in math coordinates, `None` when nothing is drawable.
    pub fn bounding_box(&self) -> Option<Rect> {
        match self {
            Self::Point { pos, .. } => Some(Rect::from_points(*pos, *pos)),
            Self::Scalar(_) => None,
            Self::Shape(s) => s.bounds(),
            Self::MultiShape(m) => union_all(m.shapes.iter().map(Shape::bounds)),
            Self::Arrow(a) => union_all(a.shapes().map(Shape::bounds)),
            Self::Line(l) => Some(Rect::from_points(l.a, l.b)),
            Self::Axes(ax) => union_all(
                ax.x_axis
                    .shapes()
                    .chain(ax.y_axis.shapes())
                    .chain(ax.ticks.iter())
                    .map(Shape::bounds),
            ),
            Self::Group(items) => union_all(items.iter().map(MathObject::bounding_box)),
        }
    }

    /// Centre of the bounding box, or the origin when there is none.
    pub fn center(&self) -> Point {
        self.bounding_box().map_or(Point::ORIGIN, |r| r.center())
    }

    pub fn apply_affine(&mut self, affine: Affine) {
        match self {
            Self::Point { pos, .. } => *pos = affine * *pos,
            Self::Scalar(_) => {}
            Self::Shape(s) => s.apply_affine(affine),
            Self::MultiShape(m) => m.shapes.iter_mut().for_each(|s| s.apply_affine(affine)),
            Self::Arrow(a) => a.apply_affine(affine),
            Self::Line(l) => {
                l.a = affine * l.a;
                l.b = affine * l.b;
            }
            Self::Axes(ax) => {
                ax.x_axis.apply_affine(affine);
                ax.y_axis.apply_affine(affine);
                ax.ticks.iter_mut().for_each(|s| s.apply_affine(affine));
            }
            Self::Group(items) => items.iter_mut().for_each(|o| o.apply_affine(affine)),
        }
    }

    /// Representative style (the first drawable part), `None` for scalars and empty containers.
    pub fn style(&self) -> Option<&Style> {
        match self {
            Self::Point { style, .. } => Some(style),
            Self::Scalar(_) => None,
            Self::Shape(s) => Some(&s.style),
            Self::MultiShape(m) => m.shapes.first().map(|s| &s.style),
            Self::Arrow(a) => Some(&a.body.style),
            Self::Line(l) => Some(&l.style),
            Self::Axes(ax) => Some(&ax.x_axis.body.style),
            Self::Group(items) => items.iter().find_map(MathObject::style),
        }
    }

    /// Mutable representative style. For containers prefer [`MathObject::set_style`] or
    /// [`MathObject::map_styles`], which reach every part.
    pub fn style_mut(&mut self) -> Option<&mut Style> {
        match self {
            Self::Point { style, .. } => Some(style),
            Self::Scalar(_) => None,
            Self::Shape(s) => Some(&mut s.style),
            Self::MultiShape(m) => m.shapes.first_mut().map(|s| &mut s.style),
            Self::Arrow(a) => Some(&mut a.body.style),
            Self::Line(l) => Some(&mut l.style),
            Self::Axes(ax) => Some(&mut ax.x_axis.body.style),
            Self::Group(items) => items.iter_mut().find_map(MathObject::style_mut),
        }
    }

    /// Apply `style` to every part.
    pub fn set_style(&mut self, style: &Style) {
        match self {
            Self::Point { style: s, .. } => s.copy_from(style),
            Self::Scalar(_) => {}
            Self::Shape(s) => s.style.copy_from(style),
            Self::MultiShape(m) => m.shapes.iter_mut().for_each(|s| s.style.copy_from(style)),
            Self::Arrow(a) => a.set_style(style),
            Self::Line(l) => l.style.copy_from(style),
            Self::Axes(ax) => {
                ax.x_axis.set_style(style);
                ax.y_axis.set_style(style);
                ax.ticks.iter_mut().for_each(|s| s.style.copy_from(style));
            }
            Self::Group(items) => items.iter_mut().for_each(|o| o.set_style(style)),
        }
    }

    /// Visit the style of every part.
    pub fn map_styles(&mut self, f: &mut impl FnMut(&mut Style)) {
        match self {
            Self::Point { style, .. } => f(style),
            Self::Scalar(_) => {}
            Self::Shape(s) => f(&mut s.style),
            Self::MultiShape(m) => m.shapes.iter_mut().for_each(|s| f(&mut s.style)),
            Self::Arrow(a) => a.shapes_mut().for_each(|s| f(&mut s.style)),
            Self::Line(l) => f(&mut l.style),
            Self::Axes(ax) => ax
                .x_axis
                .shapes_mut()
                .chain(ax.y_axis.shapes_mut())
                .chain(ax.ticks.iter_mut())
                .for_each(|s| f(&mut s.style)),
            Self::Group(items) => items.iter_mut().for_each(|o| o.map_styles(f)),
        }
    }

    /// Whether any part carries a visible fill.
    pub fn has_fill(&self) -> bool {
        match self {
            Self::Point { style, .. } => style.has_fill(),
            Self::Scalar(_) => false,
            Self::Shape(s) => s.style.has_fill(),
            Self::MultiShape(m) => m.shapes.iter().any(|s| s.style.has_fill()),
            Self::Arrow(a) => a.body.style.has_fill(),
            Self::Line(_) => false,
            Self::Axes(_) => false,
            Self::Group(items) => items.iter().any(MathObject::has_fill),
        }
    }

    /// In-place assignment of style and geometry from an object of the same kind.
    ///
    /// Returns `false` (leaving `self` untouched) when the kinds differ.
    pub fn copy_state_from(&mut self, other: &MathObject) -> bool {
        if self.kind() != other.kind() {
            return false;
        }
        self.clone_from(other);
        true
    }

    /// Take the geometry of `other` while keeping this object's style.
    pub fn replace_geometry(&mut self, other: &MathObject) {
        let keep = self.style().cloned();
        let same_kind = self.kind() == other.kind();
        self.clone_from(other);
        if same_kind && let Some(style) = keep {
            self.set_style(&style);
        }
    }

    /// `true` when drawing would produce nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point { .. } => false,
            Self::Scalar(_) => true,
            Self::Shape(s) => s.is_empty(),
            Self::MultiShape(m) => m.shapes.iter().all(Shape::is_empty),
            Self::Arrow(a) => a.shapes().all(Shape::is_empty),
            Self::Line(l) => l.a == l.b,
            Self::Axes(ax) => ax
                .x_axis
                .shapes()
                .chain(ax.y_axis.shapes())
                .chain(ax.ticks.iter())
                .all(Shape::is_empty),
            Self::Group(items) => items.iter().all(MathObject::is_empty),
        }
    }

    /// Flatten into paths in math coordinates. Points become discs sized in pixels, lines are
    /// clipped to the camera view.
    pub fn draw_items(&self, camera: &Camera) -> Vec<DrawItem> {
        let mut out = Vec::new();
        self.collect_items(camera, &mut out);
        out
    }

    fn collect_items(&self, camera: &Camera, out: &mut Vec<DrawItem>) {
        match self {
            Self::Point { pos, style } => {
                let r = style.dot_radius / camera.pixels_per_unit();
                if r > 0.0 && r.is_finite() {
                    out.push(DrawItem {
                        path: kurbo::Circle::new(*pos, r).to_path(1e-4),
                        style: style.clone(),
                    });
                }
            }
            Self::Scalar(_) => {}
            Self::Shape(s) => push_shape(out, s),
            Self::MultiShape(m) => m.shapes.iter().for_each(|s| push_shape(out, s)),
            Self::Arrow(a) => a.shapes().for_each(|s| push_shape(out, s)),
            Self::Line(l) => {
                if let Some((p, q)) = camera.clip_line(l.a, l.b) {
                    let mut path = BezPath::new();
                    path.move_to(p);
                    path.line_to(q);
                    out.push(DrawItem {
                        path,
                        style: l.style.clone(),
                    });
                }
            }
            Self::Axes(ax) => ax
                .x_axis
                .shapes()
                .chain(ax.y_axis.shapes())
                .chain(ax.ticks.iter())
                .for_each(|s| push_shape(out, s)),
            Self::Group(items) => items.iter().for_each(|o| o.collect_items(camera, out)),
        }
    }
}

fn push_shape(out: &mut Vec<DrawItem>, s: &Shape) {
    if s.is_empty() {
        return;
    }
    out.push(DrawItem {
        path: s.path.clone(),
        style: s.style.clone(),
    });
}

fn union_all(rects: impl Iterator<Item = Option<Rect>>) -> Option<Rect> {
    rects.flatten().reduce(|a, b| a.union(b))
}

impl From<Shape> for MathObject {
    fn from(s: Shape) -> Self {
        Self::Shape(s)
    }
}

impl From<Arrow> for MathObject {
    fn from(a: Arrow) -> Self {
        Self::Arrow(a)
    }
}

impl From<Axes> for MathObject {
    fn from(a: Axes) -> Self {
        Self::Axes(a)
    }
}

impl From<MultiShape> for MathObject {
    fn from(m: MultiShape) -> Self {
        Self::MultiShape(m)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geom/object.rs"]
mod tests;
