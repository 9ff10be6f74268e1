//! Creation: drawing an object into the scene progressively.
//!
//! A [`Creation`] shows a proxy object while it runs. Each frame the proxy is rebuilt from the
//! target's *current* state by a [`CreationStrategy`], so derived targets that move during the
//! reveal are drawn where they are now.

use kurbo::Affine;

use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::foundation::ids::ObjectId;
use crate::foundation::math::clamp01;
use crate::geom::object::{Arrow, Axes, MathObject, MultiShape, ObjectKind};
use crate::geom::path::CanonicalPath;
use crate::geom::shape::Shape;
use crate::scene::camera::Camera;
use crate::scene::config::CreationDefaults;
use crate::scene::scene::Scene;
use crate::style::props::Style;

/// Stroke width, in pixels, given to outlines of fill-only shapes while they are drawn.
pub const DRAW_THICKNESS: f64 = 2.0;

/// How partial states of a creation are drawn.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CreationStrategy {
    /// Piecewise reveal of the canonical path, `lt * segment_count` segments drawn.
    SimpleShape,
    /// Parts revealed one after another, each delayed by `gap` of the run.
    MultiShape { gap: f64 },
    /// Body grows from the centre of its heads, heads grow about their anchors.
    Arrow,
    /// Members revealed by their own strategies; axis ticks grow in place.
    Composite,
    /// The camera-clipped segment grows from its midpoint.
    Line,
    /// Outlines drawn for `percent_drawing` of the run, then the fill fades in.
    DrawThenFill { percent_drawing: f64, gap: f64 },
}

impl CreationStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SimpleShape => "simple_shape",
            Self::MultiShape { .. } => "multi_shape",
            Self::Arrow => "arrow",
            Self::Composite => "composite",
            Self::Line => "line",
            Self::DrawThenFill { .. } => "draw_then_fill",
        }
    }

    /// Default strategy for an object. Scalars have none.
    pub fn select(object: &MathObject, defaults: &CreationDefaults) -> Option<Self> {
        let draw_then_fill = Self::DrawThenFill {
            percent_drawing: defaults.percent_drawing,
            gap: defaults.gap,
        };
        match object.kind() {
            ObjectKind::Shape => Some(Self::SimpleShape),
            ObjectKind::MultiShape | ObjectKind::Point => Some(draw_then_fill),
            ObjectKind::Arrow => Some(Self::Arrow),
            ObjectKind::Line => Some(Self::Line),
            ObjectKind::Axes | ObjectKind::Group => Some(Self::Composite),
            ObjectKind::Scalar => None,
        }
    }

    pub fn supports(&self, kind: ObjectKind) -> bool {
        match self {
            Self::SimpleShape => kind == ObjectKind::Shape,
            Self::MultiShape { .. } => matches!(kind, ObjectKind::MultiShape | ObjectKind::Shape),
            Self::Arrow => kind == ObjectKind::Arrow,
            Self::Composite => matches!(kind, ObjectKind::Axes | ObjectKind::Group),
            Self::Line => kind == ObjectKind::Line,
            Self::DrawThenFill { .. } => matches!(
                kind,
                ObjectKind::MultiShape | ObjectKind::Shape | ObjectKind::Point
            ),
        }
    }

    /// Seconds spent drawing outlines and fading in the fill over a run of `run_time`.
    ///
    /// Only draw-then-fill has a fill phase, and only for objects that have a fill.
    pub fn phase_split(&self, object: &MathObject, run_time: f64) -> (f64, f64) {
        match self {
            Self::DrawThenFill {
                percent_drawing, ..
            } if object.has_fill() => {
                let p = clamp01(*percent_drawing);
                (p * run_time, (1.0 - p) * run_time)
            }
            _ => (run_time, 0.0),
        }
    }

    /// State of `object` at eased progress `lt`: nothing at `lt <= 0`, the object itself at
    /// `lt >= 1`.
    pub fn render(&self, object: &MathObject, lt: f64, camera: &Camera) -> MathObject {
        self.render_with(object, lt, camera, &CreationDefaults::default())
    }

    /// [`CreationStrategy::render`] with the strategy settings used for group members.
    pub fn render_with(
        &self,
        object: &MathObject,
        lt: f64,
        camera: &Camera,
        defaults: &CreationDefaults,
    ) -> MathObject {
        if lt <= 0.0 {
            return MathObject::Group(Vec::new());
        }
        if lt >= 1.0 {
            return object.clone();
        }
        match (self, object) {
            (Self::SimpleShape, MathObject::Shape(s)) => MathObject::Shape(reveal_shape(s, lt)),
            (Self::MultiShape { gap }, MathObject::MultiShape(m)) => {
                MathObject::MultiShape(staggered(&m.shapes, lt, *gap, reveal_shape))
            }
            (Self::MultiShape { .. }, MathObject::Shape(s)) => {
                MathObject::Shape(reveal_shape(s, lt))
            }
            (Self::Arrow, MathObject::Arrow(a)) => MathObject::Arrow(grow_arrow(a, lt)),
            (Self::Line, MathObject::Line(l)) => {
                let shape = match camera.clip_line(l.a, l.b) {
                    Some((p, q)) => {
                        let mid = p.midpoint(q);
                        Shape::segment(mid + (p - mid) * lt, mid + (q - mid) * lt)
                    }
                    None => Shape::empty(Style::default()),
                };
                MathObject::Shape(shape.with_style(l.style.clone()))
            }
            (Self::Composite, MathObject::Axes(ax)) => MathObject::Axes(grow_axes(ax, lt)),
            (Self::Composite, MathObject::Group(items)) => MathObject::Group(
                items
                    .iter()
                    .filter_map(|item| {
                        Self::select(item, defaults)
                            .map(|s| s.render_with(item, lt, camera, defaults))
                    })
                    .collect(),
            ),
            (
                Self::DrawThenFill {
                    percent_drawing,
                    gap,
                },
                _,
            ) => draw_then_fill(object, lt, *percent_drawing, *gap, camera),
            _ => object.clone(),
        }
    }
}

fn reveal_shape(shape: &Shape, lt: f64) -> Shape {
    let path = CanonicalPath::from_path(&shape.path).reveal(lt);
    Shape::new(path, shape.style.clone())
}

/// Progress of part `k` of `n` when parts start `gap` apart and share the remaining duration.
///
/// The gap is capped at `1 / n` so every part keeps a positive duration.
pub fn stagger_progress(k: usize, n: usize, lt: f64, gap: f64) -> f64 {
    if n <= 1 {
        return clamp01(lt);
    }
    let gap = clamp01(gap).min(1.0 / n as f64);
    let duration = 1.0 - (n - 1) as f64 * gap;
    clamp01((lt - k as f64 * gap) / duration)
}

fn staggered(
    shapes: &[Shape],
    lt: f64,
    gap: f64,
    mut part: impl FnMut(&Shape, f64) -> Shape,
) -> MultiShape {
    let n = shapes.len();
    MultiShape {
        shapes: shapes
            .iter()
            .enumerate()
            .map(|(k, s)| part(s, stagger_progress(k, n, lt, gap)))
            .collect(),
    }
}

fn grow_arrow(arrow: &Arrow, lt: f64) -> Arrow {
    let centre = match (&arrow.start_head, &arrow.end_head) {
        (Some(a), Some(b)) => a.anchor.midpoint(b.anchor),
        _ => arrow.tail,
    };
    let grow = Affine::scale_about(lt, centre);
    let mut out = arrow.clone();
    out.body.apply_affine(grow);
    for head in out.start_head.iter_mut().chain(out.end_head.iter_mut()) {
        let moved = grow * head.anchor;
        head.shape.apply_affine(
            Affine::translate(moved - head.anchor) * Affine::scale_about(lt, head.anchor),
        );
        head.anchor = moved;
    }
    out.tail = grow * arrow.tail;
    out.tip = grow * arrow.tip;
    out
}

fn grow_axes(axes: &Axes, lt: f64) -> Axes {
    let mut out = axes.clone();
    out.x_axis = grow_arrow(&axes.x_axis, lt);
    out.y_axis = grow_arrow(&axes.y_axis, lt);
    for tick in &mut out.ticks {
        if let Some(b) = tick.bounds() {
            tick.apply_affine(Affine::scale_about(lt, b.center()));
        }
    }
    out
}

fn draw_then_fill(
    object: &MathObject,
    lt: f64,
    percent_drawing: f64,
    gap: f64,
    camera: &Camera,
) -> MathObject {
    let p = clamp01(percent_drawing);
    let (draw_lt, fill_lt) = if !object.has_fill() || p >= 1.0 {
        (clamp01(lt), 0.0)
    } else if p <= 0.0 {
        (1.0, clamp01(lt))
    } else {
        (clamp01(lt / p), clamp01((lt - p) / (1.0 - p)))
    };
    let stage = |s: &Shape, k: f64| {
        let mut style = s.style.clone();
        style.fill.a = s.style.fill.a * fill_lt;
        if s.style.thickness <= 0.0 {
            style.stroke = s.style.fill;
            style.thickness = DRAW_THICKNESS * (1.0 - fill_lt);
        }
        Shape::new(CanonicalPath::from_path(&s.path).reveal(k), style)
    };

    match object {
        MathObject::MultiShape(m) => {
            MathObject::MultiShape(staggered(&m.shapes, draw_lt, gap, stage))
        }
        MathObject::Shape(s) => MathObject::Shape(stage(s, draw_lt)),
        MathObject::Point { pos, style } => {
            let r = style.dot_radius / camera.pixels_per_unit();
            let disc = Shape::circle(*pos, r).with_style(style.clone());
            MathObject::Shape(stage(&disc, draw_lt))
        }
        other => other.clone(),
    }
}

/// Reveal of one object through a proxy.
#[derive(Clone, Debug, PartialEq)]
pub struct Creation {
    target: ObjectId,
    requested: Option<CreationStrategy>,
    strategy: Option<CreationStrategy>,
    proxy: Option<ObjectId>,
    /// Eased progress of the last drawn state.
    drawn_at: Option<f64>,
}

impl Creation {
    pub fn new(target: ObjectId, strategy: Option<CreationStrategy>) -> Self {
        Self {
            target,
            requested: strategy,
            strategy: None,
            proxy: None,
            drawn_at: None,
        }
    }

    pub fn target(&self) -> ObjectId {
        self.target
    }

    /// Strategy in use, known once initialized.
    pub fn strategy(&self) -> Option<CreationStrategy> {
        self.strategy
    }

    pub fn proxy(&self) -> Option<ObjectId> {
        self.proxy
    }

    pub(crate) fn init(&mut self, scene: &mut Scene) -> GeomotionResult<()> {
        let object = scene.object(self.target).ok_or_else(|| {
            GeomotionError::animation(format!("create: unknown object {}", self.target))
        })?;
        let kind = object.kind();
        let strategy = match self.requested {
            Some(s) if s.supports(kind) => s,
            Some(s) => {
                return Err(GeomotionError::unsupported(format!(
                    "{} creation cannot draw a {kind}",
                    s.name()
                )));
            }
            None => CreationStrategy::select(object, scene.creation_defaults()).ok_or_else(|| {
                GeomotionError::unsupported(format!("no creation strategy for a {kind}"))
            })?,
        };
        self.strategy = Some(strategy);
        self.proxy = Some(scene.insert(MathObject::Group(Vec::new())));
        Ok(())
    }

    pub(crate) fn render_at(&mut self, lt: f64, scene: &mut Scene) {
        let (Some(strategy), Some(proxy)) = (self.strategy, self.proxy) else {
            return;
        };
        let Some(object) = scene.object(self.target) else {
            return;
        };
        let state = strategy.render_with(object, lt, scene.camera(), scene.creation_defaults());
        scene.overwrite(proxy, state);
        self.drawn_at = Some(lt);
    }

    /// Redraw the proxy at the last progress from the target as it is now.
    pub(crate) fn refresh(&mut self, scene: &mut Scene) {
        if let Some(lt) = self.drawn_at {
            self.render_at(lt, scene);
        }
    }

    /// Undo a partial run: the proxy goes away and the target is hidden again.
    pub(crate) fn rollback(&mut self, scene: &mut Scene) {
        scene.remove(self.target);
        self.cleanup(scene);
    }

    pub(crate) fn clean_at(&self, lt: f64, scene: &mut Scene) {
        let Some(proxy) = self.proxy else {
            return;
        };
        if lt == 0.0 {
            scene.remove(self.target);
            scene.remove(proxy);
        } else if lt == 1.0 {
            scene.swap_visible(proxy, self.target);
            scene.remove(proxy);
        } else {
            scene.swap_visible(self.target, proxy);
        }
    }

    pub(crate) fn cleanup(&mut self, scene: &mut Scene) {
        if let Some(proxy) = self.proxy.take() {
            scene.discard(proxy);
        }
    }

    pub(crate) fn reset(&mut self) {
        self.strategy = None;
        self.proxy = None;
        self.drawn_at = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/creation.rs"]
mod tests;
