//! Transform: morphing one object into another through a proxy.

use kurbo::{BezPath, Point};

use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::foundation::ids::ObjectId;
use crate::geom::object::{Arrow, ArrowHead, MathObject, MultiShape, ObjectKind};
use crate::geom::path::AlignedPaths;
use crate::geom::shape::Shape;
use crate::scene::scene::Scene;
use crate::style::props::Style;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformStrategy {
    /// Shape to shape through aligned control points.
    PointInterpolation,
    /// Part by part; unmatched parts collapse to the other side's centre.
    MultiShapeInterpolation,
    PointToPoint,
    ArrowInterpolation,
}

impl TransformStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PointInterpolation => "point_interpolation",
            Self::MultiShapeInterpolation => "multi_shape_interpolation",
            Self::PointToPoint => "point_to_point",
            Self::ArrowInterpolation => "arrow_interpolation",
        }
    }

    /// Strategy for morphing an `origin` kind into a `destiny` kind, `None` when the pair is
    /// not supported.
    pub fn select(origin: ObjectKind, destiny: ObjectKind) -> Option<Self> {
        use ObjectKind as K;
        match (origin, destiny) {
            (K::Point, K::Point) => Some(Self::PointToPoint),
            (K::Shape, K::Shape) => Some(Self::PointInterpolation),
            (K::Arrow, K::Arrow) => Some(Self::ArrowInterpolation),
            (K::MultiShape | K::Shape, K::MultiShape | K::Shape) => {
                Some(Self::MultiShapeInterpolation)
            }
            _ => None,
        }
    }
}

/// One pair of aligned shapes.
#[derive(Clone, Debug, PartialEq)]
struct PartMorph {
    paths: AlignedPaths,
    from: Style,
    to: Style,
}

impl PartMorph {
    fn new(a: &Shape, b: &Shape) -> Self {
        Self {
            paths: AlignedPaths::new(&a.path, &b.path),
            from: a.style.clone(),
            to: b.style.clone(),
        }
    }

    fn at(&self, lt: f64) -> Shape {
        Shape::new(self.paths.lerp(lt), self.from.lerp(&self.to, lt))
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Plan {
    Point {
        from: Point,
        to: Point,
        from_style: Style,
        to_style: Style,
    },
    Shape(PartMorph),
    Multi(Vec<PartMorph>),
    Arrow {
        body: PartMorph,
        start: Option<(PartMorph, Point, Point)>,
        end: Option<(PartMorph, Point, Point)>,
        tail: (Point, Point),
        tip: (Point, Point),
    },
}

/// Two-point degenerate path at `at`.
fn point_path(at: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(at);
    path.line_to(at);
    path
}

/// Invisible stand-in for a missing part, collapsed at `at` with the partner's style.
fn ghost(at: Point, partner: &Shape) -> Shape {
    Shape::new(point_path(at), partner.style.with_alpha_scale(0.0))
}

fn parts_of(object: &MathObject) -> Vec<Shape> {
    match object {
        MathObject::MultiShape(m) => m.shapes.clone(),
        MathObject::Shape(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn pair_parts(origin: &MathObject, destiny: &MathObject) -> Vec<PartMorph> {
    let a = parts_of(origin);
    let b = parts_of(destiny);
    let (ca, cb) = (origin.center(), destiny.center());
    (0..a.len().max(b.len()))
        .filter_map(|i| match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) => Some(PartMorph::new(x, y)),
            (Some(x), None) => Some(PartMorph::new(x, &ghost(cb, x))),
            (None, Some(y)) => Some(PartMorph::new(&ghost(ca, y), y)),
            (None, None) => None,
        })
        .collect()
}

fn head_morph(
    a: Option<&ArrowHead>,
    b: Option<&ArrowHead>,
) -> Option<(PartMorph, Point, Point)> {
    match (a, b) {
        (Some(x), Some(y)) => Some((PartMorph::new(&x.shape, &y.shape), x.anchor, y.anchor)),
        (Some(x), None) => Some((
            PartMorph::new(&x.shape, &ghost(x.anchor, &x.shape)),
            x.anchor,
            x.anchor,
        )),
        (None, Some(y)) => Some((
            PartMorph::new(&ghost(y.anchor, &y.shape), &y.shape),
            y.anchor,
            y.anchor,
        )),
        (None, None) => None,
    }
}

impl Plan {
    fn build(
        strategy: TransformStrategy,
        origin: &MathObject,
        destiny: &MathObject,
    ) -> GeomotionResult<Self> {
        let mismatch = || {
            GeomotionError::unsupported(format!(
                "{} cannot morph a {} into a {}",
                strategy.name(),
                origin.kind(),
                destiny.kind()
            ))
        };
        Ok(match (strategy, origin, destiny) {
            (
                TransformStrategy::PointToPoint,
                MathObject::Point { pos: a, style: sa },
                MathObject::Point { pos: b, style: sb },
            ) => Self::Point {
                from: *a,
                to: *b,
                from_style: sa.clone(),
                to_style: sb.clone(),
            },
            (TransformStrategy::PointInterpolation, MathObject::Shape(a), MathObject::Shape(b)) => {
                Self::Shape(PartMorph::new(a, b))
            }
            (TransformStrategy::MultiShapeInterpolation, _, _)
                if matches!(origin.kind(), ObjectKind::MultiShape | ObjectKind::Shape)
                    && matches!(destiny.kind(), ObjectKind::MultiShape | ObjectKind::Shape) =>
            {
                Self::Multi(pair_parts(origin, destiny))
            }
            (TransformStrategy::ArrowInterpolation, MathObject::Arrow(a), MathObject::Arrow(b)) => {
                Self::Arrow {
                    body: PartMorph::new(&a.body, &b.body),
                    start: head_morph(a.start_head.as_ref(), b.start_head.as_ref()),
                    end: head_morph(a.end_head.as_ref(), b.end_head.as_ref()),
                    tail: (a.tail, b.tail),
                    tip: (a.tip, b.tip),
                }
            }
            _ => return Err(mismatch()),
        })
    }

    fn at(&self, lt: f64) -> MathObject {
        match self {
            Self::Point {
                from,
                to,
                from_style,
                to_style,
            } => MathObject::Point {
                pos: from.lerp(*to, lt),
                style: from_style.lerp(to_style, lt),
            },
            Self::Shape(m) => MathObject::Shape(m.at(lt)),
            Self::Multi(parts) => MathObject::MultiShape(MultiShape {
                shapes: parts.iter().map(|m| m.at(lt)).collect(),
            }),
            Self::Arrow {
                body,
                start,
                end,
                tail,
                tip,
            } => {
                let head = |h: &(PartMorph, Point, Point)| ArrowHead {
                    shape: h.0.at(lt),
                    anchor: h.1.lerp(h.2, lt),
                };
                MathObject::Arrow(Arrow {
                    body: body.at(lt),
                    start_head: start.as_ref().map(head),
                    end_head: end.as_ref().map(head),
                    tail: tail.0.lerp(tail.1, lt),
                    tip: tip.0.lerp(tip.1, lt),
                })
            }
        }
    }
}

/// Morph of `origin` into `destiny`. Both are snapshotted when the animation starts.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    origin: ObjectId,
    destiny: ObjectId,
    requested: Option<TransformStrategy>,
    plan: Option<Plan>,
    proxy: Option<ObjectId>,
}

impl Transform {
    pub fn new(origin: ObjectId, destiny: ObjectId, strategy: Option<TransformStrategy>) -> Self {
        Self {
            origin,
            destiny,
            requested: strategy,
            plan: None,
            proxy: None,
        }
    }

    pub fn origin(&self) -> ObjectId {
        self.origin
    }

    pub fn destiny(&self) -> ObjectId {
        self.destiny
    }

    pub fn proxy(&self) -> Option<ObjectId> {
        self.proxy
    }

    pub(crate) fn init(&mut self, scene: &mut Scene) -> GeomotionResult<()> {
        let fetch = |id: ObjectId| {
            scene
                .object(id)
                .ok_or_else(|| GeomotionError::animation(format!("transform: unknown object {id}")))
        };
        let origin = fetch(self.origin)?;
        let destiny = fetch(self.destiny)?;
        let strategy = match self.requested {
            Some(s) => s,
            None => TransformStrategy::select(origin.kind(), destiny.kind()).ok_or_else(|| {
                GeomotionError::unsupported(format!(
                    "no transform from a {} into a {}",
                    origin.kind(),
                    destiny.kind()
                ))
            })?,
        };
        let plan = Plan::build(strategy, origin, destiny)?;
        let start = plan.at(0.0);
        self.plan = Some(plan);
        self.proxy = Some(scene.insert(start));
        Ok(())
    }

    pub(crate) fn render_at(&self, lt: f64, scene: &mut Scene) {
        if let (Some(plan), Some(proxy)) = (&self.plan, self.proxy) {
            scene.overwrite(proxy, plan.at(lt));
        }
    }

    pub(crate) fn clean_at(&self, lt: f64, scene: &mut Scene) {
        let Some(proxy) = self.proxy else {
            return;
        };
        if lt == 0.0 {
            scene.swap_visible(proxy, self.origin);
            scene.remove(proxy);
            scene.remove(self.destiny);
        } else if lt == 1.0 {
            if scene.contains(proxy) {
                scene.swap_visible(proxy, self.destiny);
            } else {
                scene.swap_visible(self.origin, self.destiny);
            }
            scene.remove(proxy);
            scene.remove(self.origin);
        } else {
            scene.swap_visible(self.origin, proxy);
            scene.remove(self.destiny);
        }
    }

    pub(crate) fn cleanup(&mut self, scene: &mut Scene) {
        if let Some(proxy) = self.proxy.take() {
            scene.discard(proxy);
        }
    }

    /// Undo a partial run: `origin` is drawn again and the proxy goes away.
    pub(crate) fn rollback(&mut self, scene: &mut Scene) {
        self.clean_at(0.0, scene);
        self.cleanup(scene);
    }

    pub(crate) fn reset(&mut self) {
        self.plan = None;
        self.proxy = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transform.rs"]
mod tests;
