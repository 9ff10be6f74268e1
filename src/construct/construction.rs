//! Constructible objects: geometry derived from other scene objects.
//!
//! A [`Construction`] names its dependencies by [`ObjectId`] and rebuilds a fresh
//! [`MathObject`] from their current state. Rebuilding is pure: it reads the store and returns
//! new geometry, the scene decides where it goes.

use kurbo::{Point, Vec2};
use smallvec::smallvec;

use crate::construct::delimiter::DelimiterPlacement;
use crate::construct::label::{LabelSpec, TemplateArg, fill_template, layout_label};
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::foundation::ids::ObjectId;
use crate::foundation::math::{
    angle_bisector, circumcircle, ellipse_from_foci, line_intersection, perpendicular_bisector,
};
use crate::geom::object::{Arrow, InfiniteLine, MathObject, ObjectKind};
use crate::geom::shape::Shape;
use crate::graph::dependency::DepList;
use crate::style::props::Style;
use crate::text::compiler::TextCompiler;

/// Read access to the current state of scene objects.
pub trait ObjectLookup {
    fn lookup(&self, id: ObjectId) -> Option<&MathObject>;

    fn label_of(&self, id: ObjectId) -> Option<&str> {
        let _ = id;
        None
    }
}

/// Every way an object can be derived from others.
#[derive(Clone, Debug, PartialEq)]
pub enum Construction {
    MidPoint {
        a: ObjectId,
        b: ObjectId,
    },
    Segment {
        a: ObjectId,
        b: ObjectId,
    },
    /// Infinite line through two points.
    Line {
        a: ObjectId,
        b: ObjectId,
    },
    Polygon {
        vertices: Vec<ObjectId>,
    },
    CircleCenterPoint {
        center: ObjectId,
        through: ObjectId,
    },
    /// `radius` must be a scalar; its absolute value is used.
    CircleCenterRadius {
        center: ObjectId,
        radius: ObjectId,
    },
    /// Collinear points give an empty path anchored at their centroid.
    CircleThreePoints {
        a: ObjectId,
        b: ObjectId,
        c: ObjectId,
    },
    /// Collinear points give their centroid.
    CircumCenter {
        a: ObjectId,
        b: ObjectId,
        c: ObjectId,
    },
    /// `through` on the focal segment gives a flat ellipse.
    EllipseFociPoint {
        f1: ObjectId,
        f2: ObjectId,
        through: ObjectId,
    },
    /// Coincident points give a vertical line.
    PerpBisector {
        a: ObjectId,
        b: ObjectId,
    },
    /// Bisector line of the angle `a`-`vertex`-`c`.
    AngleBisector {
        a: ObjectId,
        vertex: ObjectId,
        c: ObjectId,
    },
    /// Intersection of two line-like objects (lines, segments, arrows). Parallel operands give
    /// the first defining point of `first`.
    Intersection {
        first: ObjectId,
        second: ObjectId,
    },
    /// Distance between two points, as a scalar.
    Distance {
        a: ObjectId,
        b: ObjectId,
    },
    ArrowBetween {
        tail: ObjectId,
        tip: ObjectId,
        head_len: f64,
        double: bool,
    },
    Delimiter {
        a: ObjectId,
        b: ObjectId,
        placement: DelimiterPlacement,
    },
    /// Anchor point beyond a delimiter, used to place its label.
    DelimiterTip {
        a: ObjectId,
        b: ObjectId,
        placement: DelimiterPlacement,
        distance: f64,
    },
    Label(LabelSpec),
}

impl Construction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MidPoint { .. } => "mid_point",
            Self::Segment { .. } => "segment",
            Self::Line { .. } => "line",
            Self::Polygon { .. } => "polygon",
            Self::CircleCenterPoint { .. } => "circle_center_point",
            Self::CircleCenterRadius { .. } => "circle_center_radius",
            Self::CircleThreePoints { .. } => "circle_three_points",
            Self::CircumCenter { .. } => "circum_center",
            Self::EllipseFociPoint { .. } => "ellipse_foci_point",
            Self::PerpBisector { .. } => "perp_bisector",
            Self::AngleBisector { .. } => "angle_bisector",
            Self::Intersection { .. } => "intersection",
            Self::Distance { .. } => "distance",
            Self::ArrowBetween { .. } => "arrow_between",
            Self::Delimiter { .. } => "delimiter",
            Self::DelimiterTip { .. } => "delimiter_tip",
            Self::Label(_) => "label",
        }
    }

    /// Direct dependencies in declaration order.
    pub fn dependencies(&self) -> DepList {
        match self {
            Self::MidPoint { a, b }
            | Self::Segment { a, b }
            | Self::Line { a, b }
            | Self::PerpBisector { a, b }
            | Self::Distance { a, b }
            | Self::Delimiter { a, b, .. }
            | Self::DelimiterTip { a, b, .. } => smallvec![*a, *b],
            Self::Polygon { vertices } => vertices.iter().copied().collect(),
            Self::CircleCenterPoint { center, through } => smallvec![*center, *through],
            Self::CircleCenterRadius { center, radius } => smallvec![*center, *radius],
            Self::CircleThreePoints { a, b, c } | Self::CircumCenter { a, b, c } => {
                smallvec![*a, *b, *c]
            }
            Self::EllipseFociPoint { f1, f2, through } => smallvec![*f1, *f2, *through],
            Self::AngleBisector { a, vertex, c } => smallvec![*a, *vertex, *c],
            Self::Intersection { first, second } => smallvec![*first, *second],
            Self::ArrowBetween { tail, tip, .. } => smallvec![*tail, *tip],
            Self::Label(label) => label.args.iter().chain(label.anchor.iter()).copied().collect(),
        }
    }

    /// Kind of object [`Construction::build`] produces.
    pub fn output_kind(&self) -> ObjectKind {
        match self {
            Self::MidPoint { .. }
            | Self::CircumCenter { .. }
            | Self::Intersection { .. }
            | Self::DelimiterTip { .. } => ObjectKind::Point,
            Self::Distance { .. } => ObjectKind::Scalar,
            Self::Line { .. } | Self::PerpBisector { .. } | Self::AngleBisector { .. } => {
                ObjectKind::Line
            }
            Self::ArrowBetween { .. } => ObjectKind::Arrow,
            Self::Delimiter { placement, .. } => match placement.kind {
                crate::construct::delimiter::DelimiterKind::LengthArrow => ObjectKind::Arrow,
                _ => ObjectKind::Shape,
            },
            Self::Label(_) => ObjectKind::MultiShape,
            Self::Segment { .. }
            | Self::Polygon { .. }
            | Self::CircleCenterPoint { .. }
            | Self::CircleCenterRadius { .. }
            | Self::CircleThreePoints { .. }
            | Self::EllipseFociPoint { .. } => ObjectKind::Shape,
        }
    }

    /// Recompute the geometry from the current state of the dependencies.
    pub fn build(
        &self,
        store: &impl ObjectLookup,
        text: &dyn TextCompiler,
    ) -> GeomotionResult<MathObject> {
        let pt = |id: ObjectId| point_of(store, id);
        let style = Style::default;
        let obj = match self {
            Self::MidPoint { a, b } => MathObject::point(pt(*a)?.midpoint(pt(*b)?)),
            Self::Segment { a, b } => MathObject::Shape(Shape::segment(pt(*a)?, pt(*b)?)),
            Self::Line { a, b } => line(pt(*a)?, pt(*b)?),
            Self::Polygon { vertices } => {
                let points = vertices
                    .iter()
                    .map(|v| pt(*v))
                    .collect::<GeomotionResult<Vec<_>>>()?;
                MathObject::Shape(Shape::polygon(&points))
            }
            Self::CircleCenterPoint { center, through } => {
                let c = pt(*center)?;
                MathObject::Shape(Shape::circle(c, c.distance(pt(*through)?)))
            }
            Self::CircleCenterRadius { center, radius } => {
                let r = scalar_of(store, *radius)?;
                MathObject::Shape(Shape::circle(pt(*center)?, r.abs()))
            }
            Self::CircleThreePoints { a, b, c } => {
                let cc = circumcircle(pt(*a)?, pt(*b)?, pt(*c)?);
                // Collinear points: circumcircle() falls back to the centroid.
                if cc.degenerate {
                    MathObject::Shape(Shape::empty_at(cc.center, style()))
                } else {
                    MathObject::Shape(Shape::circle(cc.center, cc.radius))
                }
            }
            Self::CircumCenter { a, b, c } => {
                MathObject::point(circumcircle(pt(*a)?, pt(*b)?, pt(*c)?).center)
            }
            Self::EllipseFociPoint { f1, f2, through } => {
                let e = ellipse_from_foci(pt(*f1)?, pt(*f2)?, pt(*through)?);
                // All three points coincide. A point on the focal segment gives a flat ellipse.
                if e.semi_major <= 0.0 {
                    MathObject::Shape(Shape::empty_at(e.center, style()))
                } else {
                    MathObject::Shape(Shape::ellipse(
                        e.center,
                        Vec2::new(e.semi_major, e.semi_minor),
                        e.rotation,
                    ))
                }
            }
            Self::PerpBisector { a, b } => {
                let (p, dir) = perpendicular_bisector(pt(*a)?, pt(*b)?);
                line(p, p + dir)
            }
            Self::AngleBisector { a, vertex, c } => {
                let v = pt(*vertex)?;
                line(v, v + angle_bisector(pt(*a)?, v, pt(*c)?))
            }
            Self::Intersection { first, second } => {
                let (p1, p2) = line_points_of(store, *first)?;
                let (q1, q2) = line_points_of(store, *second)?;
                MathObject::point(line_intersection(p1, p2, q1, q2).unwrap_or(p1))
            }
            Self::Distance { a, b } => MathObject::Scalar(pt(*a)?.distance(pt(*b)?)),
            Self::ArrowBetween {
                tail,
                tip,
                head_len,
                double,
            } => MathObject::Arrow(Arrow::between(
                pt(*tail)?,
                pt(*tip)?,
                *head_len,
                *double,
                &style(),
            )),
            Self::Delimiter { a, b, placement } => placement.build(pt(*a)?, pt(*b)?),
            Self::DelimiterTip {
                a,
                b,
                placement,
                distance,
            } => MathObject::point(placement.tip(pt(*a)?, pt(*b)?, *distance)),
            Self::Label(label) => {
                let args = label
                    .args
                    .iter()
                    .map(|id| template_arg(store, *id))
                    .collect::<GeomotionResult<Vec<_>>>()?;
                let content = fill_template(&label.template, &args)?;
                let anchor = match label.anchor {
                    Some(id) => pt(id)?,
                    None => Point::ORIGIN,
                };
                MathObject::MultiShape(layout_label(&content, text, anchor, label.height))
            }
        };
        Ok(obj)
    }
}

fn line(a: Point, b: Point) -> MathObject {
    MathObject::Line(InfiniteLine {
        a,
        b,
        style: Style::default(),
    })
}

fn fetch(store: &impl ObjectLookup, id: ObjectId) -> GeomotionResult<&MathObject> {
    store
        .lookup(id)
        .ok_or_else(|| GeomotionError::construction(format!("missing dependency {}", name(store, id))))
}

fn name(store: &impl ObjectLookup, id: ObjectId) -> String {
    match store.label_of(id) {
        Some(l) => format!("'{l}'"),
        None => id.to_string(),
    }
}

fn wrong_kind(store: &impl ObjectLookup, id: ObjectId, want: &str, got: ObjectKind) -> GeomotionError {
    GeomotionError::construction(format!(
        "dependency {} must be a {want}, found {got}",
        name(store, id)
    ))
}

fn point_of(store: &impl ObjectLookup, id: ObjectId) -> GeomotionResult<Point> {
    let obj = fetch(store, id)?;
    obj.as_point()
        .ok_or_else(|| wrong_kind(store, id, "point", obj.kind()))
}

fn scalar_of(store: &impl ObjectLookup, id: ObjectId) -> GeomotionResult<f64> {
    let obj = fetch(store, id)?;
    obj.as_scalar()
        .ok_or_else(|| wrong_kind(store, id, "scalar", obj.kind()))
}

fn line_points_of(store: &impl ObjectLookup, id: ObjectId) -> GeomotionResult<(Point, Point)> {
    let obj = fetch(store, id)?;
    obj.line_points()
        .ok_or_else(|| wrong_kind(store, id, "line", obj.kind()))
}

fn template_arg(store: &impl ObjectLookup, id: ObjectId) -> GeomotionResult<TemplateArg> {
    let obj = fetch(store, id)?;
    match obj {
        MathObject::Scalar(v) => Ok(TemplateArg::Number(*v)),
        MathObject::Point { pos, .. } => Ok(TemplateArg::Point(*pos)),
        other => Err(wrong_kind(store, id, "scalar or point", other.kind())),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/construct/construction.rs"]
mod tests;
