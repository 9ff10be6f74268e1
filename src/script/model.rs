//! JSON scene script.
//!
//! ```json
//! {
//!   "config": { "fps": { "num": 30, "den": 1 } },
//!   "objects": [
//!     { "label": "A", "point": [0, 0] },
//!     { "label": "B", "point": [2, 1] },
//!     { "label": "AB", "construct": { "type": "segment", "a": "A", "b": "B" }, "visible": true }
//!   ],
//!   "timeline": [
//!     { "play": [{ "type": "create", "target": "AB", "run_time": 1.0 }] },
//!     { "move_point": { "target": "B", "to": [3, 0] } },
//!     { "wait": 0.5 }
//!   ]
//! }
//! ```
//!
//! Objects refer to each other by label, in any order.

use std::collections::BTreeMap;

use kurbo::{Point, Rect};

use crate::animation::creation::CreationStrategy;
use crate::animation::ease::Ease;
use crate::construct::delimiter::DelimiterPlacement;
use crate::scene::config::SceneConfig;
use crate::style::props::StylePatch;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Script {
    pub config: SceneConfig,
    /// Pre-compiled text: label string to SVG document.
    pub glyphs: BTreeMap<String, String>,
    pub objects: Vec<ObjectDef>,
    pub timeline: Vec<Step>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ObjectDef {
    pub label: String,
    #[serde(flatten)]
    pub source: SourceDef,
    #[serde(default)]
    pub style: StylePatch,
    /// Add to the scene before the timeline starts.
    #[serde(default)]
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceDef {
    Point([f64; 2]),
    Scalar(f64),
    Shape(ShapeDef),
    Axes(AxesDef),
    Construct(ConstructDef),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDef {
    Segment { a: [f64; 2], b: [f64; 2] },
    Polyline { points: Vec<[f64; 2]> },
    Polygon { points: Vec<[f64; 2]> },
    RegularPolygon { center: [f64; 2], radius: f64, sides: usize },
    Circle { center: [f64; 2], radius: f64 },
    Rectangle { min: [f64; 2], max: [f64; 2] },
    /// SVG path data.
    Svg { d: String },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AxesDef {
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    #[serde(default = "default_tick_step")]
    pub tick_step: f64,
    #[serde(default = "default_tick_size")]
    pub tick_size: f64,
}

fn default_tick_step() -> f64 {
    1.0
}

fn default_tick_size() -> f64 {
    0.2
}

fn default_head_len() -> f64 {
    0.25
}

fn default_label_height() -> f64 {
    0.4
}

/// A construction with its dependencies named by label.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstructDef {
    MidPoint { a: String, b: String },
    Segment { a: String, b: String },
    Line { a: String, b: String },
    Polygon { vertices: Vec<String> },
    CircleCenterPoint { center: String, through: String },
    CircleCenterRadius { center: String, radius: String },
    CircleThreePoints { a: String, b: String, c: String },
    CircumCenter { a: String, b: String, c: String },
    EllipseFociPoint { f1: String, f2: String, through: String },
    PerpBisector { a: String, b: String },
    AngleBisector { a: String, vertex: String, c: String },
    Intersection { first: String, second: String },
    Distance { a: String, b: String },
    Arrow {
        tail: String,
        tip: String,
        #[serde(default = "default_head_len")]
        head_len: f64,
        #[serde(default)]
        double: bool,
    },
    Delimiter {
        a: String,
        b: String,
        placement: DelimiterPlacement,
    },
    DelimiterTip {
        a: String,
        b: String,
        placement: DelimiterPlacement,
        #[serde(default)]
        distance: f64,
    },
    Label {
        template: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        anchor: Option<String>,
        #[serde(default = "default_label_height")]
        height: f64,
    },
}

impl ConstructDef {
    /// Labels this definition refers to.
    pub fn references(&self) -> Vec<&str> {
        let refs: Vec<&String> = match self {
            Self::MidPoint { a, b }
            | Self::Segment { a, b }
            | Self::Line { a, b }
            | Self::PerpBisector { a, b }
            | Self::Distance { a, b }
            | Self::Delimiter { a, b, .. }
            | Self::DelimiterTip { a, b, .. } => vec![a, b],
            Self::Polygon { vertices } => vertices.iter().collect(),
            Self::CircleCenterPoint { center, through } => vec![center, through],
            Self::CircleCenterRadius { center, radius } => vec![center, radius],
            Self::CircleThreePoints { a, b, c } | Self::CircumCenter { a, b, c } => vec![a, b, c],
            Self::EllipseFociPoint { f1, f2, through } => vec![f1, f2, through],
            Self::AngleBisector { a, vertex, c } => vec![a, vertex, c],
            Self::Intersection { first, second } => vec![first, second],
            Self::Arrow { tail, tip, .. } => vec![tail, tip],
            Self::Label { args, anchor, .. } => args.iter().chain(anchor.iter()).collect(),
        };
        refs.into_iter().map(String::as_str).collect()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Animations played together.
    Play(Vec<AnimationDef>),
    Wait(f64),
    Add(Vec<String>),
    Remove(Vec<String>),
    /// Instant move of a free point.
    MovePoint { target: String, to: [f64; 2] },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationDef {
    #[serde(flatten)]
    pub action: ActionDef,
    #[serde(default = "default_run_time")]
    pub run_time: f64,
    #[serde(default)]
    pub ease: Option<Ease>,
}

fn default_run_time() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionDef {
    Create {
        target: String,
        #[serde(default)]
        strategy: Option<CreationStrategy>,
    },
    Transform {
        origin: String,
        destiny: String,
    },
    Shift {
        targets: Vec<String>,
        by: [f64; 2],
    },
    Scale {
        targets: Vec<String>,
        factor: f64,
        #[serde(default)]
        center: Option<[f64; 2]>,
    },
    Rotate {
        targets: Vec<String>,
        /// Degrees, counter-clockwise.
        degrees: f64,
        #[serde(default)]
        center: Option<[f64; 2]>,
    },
    FadeIn {
        targets: Vec<String>,
    },
    FadeOut {
        targets: Vec<String>,
    },
    Wait,
}

pub(crate) fn point(p: [f64; 2]) -> Point {
    Point::new(p[0], p[1])
}

pub(crate) fn rect(min: [f64; 2], max: [f64; 2]) -> Rect {
    Rect::from_points(point(min), point(max))
}
