#![forbid(unsafe_code)]

pub mod animation;
pub mod construct;
pub mod foundation;
pub mod geom;
pub mod graph;
pub mod scene;
pub mod script;
pub mod style;
pub mod text;

pub use animation::animation::{Animation, AnimationKind};
pub use animation::commands::CommandOp;
pub use animation::creation::CreationStrategy;
pub use animation::ease::Ease;
pub use animation::timing::AnimState;
pub use animation::transform::TransformStrategy;
pub use construct::construction::Construction;
pub use construct::delimiter::{DelimiterKind, DelimiterPlacement};
pub use construct::label::LabelSpec;
pub use foundation::core::{Canvas, Fps, FrameIndex};
pub use foundation::error::{GeomotionError, GeomotionResult};
pub use foundation::ids::ObjectId;
pub use geom::object::{MathObject, ObjectKind};
pub use geom::shape::Shape;
pub use graph::dependency::{DependencyGraph, UpdateReport};
pub use scene::camera::Camera;
pub use scene::config::SceneConfig;
pub use scene::render::{RasterRenderer, RecordingRenderer, Renderer, SvgRenderer};
pub use scene::scene::{PlayStats, Scene};
pub use scene::sink::{FrameRGBA, FrameSink, InMemorySink, PngSequenceSink};
pub use script::load::{build_scene, evaluation_order, parse_script, read_script, run_timeline};
pub use script::model::Script;
pub use style::color::Color;
pub use style::props::{Style, StylePatch};
pub use text::compiler::{GlyphCache, NoTextCompiler, TextCompiler};
