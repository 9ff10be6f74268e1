pub mod camera;
pub mod config;
pub mod render;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod sink;
