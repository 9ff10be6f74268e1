#[allow(clippy::module_inception)]
pub mod animation;
pub mod commands;
pub mod creation;
pub mod ease;
pub mod lerp;
pub mod timing;
pub mod transform;
