pub mod construction;
pub mod delimiter;
pub mod label;
