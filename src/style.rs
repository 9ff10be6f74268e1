pub mod color;
pub mod props;
