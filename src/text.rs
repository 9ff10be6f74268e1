pub mod compiler;
pub mod svg_import;
