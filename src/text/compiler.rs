use std::collections::HashMap;

use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::geom::shape::Shape;
use crate::text::svg_import::shapes_from_svg;

/// Turns a text string into drawable glyph shapes.
///
/// Implementations are black boxes to the rest of the crate (a LaTeX toolchain, a font shaper
/// or a cache of pre-compiled output). Shapes are returned in math units with the baseline near
/// y = 0.
pub trait TextCompiler {
    fn compile(&self, text: &str) -> GeomotionResult<Vec<Shape>>;
}

/// Compiler that knows no text at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTextCompiler;

impl TextCompiler for NoTextCompiler {
    fn compile(&self, text: &str) -> GeomotionResult<Vec<Shape>> {
        Err(GeomotionError::unsupported(format!(
            "no text compiler configured (text {text:?})"
        )))
    }
}

/// Pre-compiled glyph shapes keyed by the exact source string.
#[derive(Clone, Debug, Default)]
pub struct GlyphCache {
    entries: HashMap<String, Vec<Shape>>,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, text: impl Into<String>, shapes: Vec<Shape>) {
        self.entries.insert(text.into(), shapes);
    }

    /// Import compiled SVG output (for example from an external LaTeX run) for `text`.
    pub fn insert_svg(&mut self, text: impl Into<String>, bytes: &[u8]) -> GeomotionResult<()> {
        let shapes = shapes_from_svg(bytes)?;
        self.insert(text, shapes);
        Ok(())
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains_key(text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TextCompiler for GlyphCache {
    fn compile(&self, text: &str) -> GeomotionResult<Vec<Shape>> {
        self.entries
            .get(text)
            .cloned()
            .ok_or_else(|| GeomotionError::unsupported(format!("no compiled glyphs for {text:?}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/compiler.rs"]
mod tests;
