use std::path::Path;

use anyhow::Context as _;
use kurbo::Rect;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::geom::object::ObjectKind;
use crate::style::color::Color;
use crate::style::props::Style;

/// Share of a draw-then-fill reveal spent drawing outlines.
pub const PERCENT_DRAWING: f64 = 0.6;

/// Default stagger between parts of a multi-part reveal, as a share of the run.
pub const DEFAULT_GAP: f64 = 0.1;

/// Everything a scene needs to know up front, passed explicitly to [`crate::Scene::new`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub fps: Fps,
    pub canvas: Canvas,
    /// Math-space rectangle fitted into the canvas.
    pub view: Rect,
    pub background: Color,
    pub styles: DefaultStyles,
    pub creation: CreationDefaults,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            canvas: Canvas::default(),
            view: Rect::new(-4.0, -3.0, 4.0, 3.0),
            background: Color::BLACK,
            styles: DefaultStyles::default(),
            creation: CreationDefaults::default(),
        }
    }
}

impl SceneConfig {
    pub fn from_json_str(s: &str) -> GeomotionResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> GeomotionResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> GeomotionResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(GeomotionError::validation("canvas width/height must be > 0"));
        }
        let v = self.view;
        if !(v.width().abs() > 0.0 && v.height().abs() > 0.0)
            || ![v.x0, v.y0, v.x1, v.y1].iter().all(|c| c.is_finite())
        {
            return Err(GeomotionError::validation(
                "view must be a finite rectangle with positive area",
            ));
        }
        let c = &self.creation;
        if !(0.0..=1.0).contains(&c.percent_drawing) {
            return Err(GeomotionError::validation(
                "creation.percent_drawing must be in [0, 1]",
            ));
        }
        if !(0.0..1.0).contains(&c.gap) {
            return Err(GeomotionError::validation("creation.gap must be in [0, 1)"));
        }
        Ok(())
    }
}

/// Styles given to newly built objects, by kind.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DefaultStyles {
    pub shape: Style,
    pub point: Style,
    pub text: Style,
}

impl Default for DefaultStyles {
    fn default() -> Self {
        Self {
            shape: Style::default(),
            point: Style::filled(Color::WHITE),
            text: Style::filled(Color::WHITE),
        }
    }
}

impl DefaultStyles {
    pub fn for_kind(&self, kind: ObjectKind) -> &Style {
        match kind {
            ObjectKind::Point => &self.point,
            ObjectKind::MultiShape => &self.text,
            _ => &self.shape,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CreationDefaults {
    pub gap: f64,
    pub percent_drawing: f64,
}

impl Default for CreationDefaults {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            percent_drawing: PERCENT_DRAWING,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
