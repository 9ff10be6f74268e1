use kurbo::{Affine, Point, Vec2};

use crate::animation::lerp::Lerp;
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::foundation::ids::ObjectId;
use crate::geom::object::MathObject;
use crate::scene::scene::Scene;
use crate::style::props::Style;

/// What a command does to its targets at full progress.
#[derive(Clone, Debug, PartialEq)]
pub enum CommandOp {
    Shift(Vec2),
    /// Scale about `center`, or about the centre of each target's bounding box.
    Scale { factor: f64, center: Option<Point> },
    /// Counter-clockwise rotation in radians.
    Rotate { angle: f64, center: Option<Point> },
    Affine(Affine),
    FadeIn,
    FadeOut,
    SetStyle(Style),
}

impl CommandOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Shift(_) => "shift",
            Self::Scale { .. } => "scale",
            Self::Rotate { .. } => "rotate",
            Self::Affine(_) => "affine",
            Self::FadeIn => "fade_in",
            Self::FadeOut => "fade_out",
            Self::SetStyle(_) => "set_style",
        }
    }

    /// `snapshot` transformed by this operation at eased progress `lt`.
    fn apply(&self, snapshot: &MathObject, lt: f64) -> MathObject {
        let mut out = snapshot.clone();
        match self {
            Self::Shift(v) => out.apply_affine(Affine::translate(*v * lt)),
            Self::Scale { factor, center } => {
                let c = center.unwrap_or_else(|| snapshot.center());
                out.apply_affine(Affine::scale_about(1.0 + (factor - 1.0) * lt, c));
            }
            Self::Rotate { angle, center } => {
                let c = center.unwrap_or_else(|| snapshot.center());
                out.apply_affine(Affine::rotate_about(angle * lt, c));
            }
            Self::Affine(a) => out.apply_affine(<Affine as Lerp>::lerp(&Affine::IDENTITY, a, lt)),
            Self::FadeIn => out.map_styles(&mut |s| *s = s.with_alpha_scale(lt)),
            Self::FadeOut => out.map_styles(&mut |s| *s = s.with_alpha_scale(1.0 - lt)),
            Self::SetStyle(to) => out.map_styles(&mut |s| *s = s.lerp(to, lt)),
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Target {
    id: ObjectId,
    snapshot: MathObject,
    was_free: bool,
    was_visible: bool,
}

/// Direct mutation of existing objects.
///
/// Every frame restores the targets from the snapshot taken at start and applies the operation
/// at the current progress, so replaying a frame leaves the same state.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    ids: Vec<ObjectId>,
    op: CommandOp,
    targets: Vec<Target>,
}

impl Command {
    pub fn new(targets: Vec<ObjectId>, op: CommandOp) -> Self {
        Self {
            ids: targets,
            op,
            targets: Vec::new(),
        }
    }

    pub fn op(&self) -> &CommandOp {
        &self.op
    }

    pub fn targets(&self) -> &[ObjectId] {
        &self.ids
    }

    pub(crate) fn init(&mut self, scene: &mut Scene) -> GeomotionResult<()> {
        if self.ids.is_empty() {
            return Err(GeomotionError::animation(format!(
                "{}: no targets",
                self.op.name()
            )));
        }
        let mut targets = Vec::with_capacity(self.ids.len());
        for &id in &self.ids {
            let snapshot = scene.object(id).cloned().ok_or_else(|| {
                GeomotionError::animation(format!("{}: unknown object {id}", self.op.name()))
            })?;
            targets.push(Target {
                id,
                snapshot,
                was_free: scene.is_free(id),
                was_visible: scene.contains(id),
            });
        }
        // Derived targets follow the command, not their dependencies, while it runs.
        for t in &targets {
            if !t.was_free {
                scene.set_free(t.id, true);
            }
            if self.op == CommandOp::FadeIn {
                scene.add(t.id);
            }
        }
        self.targets = targets;
        Ok(())
    }

    pub(crate) fn render_at(&self, lt: f64, scene: &mut Scene) {
        for t in &self.targets {
            let state = self.op.apply(&t.snapshot, lt);
            if let Some(obj) = scene.object_mut(t.id) {
                *obj = state;
            }
        }
    }

    pub(crate) fn clean_at(&self, lt: f64, scene: &mut Scene) {
        if self.op == CommandOp::FadeOut && lt == 1.0 {
            for t in &self.targets {
                scene.remove(t.id);
            }
        }
    }

    pub(crate) fn cleanup(&mut self, scene: &mut Scene) {
        for t in &self.targets {
            if self.op == CommandOp::FadeOut
                && !scene.contains(t.id)
                && let Some(obj) = scene.object_mut(t.id)
            {
                *obj = t.snapshot.clone();
            }
            if !t.was_free {
                scene.set_free(t.id, false);
            }
        }
    }

    /// Undo a partial run: targets get their snapshots, visibility and derivation back.
    pub(crate) fn rollback(&mut self, scene: &mut Scene) {
        for t in &self.targets {
            if let Some(obj) = scene.object_mut(t.id) {
                *obj = t.snapshot.clone();
            }
            if t.was_visible {
                scene.add(t.id);
            } else {
                scene.remove(t.id);
            }
            if !t.was_free {
                scene.set_free(t.id, false);
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        self.targets.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/commands.rs"]
mod tests;
