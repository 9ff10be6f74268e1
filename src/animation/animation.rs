//! Animation lifecycle.
//!
//! An [`Animation`] owns a [`Timing`] and one closed [`AnimationKind`]. The scene drives it:
//!
//! - [`Animation::initialize`] snapshots targets and registers proxies, or skips the animation;
//! - [`Animation::process`] advances one frame and applies the new progress;
//! - [`Animation::finish`] jumps to the end and cleans up.
//!
//! Progress is always recomputed from elapsed frames, so applying the same progress twice
//! leaves the scene in the same state.

use kurbo::{Affine, Point, Vec2};

use crate::animation::commands::{Command, CommandOp};
use crate::animation::creation::{Creation, CreationStrategy};
use crate::animation::ease::Ease;
use crate::animation::timing::{AnimState, Timing};
use crate::animation::transform::{Transform, TransformStrategy};
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::foundation::ids::ObjectId;
use crate::scene::scene::Scene;
use crate::style::props::Style;

#[derive(Clone, Debug, PartialEq)]
pub enum AnimationKind {
    Create(Creation),
    Transform(Transform),
    Command(Command),
    /// Holds the scene still.
    Wait,
    Sequence(Sequence),
}

/// Children played back to back over the parent's run.
#[derive(Clone, Debug, PartialEq)]
pub struct Sequence {
    children: Vec<Animation>,
}

impl Sequence {
    pub fn children(&self) -> &[Animation] {
        &self.children
    }

    /// Drive the children at raw parent progress `t`.
    fn apply(&mut self, t: f64, total: f64, scene: &mut Scene) {
        let elapsed = t * total;
        let mut start = 0.0;
        for child in &mut self.children {
            let run = child.timing.run_time.max(0.0);
            let end = start + run;
            if t >= 1.0 || elapsed >= end {
                child.finish(scene);
            } else if elapsed >= start {
                if child.timing.state() == AnimState::NotStarted && !child.initialize(scene) {
                    start = end;
                    continue;
                }
                if child.timing.state() == AnimState::Running {
                    child.do_anim((elapsed - start) / run, scene);
                }
            }
            start = end;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub timing: Timing,
    kind: AnimationKind,
}

impl Animation {
    pub fn new(kind: AnimationKind, run_time: f64) -> Self {
        Self {
            timing: Timing::new(run_time),
            kind,
        }
    }

    /// Reveal `target` with the strategy its kind selects.
    pub fn create(target: ObjectId, run_time: f64) -> Self {
        Self::new(AnimationKind::Create(Creation::new(target, None)), run_time)
    }

    pub fn create_with(target: ObjectId, strategy: CreationStrategy, run_time: f64) -> Self {
        Self::new(
            AnimationKind::Create(Creation::new(target, Some(strategy))),
            run_time,
        )
    }

    /// Morph `origin` into `destiny`. At the end `destiny` takes the place of `origin`.
    pub fn transform(origin: ObjectId, destiny: ObjectId, run_time: f64) -> Self {
        Self::new(
            AnimationKind::Transform(Transform::new(origin, destiny, None)),
            run_time,
        )
    }

    pub fn transform_with(
        origin: ObjectId,
        destiny: ObjectId,
        strategy: TransformStrategy,
        run_time: f64,
    ) -> Self {
        Self::new(
            AnimationKind::Transform(Transform::new(origin, destiny, Some(strategy))),
            run_time,
        )
    }

    pub fn command(targets: Vec<ObjectId>, op: CommandOp, run_time: f64) -> Self {
        Self::new(AnimationKind::Command(Command::new(targets, op)), run_time)
    }

    pub fn shift(targets: Vec<ObjectId>, by: Vec2, run_time: f64) -> Self {
        Self::command(targets, CommandOp::Shift(by), run_time)
    }

    pub fn scale(targets: Vec<ObjectId>, factor: f64, center: Option<Point>, run_time: f64) -> Self {
        Self::command(targets, CommandOp::Scale { factor, center }, run_time)
    }

    pub fn rotate(targets: Vec<ObjectId>, angle: f64, center: Option<Point>, run_time: f64) -> Self {
        Self::command(targets, CommandOp::Rotate { angle, center }, run_time)
    }

    pub fn affine(targets: Vec<ObjectId>, affine: Affine, run_time: f64) -> Self {
        Self::command(targets, CommandOp::Affine(affine), run_time)
    }

    pub fn fade_in(targets: Vec<ObjectId>, run_time: f64) -> Self {
        Self::command(targets, CommandOp::FadeIn, run_time)
    }

    pub fn fade_out(targets: Vec<ObjectId>, run_time: f64) -> Self {
        Self::command(targets, CommandOp::FadeOut, run_time)
    }

    pub fn set_style(targets: Vec<ObjectId>, style: Style, run_time: f64) -> Self {
        Self::command(targets, CommandOp::SetStyle(style), run_time)
    }

    pub fn wait(secs: f64) -> Self {
        Self::new(AnimationKind::Wait, secs).with_ease(Ease::Linear)
    }

    /// Play `children` one after another. The sequence runs linearly; each child keeps its own
    /// easing.
    pub fn sequence(children: Vec<Animation>) -> Self {
        let total = children.iter().map(|c| c.timing.run_time.max(0.0)).sum();
        Self::new(AnimationKind::Sequence(Sequence { children }), total).with_ease(Ease::Linear)
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.timing.ease = ease;
        self
    }

    pub fn kind(&self) -> &AnimationKind {
        &self.kind
    }

    pub fn name(&self) -> &'static str {
        match &self.kind {
            AnimationKind::Create(_) => "create",
            AnimationKind::Transform(_) => "transform",
            AnimationKind::Command(c) => c.op().name(),
            AnimationKind::Wait => "wait",
            AnimationKind::Sequence(_) => "sequence",
        }
    }

    pub fn state(&self) -> AnimState {
        self.timing.state()
    }

    pub fn is_finished(&self) -> bool {
        self.timing.state() == AnimState::Finished
    }

    /// Start the animation at progress 0.
    ///
    /// Returns `false` when the animation cannot run on its targets; it is then logged and
    /// marked finished without touching the scene.
    pub fn initialize(&mut self, scene: &mut Scene) -> bool {
        match self.timing.state() {
            AnimState::Running => return true,
            AnimState::Finished => return false,
            AnimState::NotStarted => {}
        }
        self.timing.start(scene.fps());
        let res: GeomotionResult<()> = match &mut self.kind {
            AnimationKind::Create(c) => c.init(scene),
            AnimationKind::Transform(t) => t.init(scene),
            AnimationKind::Command(c) => c.init(scene),
            AnimationKind::Wait | AnimationKind::Sequence(_) => Ok(()),
        };
        if let Err(e) = res {
            match &e {
                GeomotionError::Unsupported(_) => {
                    tracing::error!(animation = self.name(), error = %e, "unsupported operand, animation skipped");
                }
                _ => tracing::warn!(animation = self.name(), error = %e, "animation skipped"),
            }
            self.timing.mark_finished();
            return false;
        }
        self.do_anim(0.0, scene);
        true
    }

    /// Advance one frame. Returns `true` once the animation is finished.
    pub fn process(&mut self, scene: &mut Scene) -> bool {
        if self.timing.state() == AnimState::NotStarted && !self.initialize(scene) {
            return true;
        }
        if self.is_finished() {
            return true;
        }
        self.timing.tick();
        let t = self.timing.t();
        if t >= 1.0 {
            self.finish(scene);
            return true;
        }
        self.do_anim(t, scene);
        false
    }

    /// Apply raw progress `t`: restore from the start state, draw at the eased progress and
    /// reconcile which objects are visible.
    pub fn do_anim(&mut self, t: f64, scene: &mut Scene) {
        let lt = self.timing.lt(t);
        let total = self.timing.run_time.max(0.0);
        match &mut self.kind {
            AnimationKind::Create(c) => c.render_at(lt, scene),
            AnimationKind::Transform(x) => x.render_at(lt, scene),
            AnimationKind::Command(c) => c.render_at(lt, scene),
            AnimationKind::Wait => {}
            AnimationKind::Sequence(s) => s.apply(t, total, scene),
        }
        self.clean_at(lt, scene);
    }

    /// Decide which of the original and the proxy is visible at eased progress `lt`.
    pub fn clean_at(&self, lt: f64, scene: &mut Scene) {
        match &self.kind {
            AnimationKind::Create(c) => c.clean_at(lt, scene),
            AnimationKind::Transform(x) => x.clean_at(lt, scene),
            AnimationKind::Command(c) => c.clean_at(lt, scene),
            AnimationKind::Wait | AnimationKind::Sequence(_) => {}
        }
    }

    /// Jump to the end and release proxies. Calling it again does nothing.
    pub fn finish(&mut self, scene: &mut Scene) {
        match self.timing.state() {
            AnimState::Finished => return,
            AnimState::NotStarted => {
                if !self.initialize(scene) {
                    return;
                }
            }
            AnimState::Running => {}
        }
        self.do_anim(1.0, scene);
        match &mut self.kind {
            AnimationKind::Create(c) => c.cleanup(scene),
            AnimationKind::Transform(x) => x.cleanup(scene),
            AnimationKind::Command(c) => c.cleanup(scene),
            AnimationKind::Wait | AnimationKind::Sequence(_) => {}
        }
        self.timing.mark_finished();
    }

    /// Redraw proxies that follow their target's current state. Run after an update pass so
    /// derived targets are never drawn one frame behind.
    pub fn refresh(&mut self, scene: &mut Scene) {
        if self.timing.state() != AnimState::Running {
            return;
        }
        match &mut self.kind {
            AnimationKind::Create(c) => c.refresh(scene),
            AnimationKind::Sequence(s) => s.children.iter_mut().for_each(|c| c.refresh(scene)),
            AnimationKind::Transform(_) | AnimationKind::Command(_) | AnimationKind::Wait => {}
        }
    }

    /// Back to `NotStarted`. A running animation is rolled back first: its proxies are
    /// discarded and its targets return to their state at initialization.
    pub fn reset(&mut self, scene: &mut Scene) {
        if self.timing.state() == AnimState::Running {
            match &mut self.kind {
                AnimationKind::Create(c) => c.rollback(scene),
                AnimationKind::Transform(x) => x.rollback(scene),
                AnimationKind::Command(c) => c.rollback(scene),
                AnimationKind::Wait | AnimationKind::Sequence(_) => {}
            }
        }
        self.timing.reset();
        match &mut self.kind {
            AnimationKind::Create(c) => c.reset(),
            AnimationKind::Transform(x) => x.reset(),
            AnimationKind::Command(c) => c.reset(),
            AnimationKind::Wait => {}
            AnimationKind::Sequence(s) => s
                .children
                .iter_mut()
                .rev()
                .for_each(|c| c.reset(scene)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/animation.rs"]
mod tests;
