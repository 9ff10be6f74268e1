use crate::animation::ease::Ease;
use crate::foundation::core::Fps;

/// Progress within this distance of `1` counts as complete.
const END_SNAP: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimState {
    NotStarted,
    Running,
    Finished,
}

/// Frame-stepped clock of one animation.
///
/// Elapsed time is counted in whole frames and converted to seconds on demand, so replaying
/// a frame count always yields the same progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    pub run_time: f64,
    pub ease: Ease,
    fps: Fps,
    elapsed_frames: u64,
    state: AnimState,
}

impl Timing {
    pub fn new(run_time: f64) -> Self {
        Self {
            run_time,
            ease: Ease::default(),
            fps: Fps::default(),
            elapsed_frames: 0,
            state: AnimState::NotStarted,
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn state(&self) -> AnimState {
        self.state
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn elapsed_frames(&self) -> u64 {
        self.elapsed_frames
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.elapsed_frames)
    }

    /// Number of frames the animation spans at its fps.
    pub fn total_frames(&self) -> u64 {
        if self.run_time <= 0.0 {
            return 1;
        }
        self.fps.secs_to_frames_ceil(self.run_time).max(1)
    }

    pub(crate) fn start(&mut self, fps: Fps) {
        self.fps = fps;
        self.elapsed_frames = 0;
        self.state = AnimState::Running;
    }

    pub(crate) fn tick(&mut self) {
        self.elapsed_frames = self.elapsed_frames.saturating_add(1);
    }

    pub(crate) fn mark_finished(&mut self) {
        self.state = AnimState::Finished;
    }

    /// Back to `NotStarted` with no elapsed time.
    pub fn reset(&mut self) {
        self.elapsed_frames = 0;
        self.state = AnimState::NotStarted;
    }

    /// Raw progress `min(elapsed / run_time, 1)`. A non-positive run time is complete at once.
    pub fn t(&self) -> f64 {
        if !(self.run_time > 0.0) {
            return 1.0;
        }
        let t = (self.elapsed_secs() / self.run_time).min(1.0);
        if 1.0 - t <= END_SNAP { 1.0 } else { t }
    }

    /// Eased progress of raw progress `t`.
    pub fn lt(&self, t: f64) -> f64 {
        self.ease.apply(t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timing.rs"]
mod tests;
