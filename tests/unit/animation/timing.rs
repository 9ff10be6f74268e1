use super::*;

#[test]
fn two_seconds_at_thirty_fps_completes_on_frame_sixty() {
    let mut t = Timing::new(2.0).with_ease(Ease::Linear);
    t.start(Fps::new(30, 1).unwrap());
    for _ in 0..59 {
        t.tick();
        assert!(t.t() < 1.0);
    }
    t.tick();
    assert_eq!(t.t(), 1.0);
    assert_eq!(t.total_frames(), 60);
}

#[test]
fn progress_is_clamped_after_the_end() {
    let mut t = Timing::new(0.1);
    t.start(Fps::default());
    for _ in 0..10 {
        t.tick();
    }
    assert_eq!(t.t(), 1.0);
}

#[test]
fn zero_run_time_is_complete_immediately() {
    let t = Timing::new(0.0);
    assert_eq!(t.t(), 1.0);
    assert_eq!(t.total_frames(), 1);
}

#[test]
fn non_terminating_fractions_snap_to_one() {
    let mut t = Timing::new(0.3).with_ease(Ease::Linear);
    t.start(Fps::new(10, 1).unwrap());
    for _ in 0..3 {
        t.tick();
    }
    assert_eq!(t.t(), 1.0);
    assert_eq!(t.lt(t.t()), 1.0);
}

#[test]
fn reset_returns_to_not_started() {
    let mut t = Timing::new(1.0);
    t.start(Fps::default());
    t.tick();
    t.mark_finished();
    t.reset();
    assert_eq!(t.state(), AnimState::NotStarted);
    assert_eq!(t.elapsed_frames(), 0);
}
