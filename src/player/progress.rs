//! Scrub and progress state
//!
//! [`ProgressController`] reconciles the engine's periodic time reports
//! with the user's drag on the scrub handle. It only mutates
//! [`ScrubState`]; issuing seeks and touching the auto-hide timer is the
//! screen's job.

use crate::utils::clamp;
use serde::Serialize;

/// Normalized scrub position and gesture flags
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrubState {
    /// Displayed position in [0, 1]
    pub progress: f64,

    /// Position the last drag (or tick) committed; drag deltas are relative to it
    pub last_committed_progress: f64,

    /// Periodic ticks leave `progress` alone while set
    pub is_seeking: bool,

    /// A drag gesture is in flight
    pub is_dragging: bool,
}

impl Default for ScrubState {
    fn default() -> Self {
        Self {
            progress: 0.0,
            last_committed_progress: 0.0,
            is_seeking: false,
            is_dragging: false,
        }
    }
}

/// Result of feeding a periodic time report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Duration was zero, negative or not a number
    Skipped,

    /// Progress followed the engine
    Tracked { reached_end: bool },

    /// A seek is in flight; progress was left alone
    Held { reached_end: bool },
}

impl TickOutcome {
    /// Whether the report put playback at the very end of the media
    pub fn reached_end(self) -> bool {
        match self {
            TickOutcome::Skipped => false,
            TickOutcome::Tracked { reached_end } | TickOutcome::Held { reached_end } => reached_end,
        }
    }
}

/// Owner of [`ScrubState`]
#[derive(Debug, Default)]
pub struct ProgressController {
    state: ScrubState,
}

impl ProgressController {
    /// Create a controller at the start of the media
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scrub state
    pub fn state(&self) -> &ScrubState {
        &self.state
    }

    /// Current displayed progress
    pub fn progress(&self) -> f64 {
        self.state.progress
    }

    /// Feed a periodic `(current_time, duration)` report, both in seconds
    ///
    /// Overshoot past the duration counts as the end of the media.
    pub fn on_periodic_tick(&mut self, current_time: f64, duration: f64) -> TickOutcome {
        if !duration.is_finite() || duration <= 0.0 {
            log::debug!("Ignoring tick with unusable duration {}", duration);
            return TickOutcome::Skipped;
        }

        let ratio = current_time / duration;
        if !ratio.is_finite() {
            return TickOutcome::Skipped;
        }
        let ratio = clamp(ratio, 0.0, 1.0);
        let reached_end = ratio == 1.0;

        if self.state.is_seeking {
            return TickOutcome::Held { reached_end };
        }

        self.state.progress = ratio;
        self.state.last_committed_progress = ratio;
        TickOutcome::Tracked { reached_end }
    }

    /// Start a drag gesture without moving the handle
    pub fn begin_drag(&mut self) {
        self.state.is_dragging = true;
        self.state.is_seeking = true;
    }

    /// Move the handle by the gesture's total horizontal translation
    ///
    /// `delta_x` is measured from where the drag began, in the same units
    /// as `track_width`. A non-positive width leaves progress unchanged.
    pub fn drag_changed(&mut self, delta_x: f64, track_width: f64) -> f64 {
        self.state.is_dragging = true;
        self.state.is_seeking = true;

        if track_width > 0.0 && delta_x.is_finite() {
            let target = self.state.last_committed_progress + delta_x / track_width;
            self.state.progress = clamp(target, 0.0, 1.0);
        }

        self.state.progress
    }

    /// Finish the drag, committing the handle position
    ///
    /// Returns the committed progress, or `None` if no drag was active.
    /// `is_seeking` stays set until [`ProgressController::settle`].
    pub fn end_drag(&mut self) -> Option<f64> {
        if !self.state.is_dragging {
            return None;
        }

        self.state.is_dragging = false;
        self.state.last_committed_progress = self.state.progress;
        Some(self.state.progress)
    }

    /// Abandon the drag and snap back to the committed position
    pub fn cancel_drag(&mut self) -> bool {
        if !self.state.is_dragging {
            return false;
        }

        self.state.is_dragging = false;
        self.state.is_seeking = false;
        self.state.progress = self.state.last_committed_progress;
        true
    }

    /// Let periodic ticks drive progress again
    pub fn settle(&mut self) {
        self.state.is_seeking = false;
    }

    /// Return to the start of the media
    pub fn reset(&mut self) {
        self.state.progress = 0.0;
        self.state.last_committed_progress = 0.0;
    }

    /// Seconds to seek to for the current progress, if `duration` is usable
    pub fn seek_target(&self, duration: f64) -> Option<f64> {
        if duration.is_finite() && duration > 0.0 {
            Some(self.state.progress * duration)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tick_tracks_engine_time() {
        let mut controller = ProgressController::new();
        let outcome = controller.on_periodic_tick(25.0, 100.0);

        assert_eq!(outcome, TickOutcome::Tracked { reached_end: false });
        assert_eq!(controller.state().progress, 0.25);
        assert_eq!(controller.state().last_committed_progress, 0.25);
    }

    #[test]
    fn test_tick_at_end_reports_finish() {
        let mut controller = ProgressController::new();
        let outcome = controller.on_periodic_tick(100.0, 100.0);

        assert!(outcome.reached_end());
        assert_eq!(controller.progress(), 1.0);
    }

    #[test]
    fn test_tick_with_zero_duration_is_noop() {
        let mut controller = ProgressController::new();
        controller.on_periodic_tick(10.0, 40.0);

        assert_eq!(controller.on_periodic_tick(5.0, 0.0), TickOutcome::Skipped);
        assert_eq!(controller.on_periodic_tick(5.0, f64::NAN), TickOutcome::Skipped);
        assert_eq!(controller.progress(), 0.25);
    }

    #[test]
    fn test_tick_held_while_seeking() {
        let mut controller = ProgressController::new();
        controller.on_periodic_tick(50.0, 100.0);
        controller.drag_changed(100.0, 400.0);
        controller.end_drag();

        let outcome = controller.on_periodic_tick(51.0, 100.0);
        assert_eq!(outcome, TickOutcome::Held { reached_end: false });
        assert_eq!(controller.progress(), 0.75);
        assert_eq!(controller.state().last_committed_progress, 0.75);

        controller.settle();
        controller.on_periodic_tick(76.0, 100.0);
        assert_eq!(controller.progress(), 0.76);
    }

    #[test]
    fn test_drag_backwards_by_quarter_track() {
        let mut controller = ProgressController::new();
        controller.on_periodic_tick(50.0, 100.0);

        let track_width = 390.0;
        let progress = controller.drag_changed(-0.25 * track_width, track_width);

        assert!((progress - 0.25).abs() < 1e-12);
        assert!(controller.state().is_seeking);
        assert!(controller.state().is_dragging);
    }

    #[test]
    fn test_drag_clamps_to_track() {
        let mut controller = ProgressController::new();
        assert_eq!(controller.drag_changed(-50.0, 100.0), 0.0);
        assert_eq!(controller.drag_changed(500.0, 100.0), 1.0);
    }

    #[test]
    fn test_drag_with_zero_width_keeps_progress() {
        let mut controller = ProgressController::new();
        controller.on_periodic_tick(30.0, 60.0);
        assert_eq!(controller.drag_changed(10.0, 0.0), 0.5);
    }

    #[test]
    fn test_end_drag_commits() {
        let mut controller = ProgressController::new();
        assert_eq!(controller.end_drag(), None);

        controller.drag_changed(30.0, 100.0);
        assert_eq!(controller.end_drag(), Some(0.3));
        assert_eq!(controller.state().last_committed_progress, 0.3);
        assert!(!controller.state().is_dragging);
        assert!(controller.state().is_seeking);
        assert_eq!(controller.seek_target(200.0), Some(60.0));
        assert_eq!(controller.seek_target(0.0), None);
    }

    #[test]
    fn test_cancel_drag_restores_committed_position() {
        let mut controller = ProgressController::new();
        controller.on_periodic_tick(10.0, 100.0);
        controller.drag_changed(50.0, 100.0);

        assert!(controller.cancel_drag());
        assert_eq!(controller.progress(), 0.1);
        assert!(!controller.state().is_seeking);
        assert!(!controller.cancel_drag());
    }

    proptest! {
        #[test]
        fn drag_progress_stays_in_unit_interval(
            committed in 0.0f64..=1.0,
            delta in -2000.0f64..2000.0,
            width in 1.0f64..2000.0,
        ) {
            let mut controller = ProgressController::new();
            controller.on_periodic_tick(committed * 100.0, 100.0);
            let progress = controller.drag_changed(delta, width);
            prop_assert!((0.0..=1.0).contains(&progress));
        }

        #[test]
        fn ticks_never_move_progress_while_seeking(
            start in 0.0f64..=1.0,
            current in 0.0f64..500.0,
            duration in 1.0f64..500.0,
        ) {
            let mut controller = ProgressController::new();
            controller.on_periodic_tick(start * 100.0, 100.0);
            controller.begin_drag();
            let before = *controller.state();
            controller.on_periodic_tick(current, duration);
            prop_assert_eq!(controller.progress(), before.progress);
            prop_assert_eq!(
                controller.state().last_committed_progress,
                before.last_committed_progress
            );
        }
    }
}
