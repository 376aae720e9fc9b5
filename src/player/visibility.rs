//! Overlay controls visibility and auto-hide

use crate::player::timer::{DeferredAction, DeferredQueue, TimerId};
use serde::Serialize;
use std::time::Duration;

/// The two states of the overlay chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Whether the controls are shown, plus the one outstanding auto-hide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityState {
    /// Controls are drawn over the video surface
    pub show_controls: bool,

    /// Outstanding auto-hide, if any
    pub pending_hide: Option<TimerId>,
}

/// Visibility state machine
///
/// Holds at most one pending auto-hide: every schedule cancels the
/// previous handle first, and a hide that fires with a stale id is
/// ignored.
#[derive(Debug)]
pub struct ControlsVisibility {
    state: VisibilityState,
    hide_after: Duration,
}

impl ControlsVisibility {
    /// Start hidden, hiding `hide_after` once shown during playback
    pub fn new(hide_after: Duration) -> Self {
        Self {
            state: VisibilityState::default(),
            hide_after,
        }
    }

    pub fn state(&self) -> &VisibilityState {
        &self.state
    }

    pub fn visibility(&self) -> Visibility {
        if self.state.show_controls {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    pub fn is_visible(&self) -> bool {
        self.state.show_controls
    }

    /// Flip between visible and hidden; returns the new state
    ///
    /// Going hidden drops any pending auto-hide. Scheduling one after
    /// going visible is up to the caller, which knows whether playback
    /// is active.
    pub fn toggle(&mut self, timers: &mut DeferredQueue) -> Visibility {
        self.state.show_controls = !self.state.show_controls;
        if !self.state.show_controls {
            self.cancel_hide(timers);
        }
        log::debug!("Controls toggled to {:?}", self.visibility());
        self.visibility()
    }

    /// Replace any pending auto-hide with a fresh one
    pub fn schedule_hide(&mut self, timers: &mut DeferredQueue) -> TimerId {
        self.cancel_hide(timers);
        let id = timers.schedule(self.hide_after, DeferredAction::HideControls);
        self.state.pending_hide = Some(id);
        id
    }

    /// Drop the pending auto-hide, if any
    pub fn cancel_hide(&mut self, timers: &mut DeferredQueue) -> bool {
        match self.state.pending_hide.take() {
            Some(id) => timers.cancel(id),
            None => false,
        }
    }

    /// Cancel any pending hide and show the controls
    pub fn force_visible(&mut self, timers: &mut DeferredQueue) {
        self.cancel_hide(timers);
        self.state.show_controls = true;
    }

    /// Handle a fired auto-hide. Returns true if the controls were hidden.
    ///
    /// Stale ids and fires while playback is inactive change nothing.
    pub fn on_hide_fired(&mut self, id: TimerId, is_playing: bool) -> bool {
        if self.state.pending_hide != Some(id) {
            log::debug!("Ignoring stale auto-hide {}", id);
            return false;
        }
        self.state.pending_hide = None;

        if !is_playing || !self.state.show_controls {
            return false;
        }

        self.state.show_controls = false;
        true
    }
}
