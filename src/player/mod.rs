//! Player screen module for scrubview
//!
//! This module holds the interaction state machine of the single player
//! screen: scrub/progress reconciliation, the auto-hiding controls, the
//! deferred-callback queue both of them schedule on, and the driver that
//! advances it all through time.

mod driver;
mod progress;
mod screen;
mod timer;
mod visibility;

pub use driver::ScreenDriver;
pub use progress::{ProgressController, ScrubState, TickOutcome};
pub use screen::{PlayerScreen, SubscriptionId};
pub use timer::{DeferredAction, DeferredQueue, TimerId};
pub use visibility::{ControlsVisibility, Visibility, VisibilityState};

use crate::engine::MediaSource;
use serde::Serialize;

/// One mounted media source and its playback flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSession {
    /// Resolved media; `None` when the screen is blank
    pub source: Option<MediaSource>,

    /// The user asked for playback and it has not ended
    pub is_playing: bool,

    /// Playback reached the end; the next toggle restarts from zero
    pub is_finished: bool,
}

/// Snapshot of the screen handed to subscribers and renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenState {
    /// Display path of the mounted media
    pub media: Option<String>,

    /// A playback engine is attached; controls are disabled otherwise
    pub engine_available: bool,

    pub is_playing: bool,
    pub is_finished: bool,

    /// Scrub position and gesture flags
    pub scrub: ScrubState,

    pub show_controls: bool,
    pub auto_hide_pending: bool,

    /// Engine playback time, seconds
    pub current_time: f64,

    /// Media duration, seconds; zero while unknown
    pub duration: f64,
}

impl ScreenState {
    /// State of a screen with nothing mounted
    pub fn blank() -> Self {
        Self {
            media: None,
            engine_available: false,
            is_playing: false,
            is_finished: false,
            scrub: ScrubState::default(),
            show_controls: false,
            auto_hide_pending: false,
            current_time: 0.0,
            duration: 0.0,
        }
    }
}
