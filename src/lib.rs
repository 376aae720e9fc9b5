//! scrubview - overlay controls for a single video screen
//!
//! The crate models the interaction logic of a one-screen video player:
//! when the overlay chrome is shown, how dragging the scrub handle turns
//! into a seek, and how the engine's periodic time reports reconcile with
//! a drag in flight. Decoding and rendering video belong to the platform
//! playback engine behind [`engine::PlaybackEngine`].

pub mod engine;
pub mod input;
pub mod overlay;
pub mod player;
pub mod utils;

pub use engine::{EngineCommand, MediaSource, PlaybackEngine, SimulatedEngine};
pub use overlay::{OverlayFrame, OverlayLayout, PlaybackIcon};
pub use player::{PlayerScreen, ScreenDriver, ScreenState, ScrubState, Visibility};
pub use utils::{Config, Result, ScrubError};
