//! Playback engine seam for scrubview
//!
//! The screen never decodes or renders video itself. It drives a platform
//! playback engine through the [`PlaybackEngine`] trait with fire-and-forget
//! commands and learns about playback time through a periodic observer.

mod simulated;

pub use simulated::SimulatedEngine;

use crate::utils::error::{Result, ScrubError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Callback receiving the engine's current playback time in seconds
pub type TimeObserver = Box<dyn FnMut(f64) + Send>;

/// Platform playback engine interface
pub trait PlaybackEngine {
    /// Open a media source
    ///
    /// # Arguments
    ///
    /// * `url` - URL of the media, e.g. `file:///…/samplevideo.mp4`
    fn load(&mut self, url: &str) -> Result<()>;

    /// Start or resume playback
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self) -> Result<()>;

    /// Jump to a position
    ///
    /// # Arguments
    ///
    /// * `to_seconds` - Target position from the start of the media
    fn seek(&mut self, to_seconds: f64) -> Result<()>;

    /// Current playback time in seconds
    fn current_time(&self) -> f64;

    /// Media duration in seconds; zero or NaN while unknown
    fn duration(&self) -> f64;

    /// Register a callback invoked every `interval` of playback time
    ///
    /// Engines may invoke the observer from any thread. It must not call
    /// back into the engine.
    fn subscribe_periodic_time(&mut self, interval: Duration, observer: TimeObserver)
        -> Result<()>;
}

/// Commands issued to an engine, as recorded by [`SimulatedEngine`]
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Load(String),
    Play,
    Pause,
    Seek(f64),
}

/// A resolved, bundled media asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    path: PathBuf,
}

impl MediaSource {
    /// Resolve a media file on disk
    ///
    /// Fails with [`ScrubError::NotFound`] when the asset is missing, and
    /// with [`ScrubError::InvalidInput`] when the path is not a file.
    pub fn resolve(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ScrubError::NotFound(path.display().to_string()));
        }
        if !path.is_file() {
            return Err(ScrubError::InvalidInput(format!(
                "{} is not a file",
                path.display()
            )));
        }

        let path = path.canonicalize()?;
        Ok(Self { path })
    }

    /// `file://` URL handed to the engine
    pub fn url(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_missing_asset() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("samplevideo.mp4");

        assert!(matches!(
            MediaSource::resolve(&missing),
            Err(ScrubError::NotFound(_))
        ));
    }

    #[test]
    fn test_resolve_directory_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            MediaSource::resolve(dir.path()),
            Err(ScrubError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolve_builds_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("samplevideo.mp4");
        std::fs::write(&asset, b"not really a video").unwrap();

        let source = MediaSource::resolve(&asset).unwrap();
        assert!(source.url().starts_with("file://"));
        assert!(source.url().ends_with("samplevideo.mp4"));
    }
}
