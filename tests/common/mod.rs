//! Shared fixtures for the integration tests
//!
//! - A temporary bundled media asset
//! - A mock playback engine
//! - Screen builders

#![allow(dead_code)]

use mockall::mock;
use scrubview::engine::{PlaybackEngine, TimeObserver};
use scrubview::utils::ScreenConfig;
use scrubview::{PlayerScreen, ScreenDriver, SimulatedEngine};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

mock! {
    pub Engine {}

    impl PlaybackEngine for Engine {
        fn load(&mut self, url: &str) -> scrubview::Result<()>;
        fn play(&mut self) -> scrubview::Result<()>;
        fn pause(&mut self) -> scrubview::Result<()>;
        fn seek(&mut self, to_seconds: f64) -> scrubview::Result<()>;
        fn current_time(&self) -> f64;
        fn duration(&self) -> f64;
        fn subscribe_periodic_time(
            &mut self,
            interval: Duration,
            observer: TimeObserver,
        ) -> scrubview::Result<()>;
    }
}

/// Observer the screen registered on a [`MockEngine`]
pub type ObserverSlot = Arc<Mutex<Option<TimeObserver>>>;

/// Test fixture owning a temporary media asset
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub media: PathBuf,
}

impl TestFixture {
    /// Create a fixture with a bundled `samplevideo.mp4`
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let media = temp_dir.path().join("samplevideo.mp4");
        // Engines in these tests never decode, any bytes will do
        std::fs::write(&media, b"ftypisom")?;

        Ok(Self { temp_dir, media })
    }

    /// A path inside the fixture that does not exist
    pub fn missing_media(&self) -> PathBuf {
        self.temp_dir.path().join("missing.mp4")
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Screen mounted on a simulated engine, wrapped in a driver
    pub fn driver(&self, duration: f64) -> (ScreenDriver, SimulatedEngine) {
        let engine = SimulatedEngine::new(duration);
        let screen =
            PlayerScreen::open(&self.media, Box::new(engine.clone()), &ScreenConfig::default());
        engine.take_commands();
        (ScreenDriver::new(screen, Some(engine.clone())), engine)
    }
}

/// A mock engine that accepts the mount and hands back its time observer
pub fn mock_engine(duration: f64) -> (MockEngine, ObserverSlot) {
    let slot: ObserverSlot = Arc::new(Mutex::new(None));
    let captured = Arc::clone(&slot);

    let mut engine = MockEngine::new();
    engine.expect_load().times(1).returning(|_| Ok(()));
    engine
        .expect_subscribe_periodic_time()
        .times(1)
        .returning(move |_, observer| {
            *captured.lock().unwrap() = Some(observer);
            Ok(())
        });
    engine.expect_duration().return_const(duration);
    engine.expect_current_time().return_const(0.0);

    (engine, slot)
}

/// Deliver `time` through the captured observer
pub fn report_time(slot: &ObserverSlot, time: f64) {
    let mut observer = slot.lock().unwrap();
    let observer = observer.as_mut().expect("screen subscribed to periodic time");
    observer(time);
}
