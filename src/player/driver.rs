//! Advancing a screen through time
//!
//! [`ScreenDriver`] is the event loop's clock: it moves the simulated
//! engine and the screen's deferred-action queue forward together, so
//! periodic ticks and auto-hide/settle callbacks are delivered in the
//! order they would occur on a real UI thread.

use crate::engine::SimulatedEngine;
use crate::player::PlayerScreen;
use std::time::Duration;

/// Couples a [`PlayerScreen`] with the engine clock that feeds it
pub struct ScreenDriver {
    screen: PlayerScreen,
    engine: Option<SimulatedEngine>,
    now: Duration,
}

impl ScreenDriver {
    /// Drive `screen`; `engine` is the handle of the engine mounted on it, if any
    pub fn new(screen: PlayerScreen, engine: Option<SimulatedEngine>) -> Self {
        let now = screen.now();
        Self {
            screen,
            engine,
            now,
        }
    }

    pub fn screen(&self) -> &PlayerScreen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut PlayerScreen {
        &mut self.screen
    }

    pub fn engine(&self) -> Option<&SimulatedEngine> {
        self.engine.as_ref()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Deliver time reports queued by commands issued since the last step
    pub fn sync(&mut self) {
        self.screen.pump_time_updates();
        self.screen.fire_due_timers(self.now);
    }

    /// Run everything that happens up to `target`
    ///
    /// Time is split at each deferred deadline so the engine's reports
    /// before a deadline reach the screen before that callback fires.
    pub fn advance_to(&mut self, target: Duration) {
        self.sync();

        while self.now < target {
            let step_end = match self.screen.next_deadline() {
                Some(deadline) if deadline < target => deadline.max(self.now),
                _ => target,
            };

            if let Some(engine) = &self.engine {
                engine.advance(step_end - self.now);
            }
            self.now = step_end;
            self.sync();
        }
    }

    /// Run everything that happens in the next `dt`
    pub fn advance_by(&mut self, dt: Duration) {
        let target = self.now + dt;
        self.advance_to(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Visibility;
    use crate::utils::config::ScreenConfig;

    fn driver(duration: f64) -> (ScreenDriver, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("samplevideo.mp4");
        std::fs::write(&asset, b"mp4").unwrap();

        let engine = SimulatedEngine::new(duration);
        let screen = PlayerScreen::open(&asset, Box::new(engine.clone()), &ScreenConfig::default());
        (ScreenDriver::new(screen, Some(engine)), dir)
    }

    #[test]
    fn test_playback_reaches_end() {
        let (mut driver, _dir) = driver(5.0);
        driver.screen_mut().on_play_pause_toggled();
        driver.advance_by(Duration::from_secs(10));

        let state = driver.screen().state();
        assert!(state.is_finished);
        assert!(!state.is_playing);
        assert_eq!(state.scrub.progress, 1.0);
        assert!(state.show_controls);
    }

    #[test]
    fn test_controls_hide_while_playing() {
        let (mut driver, _dir) = driver(60.0);
        driver.screen_mut().on_surface_tapped();
        driver.screen_mut().on_play_pause_toggled();

        driver.advance_by(Duration::from_secs(2));
        assert_eq!(driver.screen().visibility(), Visibility::Visible);
        driver.advance_by(Duration::from_secs(1));
        assert_eq!(driver.screen().visibility(), Visibility::Hidden);

        // Progress kept tracking the engine meanwhile
        assert_eq!(driver.screen().scrub().progress, 3.0 / 60.0);
    }

    #[test]
    fn test_scrub_then_resume_tracking() {
        let (mut driver, _dir) = driver(100.0);
        driver.screen_mut().on_play_pause_toggled();
        driver.advance_by(Duration::from_secs(10));
        assert_eq!(driver.screen().scrub().progress, 0.1);

        driver.screen_mut().on_drag_changed(200.0, 400.0);
        driver.screen_mut().on_drag_ended();
        driver.sync();
        assert_eq!(driver.screen().scrub().progress, 0.6);

        driver.advance_by(Duration::from_secs(2));
        let scrub = *driver.screen().scrub();
        assert!(!scrub.is_seeking);
        assert_eq!(scrub.progress, 0.62);
    }

    #[test]
    fn test_clock_never_rewinds() {
        let (mut driver, _dir) = driver(10.0);
        driver.advance_to(Duration::from_secs(2));
        driver.advance_to(Duration::from_secs(1));
        assert_eq!(driver.now(), Duration::from_secs(2));
    }
}
