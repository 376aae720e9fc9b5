//! In-memory playback engine
//!
//! Stands in for the platform engine: no decoding, just a playback clock
//! that moves when [`SimulatedEngine::advance`] is called. Clones share
//! the same engine, so a test or the binary can keep a handle while the
//! screen owns a boxed copy.

use crate::engine::{EngineCommand, PlaybackEngine, TimeObserver};
use crate::utils::error::{Result, ScrubError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct PeriodicObserver {
    interval: f64,
    callback: TimeObserver,
}

struct EngineState {
    duration: f64,
    position: f64,
    playing: bool,
    loaded: Option<String>,
    failing: bool,
    commands: Vec<EngineCommand>,
    observers: Vec<PeriodicObserver>,
}

impl EngineState {
    fn notify(&mut self, time: f64) {
        for observer in self.observers.iter_mut() {
            (observer.callback)(time);
        }
    }

    fn check(&self, command: &EngineCommand) -> Result<()> {
        if self.failing {
            return Err(ScrubError::engine_error(format!("{:?} rejected", command)));
        }
        if self.loaded.is_none() && !matches!(command, EngineCommand::Load(_)) {
            return Err(ScrubError::engine_error("No media loaded"));
        }
        Ok(())
    }
}

/// Simulated engine with a fixed media duration
#[derive(Clone)]
pub struct SimulatedEngine {
    inner: Arc<Mutex<EngineState>>,
}

impl SimulatedEngine {
    /// Create an engine whose media lasts `duration` seconds once loaded
    pub fn new(duration: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(EngineState {
                duration,
                position: 0.0,
                playing: false,
                loaded: None,
                failing: false,
                commands: Vec::new(),
                observers: Vec::new(),
            })),
        }
    }

    /// Move the playback clock forward by `dt` if playing
    ///
    /// Observers fire at every multiple of their interval crossed, and once
    /// more when playback stops at the end of the media.
    pub fn advance(&self, dt: Duration) {
        let mut state = self.inner.lock();
        if !state.playing || state.loaded.is_none() {
            return;
        }

        let start = state.position;
        let end = (start + dt.as_secs_f64()).min(state.duration);
        let duration = state.duration;
        let mut last_reported = None;

        for observer in state.observers.iter_mut() {
            if observer.interval <= 0.0 {
                continue;
            }
            let mut k = (start / observer.interval).floor() + 1.0;
            while k * observer.interval <= end {
                let time = k * observer.interval;
                (observer.callback)(time);
                last_reported = Some(time);
                k += 1.0;
            }
        }

        state.position = end;

        if end >= duration {
            state.playing = false;
            log::debug!("Simulated engine reached end of media at {:.3}s", end);
            if last_reported != Some(end) {
                state.notify(end);
            }
        }
    }

    /// Make every later command fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().failing = failing;
    }

    /// Commands received so far, oldest first
    pub fn commands(&self) -> Vec<EngineCommand> {
        self.inner.lock().commands.clone()
    }

    /// Drain the recorded commands
    pub fn take_commands(&self) -> Vec<EngineCommand> {
        std::mem::take(&mut self.inner.lock().commands)
    }

    pub fn is_playing(&self) -> bool {
        self.inner.lock().playing
    }

    pub fn loaded_url(&self) -> Option<String> {
        self.inner.lock().loaded.clone()
    }

    pub fn observer_count(&self) -> usize {
        self.inner.lock().observers.len()
    }
}

impl PlaybackEngine for SimulatedEngine {
    fn load(&mut self, url: &str) -> Result<()> {
        let command = EngineCommand::Load(url.to_string());
        let mut state = self.inner.lock();
        state.check(&command)?;

        state.loaded = Some(url.to_string());
        state.position = 0.0;
        state.playing = false;
        state.commands.push(command);
        log::info!("Simulated engine loaded {} ({:.1}s)", url, state.duration);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let mut state = self.inner.lock();
        state.check(&EngineCommand::Play)?;

        // Playing from the very end restarts nothing; the caller seeks first
        state.playing = state.position < state.duration;
        state.commands.push(EngineCommand::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        let mut state = self.inner.lock();
        state.check(&EngineCommand::Pause)?;

        state.playing = false;
        state.commands.push(EngineCommand::Pause);
        Ok(())
    }

    fn seek(&mut self, to_seconds: f64) -> Result<()> {
        let command = EngineCommand::Seek(to_seconds);
        let mut state = self.inner.lock();
        state.check(&command)?;

        let target = if to_seconds.is_finite() {
            to_seconds.clamp(0.0, state.duration)
        } else {
            0.0
        };
        state.position = target;
        state.commands.push(command);
        state.notify(target);
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.inner.lock().position
    }

    fn duration(&self) -> f64 {
        let state = self.inner.lock();
        if state.loaded.is_some() {
            state.duration
        } else {
            f64::NAN
        }
    }

    fn subscribe_periodic_time(
        &mut self,
        interval: Duration,
        observer: TimeObserver,
    ) -> Result<()> {
        if interval.is_zero() {
            return Err(ScrubError::InvalidInput(
                "Periodic time interval must be non-zero".to_string(),
            ));
        }

        self.inner.lock().observers.push(PeriodicObserver {
            interval: interval.as_secs_f64(),
            callback: observer,
        });
        Ok(())
    }
}
