//! The single player screen
//!
//! [`PlayerScreen`] owns everything the screen needs for one mounted
//! media source: the playback session, the scrub state, the controls
//! visibility, the deferred-callback queue and the engine. Every public
//! handler runs to completion and then notifies subscribers with a fresh
//! [`ScreenState`].

use crate::engine::{MediaSource, PlaybackEngine};
use crate::overlay::{self, OverlayFrame, OverlayLayout};
use crate::player::progress::{ProgressController, ScrubState, TickOutcome};
use crate::player::timer::{DeferredAction, DeferredQueue, TimerId};
use crate::player::visibility::{ControlsVisibility, Visibility};
use crate::player::{PlaybackSession, ScreenState};
use crate::utils::config::ScreenConfig;
use crate::utils::error::Result;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};
use std::path::Path;
use std::time::Duration;

/// Handle returned by [`PlayerScreen::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&ScreenState)>;

/// Interaction state machine for one mounted media source
pub struct PlayerScreen {
    engine: Option<Box<dyn PlaybackEngine>>,
    session: PlaybackSession,
    scrub: ProgressController,
    visibility: ControlsVisibility,
    timers: DeferredQueue,
    settle_delay: Duration,
    pending_settle: Option<TimerId>,
    time_tx: Sender<f64>,
    time_rx: Receiver<f64>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl PlayerScreen {
    /// Resolve the asset at `path` and mount it on `engine`
    ///
    /// A missing asset is not an error: the screen comes up blank, with
    /// no video surface and disabled controls.
    pub fn open(path: &Path, engine: Box<dyn PlaybackEngine>, config: &ScreenConfig) -> Self {
        match MediaSource::resolve(path) {
            Ok(source) => Self::mount(engine, source, config),
            Err(e) => {
                warn!("Media asset unavailable, showing blank view: {}", e);
                Self::blank(config)
            }
        }
    }

    /// Load `source` into `engine` and subscribe to its playback time
    ///
    /// Falls back to a blank screen if the engine refuses the source.
    pub fn mount(
        mut engine: Box<dyn PlaybackEngine>,
        source: MediaSource,
        config: &ScreenConfig,
    ) -> Self {
        let mut screen = Self::blank(config);

        if let Err(e) = Self::attach(engine.as_mut(), &source, config, screen.time_tx.clone()) {
            warn!("Failed to mount {}: {}", source, e);
            return screen;
        }

        info!("Mounted {}", source);
        screen.session.source = Some(source);
        screen.engine = Some(engine);
        screen
    }

    /// A screen without a playback engine
    pub fn blank(config: &ScreenConfig) -> Self {
        let (time_tx, time_rx) = crossbeam_channel::unbounded();
        Self {
            engine: None,
            session: PlaybackSession::default(),
            scrub: ProgressController::new(),
            visibility: ControlsVisibility::new(config.hide_controls_after()),
            timers: DeferredQueue::new(),
            settle_delay: config.seek_settle(),
            pending_settle: None,
            time_tx,
            time_rx,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    fn attach(
        engine: &mut dyn PlaybackEngine,
        source: &MediaSource,
        config: &ScreenConfig,
        time_tx: Sender<f64>,
    ) -> Result<()> {
        engine.load(&source.url())?;
        engine.subscribe_periodic_time(
            config.time_update_interval(),
            Box::new(move |time| {
                // The receiver only goes away with the screen
                let _ = time_tx.send(time);
            }),
        )
    }

    /// Whether a playback engine is attached; controls are disabled otherwise
    pub fn engine_available(&self) -> bool {
        self.engine.is_some()
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn scrub(&self) -> &ScrubState {
        self.scrub.state()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility.visibility()
    }

    /// Number of queued auto-hide timers (zero or one)
    pub fn pending_auto_hides(&self) -> usize {
        self.timers.pending_count(DeferredAction::HideControls)
    }

    /// Snapshot handed to subscribers
    pub fn state(&self) -> ScreenState {
        let (current_time, duration) = match &self.engine {
            Some(engine) => (engine.current_time(), engine.duration()),
            None => (0.0, 0.0),
        };

        ScreenState {
            media: self.session.source.as_ref().map(|s| s.to_string()),
            engine_available: self.engine.is_some(),
            is_playing: self.session.is_playing,
            is_finished: self.session.is_finished,
            scrub: *self.scrub.state(),
            show_controls: self.visibility.is_visible(),
            auto_hide_pending: self.visibility.state().pending_hide.is_some(),
            current_time: if current_time.is_finite() { current_time } else { 0.0 },
            duration: if duration.is_finite() { duration } else { 0.0 },
        }
    }

    /// Render the overlay for the current state
    pub fn frame(&self, layout: &OverlayLayout) -> OverlayFrame {
        overlay::render(&self.state(), layout)
    }

    /// Register a callback run after every state change
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ScreenState) + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Drop a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let state = self.state();
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&state);
        }
    }

    /// Periodic playback-time report from the engine
    pub fn on_periodic_tick(&mut self, current_time: f64, duration: f64) {
        if self.engine.is_none() {
            return;
        }

        let outcome = self.scrub.on_periodic_tick(current_time, duration);
        debug!("Tick {:.3}/{:.3}s -> {:?}", current_time, duration, outcome);
        if outcome == TickOutcome::Skipped {
            return;
        }

        if outcome.reached_end() && (self.session.is_playing || !self.session.is_finished) {
            info!("Reached end of media");
            self.session.is_finished = true;
            self.session.is_playing = false;
            self.visibility.force_visible(&mut self.timers);
        }

        self.notify();
    }

    /// Drain time reports the engine queued since the last call
    pub fn pump_time_updates(&mut self) {
        let times: Vec<f64> = self.time_rx.try_iter().collect();
        if times.is_empty() {
            return;
        }

        let duration = match &self.engine {
            Some(engine) => engine.duration(),
            None => return,
        };
        for time in times {
            self.on_periodic_tick(time, duration);
        }
    }

    /// Finger down on the scrub handle
    pub fn on_drag_started(&mut self) {
        if !self.controls_enabled("drag start") {
            return;
        }

        self.scrub.begin_drag();
        self.begin_seeking();
        self.notify();
    }

    /// The scrub handle moved `delta_x` from where the drag began
    pub fn on_drag_changed(&mut self, delta_x: f64, track_width: f64) {
        if !self.controls_enabled("drag") {
            return;
        }

        let progress = self.scrub.drag_changed(delta_x, track_width);
        debug!("Drag {:+.1}/{:.1} -> progress {:.4}", delta_x, track_width, progress);
        self.begin_seeking();
        self.notify();
    }

    /// Finger up: commit the scrub position and seek there
    pub fn on_drag_ended(&mut self) {
        if !self.controls_enabled("drag end") {
            return;
        }

        let Some(progress) = self.scrub.end_drag() else {
            debug!("Drag end without an active drag");
            return;
        };

        let duration = self.engine_duration();
        match self.scrub.seek_target(duration) {
            Some(target) => {
                info!("Seeking to {:.3}s ({:.1}%)", target, progress * 100.0);
                self.command("seek", |engine| engine.seek(target));
            }
            None => debug!("Skipping seek, duration unknown"),
        }

        if self.session.is_finished && progress < 1.0 {
            self.session.is_finished = false;
        }

        if self.session.is_playing {
            self.visibility.schedule_hide(&mut self.timers);
        }

        self.pending_settle = Some(
            self.timers
                .schedule(self.settle_delay, DeferredAction::SettleSeek),
        );
        self.notify();
    }

    /// The drag was interrupted; snap back without seeking
    pub fn on_drag_cancelled(&mut self) {
        if !self.controls_enabled("drag cancel") {
            return;
        }

        if self.scrub.cancel_drag() {
            debug!("Drag cancelled");
            if self.session.is_playing {
                self.visibility.schedule_hide(&mut self.timers);
            }
            self.notify();
        }
    }

    /// Play/pause/replay button
    pub fn on_play_pause_toggled(&mut self) {
        if !self.controls_enabled("play/pause") {
            return;
        }

        if self.session.is_finished {
            info!("Restarting from the beginning");
            self.session.is_finished = false;
            self.command("seek", |engine| engine.seek(0.0));
            self.scrub.reset();
        }

        if self.session.is_playing {
            self.command("pause", |engine| engine.pause());
            self.session.is_playing = false;
            self.visibility.force_visible(&mut self.timers);
            info!("Playback paused");
        } else {
            self.command("play", |engine| engine.play());
            self.session.is_playing = true;
            self.visibility.schedule_hide(&mut self.timers);
            info!("Playback started");
        }

        self.notify();
    }

    /// Tap on the video surface
    pub fn on_surface_tapped(&mut self) {
        if !self.controls_enabled("tap") {
            return;
        }

        let visibility = self.visibility.toggle(&mut self.timers);
        if visibility == Visibility::Visible && self.session.is_playing {
            self.visibility.schedule_hide(&mut self.timers);
        }
        self.notify();
    }

    /// Earliest deadline among pending deferred actions
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Current time of the deferred-action clock
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Move the deferred-action clock to `now` and run what is due
    pub fn fire_due_timers(&mut self, now: Duration) {
        let fired = self.timers.advance_to(now);
        if fired.is_empty() {
            return;
        }

        let mut changed = false;
        for (id, action) in fired {
            match action {
                DeferredAction::HideControls => {
                    if self.visibility.on_hide_fired(id, self.session.is_playing) {
                        info!("Controls auto-hidden");
                        changed = true;
                    }
                }
                DeferredAction::SettleSeek => {
                    if self.pending_settle == Some(id) {
                        self.pending_settle = None;
                        self.scrub.settle();
                        debug!("Seek settled");
                        changed = true;
                    }
                }
            }
        }

        if changed {
            self.notify();
        }
    }

    /// Seeking cancels any pending hide and shows the controls; a new drag
    /// also supersedes the previous drag's settle delay.
    fn begin_seeking(&mut self) {
        if let Some(id) = self.pending_settle.take() {
            self.timers.cancel(id);
        }
        self.visibility.force_visible(&mut self.timers);
    }

    fn controls_enabled(&self, what: &str) -> bool {
        if self.engine.is_none() {
            debug!("Ignoring {}: no playback engine", what);
            return false;
        }
        true
    }

    fn engine_duration(&self) -> f64 {
        self.engine
            .as_ref()
            .map(|engine| engine.duration())
            .unwrap_or(f64::NAN)
    }

    /// Issue a fire-and-forget engine command, logging failures
    fn command<F>(&mut self, what: &str, f: F)
    where
        F: FnOnce(&mut dyn PlaybackEngine) -> Result<()>,
    {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if let Err(e) = f(engine.as_mut()) {
            warn!("Engine {} failed: {}", what, e);
        }
    }
}
