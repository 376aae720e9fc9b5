//! Overlay presentation for scrubview
//!
//! Pure projection of a [`ScreenState`] onto the overlay's geometry: the
//! scrub bar fill and handle, the dim layer, and which play/pause/replay
//! icon to draw. Nothing here holds state of its own.

mod text;

pub use text::render_line;

use crate::player::ScreenState;
use crate::utils::{clamp, format_seconds, OverlayConfig};
use serde::Serialize;

/// Overlay geometry, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayout {
    /// Width of the scrub track (the full surface width)
    pub track_width: f64,

    /// Height of the video surface
    pub surface_height: f64,

    pub track_height: f64,
    pub handle_diameter: f64,
    pub handle_hit_size: f64,
    pub handle_active_scale: f64,
    pub dim_opacity: f64,
}

impl OverlayLayout {
    /// Layout for a screen of the configured width
    pub fn from_config(config: &OverlayConfig) -> Self {
        Self {
            track_width: config.screen_width,
            surface_height: config.screen_width / config.height_divisor,
            track_height: config.track_height,
            handle_diameter: config.handle_diameter,
            handle_hit_size: config.handle_hit_size,
            handle_active_scale: config.handle_active_scale,
            dim_opacity: config.dim_opacity,
        }
    }

    /// Same layout on a track of a different width
    pub fn with_track_width(self, track_width: f64, height_divisor: f64) -> Self {
        Self {
            track_width,
            surface_height: track_width / height_divisor,
            ..self
        }
    }
}

impl Default for OverlayLayout {
    fn default() -> Self {
        Self::from_config(&OverlayConfig::default())
    }
}

/// Icon on the central button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackIcon {
    Play,
    Pause,
    Replay,
}

impl PlaybackIcon {
    /// Replay once finished, otherwise pause while playing and play while not
    pub fn for_state(is_playing: bool, is_finished: bool) -> Self {
        if is_finished {
            PlaybackIcon::Replay
        } else if is_playing {
            PlaybackIcon::Pause
        } else {
            PlaybackIcon::Play
        }
    }
}

/// Scrub bar geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrubBarFrame {
    pub track_width: f64,
    pub track_height: f64,

    /// Width of the played portion: `track_width * progress`
    pub fill_width: f64,

    /// Leading edge of the handle's hit box
    pub handle_offset: f64,

    pub handle_hit_size: f64,
    pub handle_diameter: f64,

    /// Zero while the handle is concealed
    pub handle_scale: f64,
}

impl ScrubBarFrame {
    /// Whether `x` (track coordinates) lands on the handle's hit box
    pub fn handle_contains(&self, x: f64) -> bool {
        x >= self.handle_offset && x <= self.handle_offset + self.handle_hit_size
    }
}

/// Central controls, present only while shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlsFrame {
    pub icon: PlaybackIcon,

    /// Previous/next are drawn but never enabled on a single-item screen
    pub skip_back_enabled: bool,
    pub skip_forward_enabled: bool,
}

/// Everything drawn over the video surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceFrame {
    pub width: f64,
    pub height: f64,
    pub dim_opacity: f64,
    pub controls: Option<ControlsFrame>,
    pub scrub_bar: ScrubBarFrame,
    pub time_label: String,
}

/// One rendered overlay; `surface` is `None` when no engine is attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayFrame {
    pub surface: Option<SurfaceFrame>,
}

impl OverlayFrame {
    /// Controls accept input only when a surface is shown
    pub fn controls_enabled(&self) -> bool {
        self.surface.is_some()
    }
}

/// Project `state` onto `layout`
pub fn render(state: &ScreenState, layout: &OverlayLayout) -> OverlayFrame {
    if !state.engine_available {
        return OverlayFrame { surface: None };
    }

    let progress = clamp(state.scrub.progress, 0.0, 1.0);
    let fill_width = layout.track_width * progress;
    let handle_active = state.show_controls || state.scrub.is_dragging;

    let scrub_bar = ScrubBarFrame {
        track_width: layout.track_width,
        track_height: layout.track_height,
        fill_width,
        handle_offset: fill_width - layout.handle_hit_size / 2.0,
        handle_hit_size: layout.handle_hit_size,
        handle_diameter: layout.handle_diameter,
        handle_scale: if handle_active {
            layout.handle_active_scale
        } else {
            0.0
        },
    };

    let controls = state.show_controls.then(|| ControlsFrame {
        icon: PlaybackIcon::for_state(state.is_playing, state.is_finished),
        skip_back_enabled: false,
        skip_forward_enabled: false,
    });

    OverlayFrame {
        surface: Some(SurfaceFrame {
            width: layout.track_width,
            height: layout.surface_height,
            dim_opacity: if state.show_controls {
                layout.dim_opacity
            } else {
                0.0
            },
            controls,
            scrub_bar,
            time_label: format!(
                "{} / {}",
                format_seconds(progress * state.duration),
                format_seconds(state.duration)
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::ScrubState;
    use proptest::prelude::*;

    fn playing_state(progress: f64) -> ScreenState {
        ScreenState {
            media: Some("samplevideo.mp4".to_string()),
            engine_available: true,
            is_playing: true,
            is_finished: false,
            scrub: ScrubState {
                progress,
                last_committed_progress: progress,
                ..ScrubState::default()
            },
            show_controls: true,
            auto_hide_pending: true,
            current_time: progress * 100.0,
            duration: 100.0,
        }
    }

    #[test]
    fn test_blank_when_engine_missing() {
        let frame = render(&ScreenState::blank(), &OverlayLayout::default());
        assert!(frame.surface.is_none());
        assert!(!frame.controls_enabled());
    }

    #[test]
    fn test_icon_selection() {
        assert_eq!(PlaybackIcon::for_state(false, false), PlaybackIcon::Play);
        assert_eq!(PlaybackIcon::for_state(true, false), PlaybackIcon::Pause);
        assert_eq!(PlaybackIcon::for_state(false, true), PlaybackIcon::Replay);
    }

    #[test]
    fn test_controls_and_dim_follow_visibility() {
        let layout = OverlayLayout::default();
        let mut state = playing_state(0.5);

        let surface = render(&state, &layout).surface.unwrap();
        assert_eq!(surface.dim_opacity, 0.4);
        assert_eq!(surface.scrub_bar.handle_scale, 1.3);
        let controls = surface.controls.unwrap();
        assert_eq!(controls.icon, PlaybackIcon::Pause);
        assert!(!controls.skip_back_enabled && !controls.skip_forward_enabled);

        state.show_controls = false;
        let surface = render(&state, &layout).surface.unwrap();
        assert_eq!(surface.dim_opacity, 0.0);
        assert_eq!(surface.scrub_bar.handle_scale, 0.0);
        assert!(surface.controls.is_none());

        // A drag reveals the handle even with the controls hidden
        state.scrub.is_dragging = true;
        let surface = render(&state, &layout).surface.unwrap();
        assert_eq!(surface.scrub_bar.handle_scale, 1.3);
    }

    #[test]
    fn test_handle_geometry() {
        let layout = OverlayLayout::default().with_track_width(400.0, 3.4);
        let bar = render(&playing_state(0.25), &layout)
            .surface
            .unwrap()
            .scrub_bar;

        assert_eq!(bar.fill_width, 100.0);
        assert_eq!(bar.handle_offset, 75.0);
        assert!(bar.handle_contains(100.0));
        assert!(!bar.handle_contains(130.0));
    }

    #[test]
    fn test_surface_height_and_label() {
        let layout = OverlayLayout::default().with_track_width(340.0, 3.4);
        let surface = render(&playing_state(0.75), &layout).surface.unwrap();
        assert_eq!(surface.height, 100.0);
        assert_eq!(surface.time_label, "01:15 / 01:40");
    }

    #[test]
    fn test_huge_duration_label_saturates() {
        let mut state = playing_state(0.5);
        state.duration = 1e20;

        let surface = render(&state, &OverlayLayout::default()).surface.unwrap();
        let max = format_seconds(f64::MAX);
        assert_eq!(surface.time_label, format!("{} / {}", max, max));
    }

    proptest! {
        #[test]
        fn fill_width_is_proportional_to_progress(
            progress in 0.0f64..=1.0,
            track_width in 1.0f64..4000.0,
        ) {
            let layout = OverlayLayout::default().with_track_width(track_width, 3.4);
            let bar = render(&playing_state(progress), &layout).surface.unwrap().scrub_bar;
            prop_assert_eq!(bar.fill_width, track_width * progress);
        }
    }
}
