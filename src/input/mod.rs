//! Terminal input for scrubview
//!
//! Converts lines typed on the terminal into the screen's gesture
//! handlers, standing in for touch events on the video surface.

use crate::player::PlayerScreen;
use crate::utils::error::{Result, ScrubError};

/// A parsed terminal command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UserCommand {
    /// Tap on the video surface
    Tap,

    /// Press the play/pause/replay button
    TogglePlayback,

    /// Finger down on the scrub handle
    DragStart,

    /// Handle moved this far from where the drag began
    Drag(f64),

    /// Finger up
    Release,

    /// Gesture interrupted
    Cancel,

    /// Drag straight to a fraction of the track and release
    ScrubTo(f64),

    /// Print the current state
    State,

    Help,
    Quit,
}

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Continue,
    ShowState,
    ShowHelp,
    Quit,
}

/// Command reference printed by `help`
pub const HELP: &str = "\
commands:
  tap              toggle the overlay controls
  toggle | space   play / pause / replay
  press            put a finger on the scrub handle
  drag <dx>        move the handle dx points from where the drag began
  release          lift the finger and seek
  cancel           abandon the drag
  scrub <0..1>     drag to a fraction of the track and release
  state            print the screen state
  quit";

impl UserCommand {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(None);
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "tap" | "t" => UserCommand::Tap,
            "toggle" | "space" | "p" => UserCommand::TogglePlayback,
            "press" => UserCommand::DragStart,
            "drag" | "d" => UserCommand::Drag(parse_number(words.next(), "drag")?),
            "release" | "r" => UserCommand::Release,
            "cancel" => UserCommand::Cancel,
            "scrub" | "s" => {
                let fraction = parse_number(words.next(), "scrub")?;
                if !(0.0..=1.0).contains(&fraction) {
                    return Err(ScrubError::InvalidInput(format!(
                        "scrub target {} is outside 0..1",
                        fraction
                    )));
                }
                UserCommand::ScrubTo(fraction)
            }
            "state" => UserCommand::State,
            "help" | "?" => UserCommand::Help,
            "quit" | "q" | "exit" => UserCommand::Quit,
            other => {
                return Err(ScrubError::InvalidInput(format!(
                    "unknown command '{}'",
                    other
                )))
            }
        };

        if let Some(extra) = words.next() {
            return Err(ScrubError::InvalidInput(format!(
                "unexpected argument '{}'",
                extra
            )));
        }

        Ok(Some(command))
    }

    /// Apply the command to `screen`, whose scrub track is `track_width` wide
    pub fn dispatch(self, screen: &mut PlayerScreen, track_width: f64) -> Dispatch {
        match self {
            UserCommand::Tap => screen.on_surface_tapped(),
            UserCommand::TogglePlayback => screen.on_play_pause_toggled(),
            UserCommand::DragStart => screen.on_drag_started(),
            UserCommand::Drag(dx) => screen.on_drag_changed(dx, track_width),
            UserCommand::Release => screen.on_drag_ended(),
            UserCommand::Cancel => screen.on_drag_cancelled(),
            UserCommand::ScrubTo(fraction) => {
                let committed = screen.scrub().last_committed_progress;
                screen.on_drag_started();
                screen.on_drag_changed((fraction - committed) * track_width, track_width);
                screen.on_drag_ended();
            }
            UserCommand::State => return Dispatch::ShowState,
            UserCommand::Help => return Dispatch::ShowHelp,
            UserCommand::Quit => return Dispatch::Quit,
        }
        Dispatch::Continue
    }
}

fn parse_number(word: Option<&str>, command: &str) -> Result<f64> {
    let word = word
        .ok_or_else(|| ScrubError::InvalidInput(format!("{} needs a number", command)))?;
    let value: f64 = word
        .parse()
        .map_err(|_| ScrubError::InvalidInput(format!("'{}' is not a number", word)))?;
    if !value.is_finite() {
        return Err(ScrubError::InvalidInput(format!("'{}' is not finite", word)));
    }
    Ok(value)
}
