//! One-line terminal rendering of an overlay frame

use crate::overlay::{OverlayFrame, PlaybackIcon};

/// Render `frame` as a single line with a scrub bar `columns` cells wide
pub fn render_line(frame: &OverlayFrame, columns: usize) -> String {
    let Some(surface) = &frame.surface else {
        return "[ no video ]".to_string();
    };

    let bar = &surface.scrub_bar;
    let columns = columns.max(2);
    let ratio = if bar.track_width > 0.0 {
        bar.fill_width / bar.track_width
    } else {
        0.0
    };
    let filled = ((ratio * columns as f64).round() as usize).min(columns);

    let mut cells: Vec<char> = (0..columns)
        .map(|i| if i < filled { '=' } else { '-' })
        .collect();
    if bar.handle_scale > 0.0 {
        cells[filled.min(columns - 1)] = 'O';
    }
    let track: String = cells.into_iter().collect();

    let button = match surface.controls.map(|c| c.icon) {
        Some(PlaybackIcon::Play) => "[ > ]",
        Some(PlaybackIcon::Pause) => "[ || ]",
        Some(PlaybackIcon::Replay) => "[ <> ]",
        None => "",
    };

    if button.is_empty() {
        format!("|{}| {}", track, surface.time_label)
    } else {
        format!("|<< {} >>| |{}| {}", button, track, surface.time_label)
    }
}
