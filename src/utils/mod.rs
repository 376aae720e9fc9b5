//! Utility module for scrubview
//!
//! This module provides common utilities used throughout the crate:
//! - Error handling with custom error types
//! - Configuration management
//! - Common helper functions

pub mod config;
pub mod error;

// Re-export commonly used items
pub use config::{Config, GeneralConfig, OverlayConfig, ScreenConfig};
pub use error::{IntoScrubError, Result, ScrubError};

/// Load the application configuration
///
/// Loads configuration from:
/// 1. Default values
/// 2. System configuration file
/// 3. User configuration file
/// 4. `explicit`, when given
/// 5. Environment variables
pub fn load_config(explicit: Option<&std::path::Path>) -> Result<Config> {
    Config::load_with(explicit)
}

/// Format a duration for display
///
/// # Returns
///
/// Formatted string in the format "HH:MM:SS" or "MM:SS" for durations under an hour
pub fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Convert seconds to a Duration, saturating instead of panicking
///
/// Negative and NaN input gives zero; anything too large for a Duration
/// gives [`Duration::MAX`](std::time::Duration::MAX).
pub fn secs_to_duration(seconds: f64) -> std::time::Duration {
    std::time::Duration::try_from_secs_f64(seconds).unwrap_or(if seconds > 0.0 {
        std::time::Duration::MAX
    } else {
        std::time::Duration::ZERO
    })
}

/// Format a position given in seconds; negative or non-finite input shows as zero
pub fn format_seconds(seconds: f64) -> String {
    if seconds.is_finite() {
        format_duration(secs_to_duration(seconds))
    } else {
        format_duration(std::time::Duration::ZERO)
    }
}

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_duration() {
        use std::time::Duration;

        assert_eq!(format_duration(Duration::from_secs(0)), "00:00");
        assert_eq!(format_duration(Duration::from_secs(59)), "00:59");
        assert_eq!(format_duration(Duration::from_secs(60)), "01:00");
        assert_eq!(format_duration(Duration::from_secs(3599)), "59:59");
        assert_eq!(format_duration(Duration::from_secs(3600)), "01:00:00");
        assert_eq!(format_duration(Duration::from_secs(7325)), "02:02:05");
    }

    #[test]
    fn test_huge_seconds_saturate() {
        use std::time::Duration;

        assert_eq!(secs_to_duration(1e20), Duration::MAX);
        assert_eq!(secs_to_duration(f64::INFINITY), Duration::MAX);
        assert_eq!(secs_to_duration(-1.0), Duration::ZERO);
        assert_eq!(secs_to_duration(f64::NAN), Duration::ZERO);
        assert_eq!(secs_to_duration(1.5), Duration::from_millis(1500));

        assert_eq!(format_seconds(1e20), format_duration(Duration::MAX));
        assert_eq!(format_seconds(f64::INFINITY), "00:00");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(61.9), "01:01");
        assert_eq!(format_seconds(-3.0), "00:00");
        assert_eq!(format_seconds(f64::NAN), "00:00");
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 10), 5);
        assert_eq!(clamp(-5, 0, 10), 0);
        assert_eq!(clamp(15, 0, 10), 10);
        assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
    }

    proptest! {
        #[test]
        fn clamp_stays_in_unit_interval(value in -10.0f64..10.0) {
            let clamped = clamp(value, 0.0, 1.0);
            prop_assert!((0.0..=1.0).contains(&clamped));
        }
    }
}
