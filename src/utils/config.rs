//! Configuration management for scrubview
//!
//! This module handles loading and managing application configuration
//! from various sources including config files and environment variables.

use crate::utils::error::{IntoScrubError, Result, ScrubError};
use crate::utils::secs_to_duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound for every configured delay or interval, in seconds
pub const MAX_TIMING_SECS: f64 = 3600.0;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interaction timing
    pub screen: ScreenConfig,

    /// Overlay geometry
    pub overlay: OverlayConfig,

    /// General application settings
    pub general: GeneralConfig,
}

/// Timing of the interaction state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Seconds of inactivity before the controls hide while playing
    pub hide_controls_after_secs: f64,

    /// Seconds after a drag ends before periodic ticks drive progress again
    pub seek_settle_secs: f64,

    /// Interval of the engine's periodic time callback
    pub time_update_interval_secs: f64,
}

/// Overlay geometry, in points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Screen width; the scrub track spans all of it
    pub screen_width: f64,

    /// Player surface height is `screen_width / height_divisor`
    pub height_divisor: f64,

    /// Height of the scrub track
    pub track_height: f64,

    /// Diameter of the scrub handle
    pub handle_diameter: f64,

    /// Width of the square hit box around the handle
    pub handle_hit_size: f64,

    /// Handle scale while the controls are shown or a drag is active
    pub handle_active_scale: f64,

    /// Opacity of the dim layer behind visible controls
    pub dim_opacity: f64,
}

/// General application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Start playing as soon as the media is mounted
    pub auto_play: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            hide_controls_after_secs: 3.0,
            seek_settle_secs: 0.5,
            time_update_interval_secs: 1.0,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            screen_width: 390.0,
            height_divisor: 3.4,
            track_height: 3.0,
            handle_diameter: 16.0,
            handle_hit_size: 50.0,
            handle_active_scale: 1.3,
            dim_opacity: 0.4,
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            auto_play: false,
        }
    }
}

impl ScreenConfig {
    /// Auto-hide delay as a Duration
    pub fn hide_controls_after(&self) -> Duration {
        secs_to_duration(self.hide_controls_after_secs)
    }

    /// Seek settle delay as a Duration
    pub fn seek_settle(&self) -> Duration {
        secs_to_duration(self.seek_settle_secs)
    }

    /// Periodic time callback interval as a Duration
    pub fn time_update_interval(&self) -> Duration {
        secs_to_duration(self.time_update_interval_secs)
    }
}

impl Config {
    /// Load configuration from various sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. System config file (/etc/scrubview/config.toml on Linux)
    /// 3. User config file (~/.config/scrubview/config.toml on Linux)
    /// 4. `explicit`, when given (must exist)
    /// 5. Environment variables (SCRUBVIEW_* prefix)
    pub fn load_with(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(system_path) = Self::system_config_path() {
            if system_path.exists() {
                config.merge_from_file(&system_path)?;
            }
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                config.merge_from_file(&user_path)?;
            }
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ScrubError::NotFound(path.display().to_string()));
            }
            config.merge_from_file(path)?;
        }

        config.apply_env_overrides()?;
        config.validate()?;

        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Save configuration to the given path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .config_err("Failed to create config directory")?;
        }

        let toml = toml::to_string_pretty(self).config_err("Failed to serialize config")?;
        std::fs::write(path, toml).config_err("Failed to write config file")?;

        Ok(())
    }

    /// Merge configuration from a TOML file
    ///
    /// Keys present in the file replace the current values; everything the
    /// file leaves out keeps whatever earlier sources set.
    fn merge_from_file(&mut self, path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(path).config_err("Failed to read config file")?;

        let overlay: toml::Table =
            toml::from_str(&contents).config_err("Failed to parse config file")?;

        let mut merged = toml::Value::try_from(&*self).config_err("Failed to serialize config")?;
        if let toml::Value::Table(table) = &mut merged {
            merge_tables(table, overlay);
        }

        *self = merged
            .try_into()
            .config_err(&format!("Invalid config file {}", path.display()))?;

        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(secs) = std::env::var("SCRUBVIEW_HIDE_AFTER_SECS") {
            self.screen.hide_controls_after_secs = parse_env("SCRUBVIEW_HIDE_AFTER_SECS", &secs)?;
        }

        if let Ok(secs) = std::env::var("SCRUBVIEW_SEEK_SETTLE_SECS") {
            self.screen.seek_settle_secs = parse_env("SCRUBVIEW_SEEK_SETTLE_SECS", &secs)?;
        }

        if let Ok(secs) = std::env::var("SCRUBVIEW_TIME_INTERVAL_SECS") {
            self.screen.time_update_interval_secs =
                parse_env("SCRUBVIEW_TIME_INTERVAL_SECS", &secs)?;
        }

        if let Ok(width) = std::env::var("SCRUBVIEW_TRACK_WIDTH") {
            self.overlay.screen_width = parse_env("SCRUBVIEW_TRACK_WIDTH", &width)?;
        }

        if let Ok(log_level) = std::env::var("SCRUBVIEW_LOG_LEVEL") {
            self.general.log_level = log_level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let timings = [
            ("hide_controls_after_secs", self.screen.hide_controls_after_secs),
            ("seek_settle_secs", self.screen.seek_settle_secs),
            ("time_update_interval_secs", self.screen.time_update_interval_secs),
        ];
        for (name, value) in timings {
            let convertible = Duration::try_from_secs_f64(value).is_ok();
            if !convertible || value <= 0.0 || value > MAX_TIMING_SECS {
                return Err(ScrubError::Config(format!(
                    "{} must be between 0 and {} seconds, got {}",
                    name, MAX_TIMING_SECS, value
                )));
            }
        }

        let geometry = [
            ("screen_width", self.overlay.screen_width),
            ("height_divisor", self.overlay.height_divisor),
            ("track_height", self.overlay.track_height),
            ("handle_diameter", self.overlay.handle_diameter),
            ("handle_hit_size", self.overlay.handle_hit_size),
        ];
        for (name, value) in geometry {
            if !value.is_finite() || value <= 0.0 {
                return Err(ScrubError::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.overlay.dim_opacity) {
            return Err(ScrubError::Config(
                "Dim opacity must be between 0.0 and 1.0".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.general.log_level.as_str()) {
            return Err(ScrubError::Config(format!(
                "Invalid log level '{}', must be one of: {:?}",
                self.general.log_level, valid_log_levels
            )));
        }

        Ok(())
    }

    /// Get system config file path
    fn system_config_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        return Some(PathBuf::from("/etc/scrubview/config.toml"));

        #[cfg(target_os = "macos")]
        return Some(PathBuf::from(
            "/Library/Application Support/scrubview/config.toml",
        ));

        #[cfg(target_os = "windows")]
        return std::env::var("PROGRAMDATA")
            .ok()
            .map(|p| PathBuf::from(p).join("scrubview").join("config.toml"));

        #[allow(unreachable_code)]
        None
    }

    /// Get user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("scrubview").join("config.toml"))
    }
}

/// Recursively overlay `source` onto `target`; nested tables merge key by key
fn merge_tables(target: &mut toml::Table, source: toml::Table) {
    for (key, value) in source {
        match (target.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

fn parse_env(name: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| ScrubError::Config(format!("Invalid {}", name)))
}
