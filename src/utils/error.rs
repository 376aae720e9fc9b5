//! Error types for scrubview
//!
//! This module defines custom error types used throughout the crate.
//! We use thiserror for convenient error type definitions and anyhow for
//! application-level error handling in the binary.

use thiserror::Error;

/// Main error type for scrubview
#[derive(Error, Debug)]
pub enum ScrubError {
    /// Playback engine errors
    #[error("Engine error: {0}")]
    Engine(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl ScrubError {
    /// Create an engine error from string
    pub fn engine_error<S: Into<String>>(msg: S) -> Self {
        ScrubError::Engine(msg.into())
    }
}

/// Convenience type alias for Results in scrubview
pub type Result<T> = std::result::Result<T, ScrubError>;

/// Extension trait for converting other errors to ScrubError
pub trait IntoScrubError<T> {
    /// Convert this error into a configuration error with the given context
    fn config_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoScrubError<T> for std::result::Result<T, E> {
    fn config_err(self, context: &str) -> Result<T> {
        self.map_err(|e| ScrubError::Config(format!("{}: {}", context, e)))
    }
}
