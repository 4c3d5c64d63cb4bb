//! Core error types for scoreboard-core.
//!
//! Game operations are total and never fail. Errors only come from the
//! edges: configuration on disk, parsing user input, and feedback devices.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for scoreboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Feedback device errors
    #[error("Feedback error: {0}")]
    Feedback(#[from] FeedbackError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine or create the configuration directory
    #[error("Failed to prepare configuration directory {path}: {message}")]
    DirUnavailable { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors for user supplied input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Team label that is neither home nor away
    #[error("unknown team '{0}' (expected 'home' or 'away')")]
    UnknownTeam(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors raised by haptic or audio outputs.
///
/// These never reach the user: the feedback emitter logs and drops them.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FeedbackError {
    /// The host offers no such capability
    #[error("{0} output is not available")]
    Unavailable(&'static str),

    /// The device accepted the request but failed to play it
    #[error("playback failed: {0}")]
    PlaybackFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
