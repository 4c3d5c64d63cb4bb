mod config;

pub use config::{Config, DisplayConfig, FeedbackConfig, TimerConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/scoreboard[-dev]/` based on SCOREBOARD_ENV.
///
/// Set SCOREBOARD_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SCOREBOARD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("scoreboard-dev")
    } else {
        base_dir.join("scoreboard")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DirUnavailable {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
