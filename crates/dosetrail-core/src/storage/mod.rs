mod config;

pub use config::{Config, DataConfig, TimelineConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/dosetrail[-dev]/` based on DOSETRAIL_ENV.
///
/// Set DOSETRAIL_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(".config");

    let env = std::env::var("DOSETRAIL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("dosetrail-dev")
    } else {
        base_dir.join("dosetrail")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
