pub mod config;

pub use config::{ConfigFile, HmsTime, MsTime, ReminderRange, SoundsConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/stagebell[-dev]/` based on STAGEBELL_ENV.
///
/// Set STAGEBELL_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STAGEBELL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("stagebell-dev")
    } else {
        base_dir.join("stagebell")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Directory holding the notification sound folders.
pub fn notification_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("notification"))
}
