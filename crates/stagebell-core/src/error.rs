//! Core error types for stagebell-core.
//!
//! Invalid configuration is the only error surfaced before a run starts;
//! sound problems are recovered locally and never interrupt a running
//! session.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for stagebell-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Sound playback errors
    #[error("Sound error: {0}")]
    Sound(#[from] SoundError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
///
/// `InvalidValue` covers every way a timer configuration can be rejected
/// before a run starts; the load/save variants cover the persisted record.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Sound playback errors. Always recovered locally by the sink.
#[derive(Error, Debug)]
pub enum SoundError {
    /// No file is configured or the configured file is missing
    #[error("Sound file not found: {path}")]
    NotFound { path: PathBuf },

    /// The external player process could not be started
    #[error("Failed to start audio player: {0}")]
    SpawnFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
