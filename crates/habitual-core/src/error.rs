//! Core error types for habitual-core.
//!
//! This module defines the error hierarchy using thiserror. Engine errors
//! (`NotFound`, `AlreadyCompleted`, `DuplicateHabit`) never leave a
//! snapshot partially mutated; store errors (`Io`, `Parse`) surface before
//! any engine operation runs.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitual-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Unknown habit id
    #[error("Habit not found: {id}")]
    NotFound { id: String },

    /// The habit already has a completion marker for the current day
    #[error("Habit '{id}' already completed on {date}")]
    AlreadyCompleted { id: String, date: chrono::NaiveDate },

    /// A habit with this id already exists
    #[error("Habit already exists: {id}")]
    DuplicateHabit { id: String },

    /// Missing or malformed user input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Store could not be read or written
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store contents are not a valid snapshot
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors outside the store
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
