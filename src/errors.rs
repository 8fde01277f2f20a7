//! Shared error types for the radar pipeline.
//!
//! Fatal input errors (missing columns, missing or invalid configuration) are
//! raised before any stage mutates output. Missing values inside a valid batch
//! are never errors: they travel as `None` through the stages.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for radar operations
#[derive(Debug, Error)]
pub enum Error {
    /// The input batch lacks one or more mandatory columns
    #[error("Missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// A required configuration key is absent
    #[error("Configuration key `{key}` is required")]
    MissingConfigKey { key: String },

    /// A configuration value is present but unusable
    #[error("Invalid configuration `{field}`: {message}")]
    InvalidConfig { field: String, message: String },

    /// A mapping rule row cannot be used
    #[error("Invalid mapping rule #{index}: {message}")]
    InvalidRule { index: usize, message: String },

    /// File system related errors
    #[error("File system error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input batch has the wrong shape
    #[error("Malformed input batch: {0}")]
    MalformedBatch(String),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a file system error with path context
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid-config error for a named field
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for radar operations
pub type Result<T> = std::result::Result<T, Error>;
