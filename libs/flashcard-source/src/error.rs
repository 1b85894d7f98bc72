//! Error types for source acquisition and configuration.

use thiserror::Error;

/// Source text could not be obtained.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("source not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("invalid source identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),

    #[error(transparent)]
    Invalid(#[from] flashcard_core::ConfigError),

    #[error("invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot read configuration file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using AcquisitionError.
pub type Result<T> = std::result::Result<T, AcquisitionError>;
