//! Saarthi Error Types
//!
//! Centralized error handling for the assistant.

use thiserror::Error;

/// Central error type for Saarthi
#[derive(Error, Debug)]
pub enum SaarthiError {
    #[error("Speech recognition error: {0}")]
    Recognition(String),

    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("Audio capture error: {0}")]
    Audio(String),

    #[error("Camera error: {0}")]
    Camera(String),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lock poisoned: {0}")]
    Lock(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Saarthi operations
pub type SaarthiResult<T> = Result<T, SaarthiError>;

/// Helper to convert Mutex poison errors
impl<T> From<std::sync::PoisonError<T>> for SaarthiError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        SaarthiError::Lock(err.to_string())
    }
}
