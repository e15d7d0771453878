//! Error types for the Assetflow engine

use thiserror::Error;

/// Main application error type.
///
/// Business-rule denials are *not* errors: guarded operations report them
/// through [`crate::models::Decision`] so the caller can surface the reason
/// to the end user. `AppError` is reserved for integrity and environment
/// failures (unknown ids, malformed input, storage trouble).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
