//! # AppError
//!
//! Centralized error handling for devsite.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all ds-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Comment, Post)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., empty author, comment too long)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Address mismatch on an owner-only operation
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Key-value store failure (e.g., remote unreachable, corrupt record)
    #[error("store error: {0}")]
    Store(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Store(format!("{err:#}"))
    }
}

/// A specialized Result type for devsite logic.
pub type Result<T> = std::result::Result<T, AppError>;
