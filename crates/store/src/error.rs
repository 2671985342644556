//! Tracker store error types.

use thiserror::Error;

/// Tracker store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    /// Model scoping disagreement. Loud on purpose: a silently empty
    /// result here would be a cross-model data leak.
    #[error("model mismatch: requested '{requested}', stored '{stored}'")]
    TenantMismatch { requested: String, stored: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid range: index {index} out of bounds for {len} siblings")]
    InvalidRange { index: usize, len: usize },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
