//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid model code: {0}")]
    InvalidModelCode(String),

    #[error("invalid section name: {0}")]
    InvalidSection(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    #[error("invalid node kind: {0}")]
    InvalidNodeKind(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
