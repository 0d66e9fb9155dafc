//! Error types for the todo engine.

use thiserror::Error;

/// All possible errors from the todo engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
