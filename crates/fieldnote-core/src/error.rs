//! Error types for fieldnote-core

use thiserror::Error;

/// Result type alias using fieldnote-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fieldnote-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Remote document store error
    #[error("Store error: {0}")]
    Store(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
