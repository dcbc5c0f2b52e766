//! Error types for response rendering.

use thiserror::Error;

/// Response rendering errors.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The payload could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for response rendering.
pub type Result<T> = std::result::Result<T, ResponseError>;
