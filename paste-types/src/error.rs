//! Error types for pastebox wire types.

use thiserror::Error;

/// Errors that can occur while encoding or parsing wire types.
#[derive(Debug, Error)]
pub enum PasteError {
    /// JSON serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// JSON deserialization failed
    #[error("failed to decode data: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// Data size string could not be parsed
    #[error("invalid data size {input:?}: {reason}")]
    InvalidByteSize {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}
