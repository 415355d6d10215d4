//! Error types for paste-relay.

use paste_crypto::CryptoError;

/// Main error type for relay operations.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Salt generation failed.
    #[error("salt generation failed: {0}")]
    Random(#[from] CryptoError),

    /// Could not bind the listening socket.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Address that was requested.
        address: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ephemeral store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Key was never set, was deleted, or has expired.
    #[error("{key} not found")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },

    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,

    /// The value under a key has a different shape than the caller expects.
    #[error("{key} holds {actual}, expected {expected}")]
    UnexpectedShape {
        /// The key that was read.
        key: String,
        /// Shape the caller wanted.
        expected: &'static str,
        /// Shape that was stored.
        actual: &'static str,
    },
}

impl StoreError {
    /// Whether this is a plain miss rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
