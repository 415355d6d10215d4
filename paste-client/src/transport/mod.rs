//! Transport abstraction for pastebox.
//!
//! The client only ever needs two verbs against three resources, so the
//! transport trait is request/response rather than connection-oriented:
//! - `get()` reads a resource
//! - `put()` writes a resource and returns the response body
//!
//! # Example
//!
//! ```ignore
//! let transport = MockTransport::new();
//! transport.put(Resource::Root, b"hello".to_vec()).await?;
//! let data = transport.get(Resource::Root).await?;
//! ```

mod http;
mod mock;

pub use http::{HttpTransport, HttpTransportConfig, DEFAULT_TIMEOUT};
pub use mock::MockTransport;

use async_trait::async_trait;
use paste_types::Resource;
use thiserror::Error;

/// Transport errors.
///
/// Every variant names the request that failed.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The relay address is not an http(s) URL.
    #[error("invalid relay address {address:?}: {reason}")]
    InvalidAddress {
        /// Address as given.
        address: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The request did not finish within the configured timeout.
    #[error("{method} {resource}: request timed out")]
    Timeout {
        /// HTTP verb.
        method: &'static str,
        /// Target resource.
        resource: Resource,
    },

    /// The request could not be sent or the response could not be read.
    #[error("{method} {resource}: request failed: {reason}")]
    RequestFailed {
        /// HTTP verb.
        method: &'static str,
        /// Target resource.
        resource: Resource,
        /// Underlying error.
        reason: String,
    },

    /// The relay has nothing stored under this resource.
    #[error("{resource} not found on the relay")]
    NotFound {
        /// Target resource.
        resource: Resource,
    },

    /// The relay answered with an unexpected status.
    #[error("{method} {resource}: failed request: status {status}")]
    Status {
        /// HTTP verb.
        method: &'static str,
        /// Target resource.
        resource: Resource,
        /// HTTP status code.
        status: u16,
    },

    /// The response body is larger than the configured maximum.
    #[error("{method} {resource}: response exceeds set limit {limit} bytes")]
    SizeLimitExceeded {
        /// HTTP verb.
        method: &'static str,
        /// Target resource.
        resource: Resource,
        /// Maximum accepted size.
        limit: u64,
    },
}

impl TransportError {
    /// Whether retrying the same request could succeed.
    ///
    /// Only meaningful for reads: a retried salt rotation is a new rotation.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Timeout { .. } | TransportError::RequestFailed { .. }
        )
    }
}

/// Transport trait for talking to a pastebox relay.
///
/// Implementations handle the underlying mechanism (HTTP, in-memory mock).
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Read `resource`.
    async fn get(&self, resource: Resource) -> Result<Vec<u8>, TransportError>;

    /// Write `body` to `resource` and return the response body.
    async fn put(&self, resource: Resource, body: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}
