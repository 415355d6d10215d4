//! Mock transport for testing.
//!
//! Behaves like an in-memory relay and records every request, so tests can
//! check both the outcome and the exact request order.

use super::{RelayTransport, TransportError};
use async_trait::async_trait;
use paste_types::{Resource, SALT_SIZE};
use std::sync::{Arc, Mutex, MutexGuard};

/// Mock transport for testing.
///
/// Clones share state, so a test can hand one clone to a client and inspect
/// the other.
#[derive(Debug, Default, Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    data: Option<Vec<u8>>,
    salt: Option<Vec<u8>>,
    last_updated: Option<i64>,
    rotations: u64,
    clock: i64,
    requests: Vec<(&'static str, Resource)>,
    fail_next: Option<TransportError>,
}

impl MockTransport {
    /// Create a new mock transport with nothing stored.
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Every request so far, as `(verb, resource)`.
    pub fn requests(&self) -> Vec<(&'static str, Resource)> {
        self.inner().requests.clone()
    }

    /// The stored payload.
    pub fn data(&self) -> Option<Vec<u8>> {
        self.inner().data.clone()
    }

    /// Replace the stored payload without recording a request.
    pub fn set_data(&self, data: Vec<u8>) {
        self.inner().data = Some(data);
    }

    /// The current salt.
    pub fn salt(&self) -> Option<Vec<u8>> {
        self.inner().salt.clone()
    }

    /// Make the next request fail with `error`. Nothing is stored.
    pub fn fail_next(&self, error: TransportError) {
        self.inner().fail_next = Some(error);
    }

    /// Clear all state.
    pub fn reset(&self) {
        *self.inner() = MockTransportInner::default();
    }
}

impl MockTransportInner {
    fn next_salt(&mut self) -> Vec<u8> {
        self.rotations += 1;
        format!("{:0>width$}", self.rotations, width = SALT_SIZE).into_bytes()
    }
}

#[async_trait]
impl RelayTransport for MockTransport {
    async fn get(&self, resource: Resource) -> Result<Vec<u8>, TransportError> {
        let mut inner = self.inner();
        inner.requests.push(("GET", resource));
        if let Some(error) = inner.fail_next.take() {
            return Err(error);
        }

        let value = match resource {
            Resource::Root => inner.data.clone(),
            Resource::Salt => inner.salt.clone(),
            Resource::LastUpdated => inner.last_updated.map(|t| t.to_string().into_bytes()),
        };
        value.ok_or(TransportError::NotFound { resource })
    }

    async fn put(&self, resource: Resource, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let mut inner = self.inner();
        inner.requests.push(("PUT", resource));
        if let Some(error) = inner.fail_next.take() {
            return Err(error);
        }

        match resource {
            Resource::Root => {
                inner.clock += 1;
                let now = inner.clock;
                inner.last_updated = Some(now);
                inner.data = Some(body);
                Ok(Vec::new())
            }
            Resource::Salt => {
                let salt = inner.next_salt();
                inner.salt = Some(salt.clone());
                Ok(salt)
            }
            Resource::LastUpdated => Err(TransportError::Status {
                method: "PUT",
                resource,
                status: 405,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_stores_data() {
        let mock = MockTransport::new();

        mock.put(Resource::Root, b"hello".to_vec()).await.unwrap();

        assert_eq!(mock.get(Resource::Root).await.unwrap(), b"hello");
        assert_eq!(mock.get(Resource::LastUpdated).await.unwrap(), b"1");
    }

    #[tokio::test]
    async fn mock_reports_missing_resources() {
        let mock = MockTransport::new();
        for resource in [Resource::Root, Resource::Salt, Resource::LastUpdated] {
            assert!(matches!(
                mock.get(resource).await,
                Err(TransportError::NotFound { .. })
            ));
        }
    }

    #[tokio::test]
    async fn mock_rotates_salt() {
        let mock = MockTransport::new();

        let first = mock.put(Resource::Salt, Vec::new()).await.unwrap();
        let second = mock.put(Resource::Salt, Vec::new()).await.unwrap();

        assert_eq!(first.len(), SALT_SIZE);
        assert_ne!(first, second);
        assert_eq!(mock.get(Resource::Salt).await.unwrap(), second);
    }

    #[tokio::test]
    async fn mock_records_requests() {
        let mock = MockTransport::new();
        mock.put(Resource::Salt, Vec::new()).await.unwrap();
        mock.put(Resource::Root, b"x".to_vec()).await.unwrap();
        let _ = mock.get(Resource::Root).await;

        assert_eq!(
            mock.requests(),
            vec![
                ("PUT", Resource::Salt),
                ("PUT", Resource::Root),
                ("GET", Resource::Root),
            ]
        );
    }

    #[tokio::test]
    async fn mock_fail_next() {
        let mock = MockTransport::new();
        mock.fail_next(TransportError::Timeout {
            method: "PUT",
            resource: Resource::Root,
        });

        assert!(mock.put(Resource::Root, b"x".to_vec()).await.is_err());
        assert!(mock.data().is_none());

        // Only the next request fails.
        mock.put(Resource::Root, b"x".to_vec()).await.unwrap();
        assert_eq!(mock.data().unwrap(), b"x");
    }

    #[tokio::test]
    async fn mock_clones_share_state() {
        let mock = MockTransport::new();
        let clone = mock.clone();
        clone.put(Resource::Root, b"shared".to_vec()).await.unwrap();
        assert_eq!(mock.data().unwrap(), b"shared");

        mock.reset();
        assert!(clone.data().is_none());
        assert!(clone.requests().is_empty());
    }
}
