//! Storage layer for paste-relay.
//!
//! Everything lives in memory and disappears with the process.

mod memory;

pub use memory::EphemeralStore;

use crate::error::{StoreError, StoreResult};
use paste_types::StoreKey;

/// A value held by the relay store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreValue {
    /// Opaque payload or salt bytes.
    Bytes(Vec<u8>),
    /// Unix timestamp in nanoseconds.
    Timestamp(i64),
}

impl StoreValue {
    fn shape(&self) -> &'static str {
        match self {
            StoreValue::Bytes(_) => "bytes",
            StoreValue::Timestamp(_) => "timestamp",
        }
    }

    /// Unwrap a byte value read from `key`.
    pub fn into_bytes(self, key: StoreKey) -> StoreResult<Vec<u8>> {
        match self {
            StoreValue::Bytes(bytes) => Ok(bytes),
            other => Err(StoreError::UnexpectedShape {
                key: key.to_string(),
                expected: "bytes",
                actual: other.shape(),
            }),
        }
    }

    /// Unwrap a timestamp read from `key`.
    pub fn into_timestamp(self, key: StoreKey) -> StoreResult<i64> {
        match self {
            StoreValue::Timestamp(nanos) => Ok(nanos),
            other => Err(StoreError::UnexpectedShape {
                key: key.to_string(),
                expected: "timestamp",
                actual: other.shape(),
            }),
        }
    }
}

/// The store the relay serves from.
pub type RelayStore = EphemeralStore<StoreKey, StoreValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_unwrap() {
        let value = StoreValue::Bytes(b"clipboardValue".to_vec());
        assert_eq!(value.into_bytes(StoreKey::Data).unwrap(), b"clipboardValue");
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let err = StoreValue::Timestamp(42)
            .into_bytes(StoreKey::Data)
            .unwrap_err();
        assert_eq!(err.to_string(), "data holds timestamp, expected bytes");

        let err = StoreValue::Bytes(vec![])
            .into_timestamp(StoreKey::LastUpdated)
            .unwrap_err();
        assert!(matches!(err, StoreError::UnexpectedShape { .. }));
    }
}
