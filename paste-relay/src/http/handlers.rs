//! Handlers for the data, salt and last-updated resources.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use paste_types::StoreKey;

use crate::error::{RelayError, StoreError};
use crate::server::PasteRelay;
use crate::storage::StoreValue;

fn plain(status: StatusCode, body: impl Into<String>) -> Response {
    let mut body = body.into();
    body.push('\n');
    (status, body).into_response()
}

fn not_found(key: StoreKey) -> Response {
    plain(StatusCode::NOT_FOUND, format!("The {key} not found"))
}

/// Map a store failure on `key` to a response, logging anything but a miss.
fn read_failure(key: StoreKey, err: StoreError) -> Response {
    if err.is_not_found() {
        return not_found(key);
    }
    tracing::error!("Failed to read {}: {}", key, err);
    plain(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Failed to get {key} from the store"),
    )
}

fn write_failure(key: StoreKey, err: RelayError) -> Response {
    tracing::error!("Failed to write {}: {}", key, err);
    plain(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Failed to store {key}: {err}"),
    )
}

fn unix_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// GET `/`: the stored payload.
pub async fn get_data(Extension(relay): Extension<Arc<PasteRelay>>) -> Response {
    match relay
        .store()
        .get(&StoreKey::Data)
        .and_then(|value| value.into_bytes(StoreKey::Data))
    {
        Ok(bytes) => bytes.into_response(),
        Err(e) => read_failure(StoreKey::Data, e),
    }
}

/// PUT `/`: replace the payload and stamp `lastUpdated`.
pub async fn put_data(Extension(relay): Extension<Arc<PasteRelay>>, body: Body) -> Response {
    let limit = relay.config().server.max_body_size;
    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Unreadable request body: {}", e);
            return plain(StatusCode::BAD_REQUEST, "Bad request body");
        }
    };

    let size = bytes.len();
    if let Err(e) = relay
        .store()
        .put(StoreKey::Data, StoreValue::Bytes(bytes.to_vec()))
    {
        return write_failure(StoreKey::Data, e.into());
    }
    if let Err(e) = relay
        .store()
        .put(StoreKey::LastUpdated, StoreValue::Timestamp(unix_nanos()))
    {
        return write_failure(StoreKey::LastUpdated, e.into());
    }

    tracing::debug!("Stored {} bytes", size);
    StatusCode::OK.into_response()
}

/// GET `/salt`: the current salt, unchanged.
pub async fn get_salt(Extension(relay): Extension<Arc<PasteRelay>>) -> Response {
    match relay.salt().current() {
        Ok(salt) => salt.into_response(),
        Err(RelayError::Store(e)) => read_failure(StoreKey::Salt, e),
        Err(e) => write_failure(StoreKey::Salt, e),
    }
}

/// PUT `/salt`: rotate and return the new salt.
pub async fn rotate_salt(Extension(relay): Extension<Arc<PasteRelay>>) -> Response {
    match relay.salt().rotate() {
        Ok(salt) => salt.into_response(),
        Err(e) => write_failure(StoreKey::Salt, e),
    }
}

/// GET `/lastupdated`: unix nanoseconds of the last data write.
pub async fn get_last_updated(Extension(relay): Extension<Arc<PasteRelay>>) -> Response {
    match relay
        .store()
        .get(&StoreKey::LastUpdated)
        .and_then(|value| value.into_timestamp(StoreKey::LastUpdated))
    {
        Ok(nanos) => nanos.to_string().into_response(),
        Err(e) => read_failure(StoreKey::LastUpdated, e),
    }
}

/// Any verb a resource does not support.
pub async fn method_not_allowed(method: Method) -> Response {
    plain(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Method {method} is not allowed"),
    )
}
