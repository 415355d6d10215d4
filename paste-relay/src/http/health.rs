//! Health check endpoint.

use crate::server::PasteRelay;
use axum::{Extension, Json};
use serde::Serialize;
use std::sync::Arc;

/// Health status response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Entry lifetime in seconds (0 when expiry is disabled).
    pub ttl_secs: u64,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Health check handler.
pub async fn health_handler(Extension(relay): Extension<Arc<PasteRelay>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ttl_secs: relay.store().ttl().map_or(0, |ttl| ttl.as_secs()),
        uptime_seconds: relay.uptime_secs(),
    })
}
