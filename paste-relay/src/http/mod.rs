//! HTTP endpoints for paste-relay.
//!
//! | path | GET | PUT |
//! |---|---|---|
//! | `/` | stored payload | replace payload, stamp `lastUpdated` |
//! | `/salt` | current salt | rotate, return new salt |
//! | `/lastupdated` | unix nanoseconds | - |
//! | `/health` | status JSON | - |
//!
//! Everything except `/health` sits behind basic auth when it is configured.

mod auth;
mod handlers;
pub mod health;

use crate::server::PasteRelay;
use axum::{
    middleware,
    routing::{get, put},
    Extension, Router,
};
use paste_types::Resource;
use std::sync::Arc;

pub use health::HealthStatus;

/// Build the HTTP router with all endpoints.
pub fn build_router(relay: Arc<PasteRelay>) -> Router {
    let resources = Router::new()
        .route(
            Resource::Root.path(),
            get(handlers::get_data)
                .put(handlers::put_data)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            Resource::Salt.path(),
            put(handlers::rotate_salt)
                .get(handlers::get_salt)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            Resource::LastUpdated.path(),
            get(handlers::get_last_updated).fallback(handlers::method_not_allowed),
        )
        .route_layer(middleware::from_fn_with_state(
            relay.clone(),
            auth::require_basic_auth,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(resources)
        .layer(Extension(relay))
}
