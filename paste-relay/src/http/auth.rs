//! Basic authentication middleware.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::{engine::general_purpose::STANDARD, Engine};
use paste_types::UNAUTHORIZED_BODY;

use crate::server::PasteRelay;

/// Extract `user:pass` from an `Authorization: Basic ...` header value.
fn decode_basic(value: &str) -> Option<String> {
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    credentials.contains(':').then_some(credentials)
}

/// Reject requests whose credentials don't match the configured ones.
///
/// A no-op when authentication is not configured.
pub async fn require_basic_auth(
    State(relay): State<Arc<PasteRelay>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = relay.config().auth.credentials() else {
        return next.run(request).await;
    };

    let supplied = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(decode_basic);

    if supplied.as_deref() == Some(expected) {
        return next.run(request).await;
    }

    tracing::warn!(
        method = %request.method(),
        path = %request.uri().path(),
        "Rejected request with bad credentials"
    );
    (StatusCode::UNAUTHORIZED, UNAUTHORIZED_BODY).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_for(credentials: &str) -> String {
        format!("Basic {}", STANDARD.encode(credentials))
    }

    #[test]
    fn decodes_basic_header() {
        assert_eq!(
            decode_basic(&header_for("testUser:testPass")).as_deref(),
            Some("testUser:testPass")
        );
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let value = header_for("a:b").replacen("Basic", "bAsIc", 1);
        assert_eq!(decode_basic(&value).as_deref(), Some("a:b"));
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(decode_basic("Bearer abc").is_none());
        assert!(decode_basic("Basic !!!").is_none());
        assert!(decode_basic(&header_for("no-colon")).is_none());
        assert!(decode_basic("Basic").is_none());
    }
}
