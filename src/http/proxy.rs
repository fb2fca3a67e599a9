//! Per-request proxy handler.
//!
//! # Request Lifecycle
//! ```text
//! Receiving → Rewriting → Forwarding → Streaming → Done
//!                             │            │
//!                             └────────────┴──▶ ErrorResponding
//! ```
//!
//! Transport failures become a synthesized 502. Upstream error statuses are
//! relayed verbatim through the normal streaming path. Preflight `OPTIONS`
//! requests are answered by [`preflight_handler`] and never reach this flow.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::Request,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::http::request::{forwardable_headers, path_and_query};
use crate::http::response::{self, ProxyError};
use crate::http::server::AppState;
use crate::rewrite::rewrite_body;
use crate::routing;

/// Main proxy handler for `GET` and `POST`.
pub async fn proxy_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, ProxyError> {
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!(
        "proxy",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    proxy_request(state, request, request_id).instrument(span).await
}

/// Preflight handler for `OPTIONS`.
pub async fn preflight_handler() -> Response {
    tracing::debug!("Answering CORS preflight locally");
    response::preflight()
}

async fn proxy_request(
    state: AppState,
    request: Request<Body>,
    request_id: String,
) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();

    // Receiving: hyper enforces Content-Length framing on the inbound body.
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Failed to read request body");
            ProxyError::RequestBody(e)
        })?;

    // Rewriting
    let body = if routing::is_target(&parts.uri) && !body.is_empty() {
        apply_overrides(&state, body)
    } else {
        body
    };

    // Forwarding
    let upstream = state
        .upstream
        .forward(
            parts.method,
            path_and_query(&parts.uri),
            forwardable_headers(&parts.headers),
            body,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %response::error_chain(&e), "Upstream request failed");
            ProxyError::from(e)
        })?;

    // Streaming
    let status = upstream.status();
    if status.is_success() {
        tracing::debug!(status = status.as_u16(), "Streaming upstream response");
    } else {
        tracing::warn!(status = status.as_u16(), "Upstream returned an error status, relaying");
    }

    Ok(response::relay(upstream, request_id))
}

fn apply_overrides(state: &AppState, body: Bytes) -> Bytes {
    let result = rewrite_body(body, &state.sampling, true);
    for change in &result.changes {
        tracing::info!(
            param = change.field,
            from = %change.previous.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "absent".to_string()),
            to = %change.applied,
            "Injected sampling parameter"
        );
    }
    result.body
}
