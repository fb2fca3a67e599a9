//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay upstream responses (status, headers, streamed body)
//! - Answer CORS preflight requests locally
//! - Map proxy-side failures to JSON error responses
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - `Transfer-Encoding` and `Connection` belong to this hop and are dropped
//! - Upstream error statuses are relayed exactly like successes

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::TryStreamExt;
use thiserror::Error;

use crate::http::forward::{ForwardingError, UpstreamResponse};

/// Failures that stop a request from being forwarded.
///
/// Every variant is answered with the same 502 JSON body; the proxy never
/// synthesizes any other error status.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The inbound body could not be read, so there was nothing to forward.
    #[error("failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),

    /// The upstream could not be reached.
    #[error("{}", error_chain(.0))]
    Forwarding(#[from] ForwardingError),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        json_error(StatusCode::BAD_GATEWAY, &self.to_string())
    }
}

/// Render an error and its sources as one line.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// `{"error": "<message>"}` with the given status.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({ "error": message }).to_string();
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// Local answer to an `OPTIONS` request.
pub fn preflight() -> Response {
    let mut response = Response::new(Body::empty());
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    response
}

/// Upstream headers minus this hop's connection-management headers.
pub fn relay_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if *name == header::TRANSFER_ENCODING || *name == header::CONNECTION {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Turn an upstream response into the caller's response.
///
/// The body is pulled from the upstream one chunk at a time as the caller's
/// connection accepts writes. If the caller goes away the body is dropped,
/// which closes the upstream connection.
pub fn relay(upstream: UpstreamResponse, request_id: String) -> Response {
    let status = upstream.status();
    let headers = relay_headers(upstream.headers());

    let stream = upstream.into_body_stream().inspect_err(move |e| {
        tracing::warn!(request_id = %request_id, error = %e, "Upstream body failed mid-stream");
    });

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
