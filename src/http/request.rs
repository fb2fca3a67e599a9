//! Request preparation for forwarding.
//!
//! # Responsibilities
//! - Extract the path and query exactly as the caller sent them
//! - Copy inbound headers for the upstream request
//!
//! # Design Decisions
//! - `Host` is dropped so the client sets the upstream's own authority
//! - `Content-Length` is dropped and recomputed from the outbound body,
//!   which may have been rewritten
//! - Everything else is forwarded untouched, including auth headers

use axum::http::{header, HeaderMap, Uri};

fn is_skipped(name: &header::HeaderName) -> bool {
    *name == header::HOST || *name == header::CONTENT_LENGTH
}

/// Path plus query string, unnormalized.
pub fn path_and_query(uri: &Uri) -> &str {
    uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
}

/// Copy inbound headers for the upstream request, preserving repeated values.
pub fn forwardable_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if is_skipped(name) {
            continue;
        }
        outbound.append(name.clone(), value.clone());
    }
    outbound
}
