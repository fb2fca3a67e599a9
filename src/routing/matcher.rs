//! Target endpoint matching.
//!
//! # Design Decisions
//! - Plain substring match, no regex
//! - The query string is part of the matched text
//! - Case-sensitive

use axum::http::Uri;

/// Fragment that marks a request body as eligible for rewriting.
pub const MESSAGES_FRAGMENT: &str = "/messages";

/// Returns true if the request's path and query contain [`MESSAGES_FRAGMENT`].
pub fn is_target(uri: &Uri) -> bool {
    uri.path_and_query()
        .is_some_and(|pq| pq.as_str().contains(MESSAGES_FRAGMENT))
}
