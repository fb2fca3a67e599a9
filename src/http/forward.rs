//! Upstream request forwarding.
//!
//! # Responsibilities
//! - Own the shared outbound HTTP client
//! - Build the upstream URL from the fixed base and the inbound path
//! - Hand back the upstream response without reading its body
//!
//! # Design Decisions
//! - Non-2xx upstream statuses are successful forwards, not errors
//! - Transport failures are never retried
//! - Redirects are relayed to the caller rather than followed
//! - Standard certificate validation, no custom trust configuration

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use futures_util::Stream;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;

/// Errors raised before or while talking to the upstream.
#[derive(Debug, Error)]
pub enum ForwardingError {
    /// The configured upstream base URL is unusable.
    #[error("invalid upstream URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// DNS, connect, TLS or I/O failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Response from the upstream. The body is read lazily, exactly once.
#[derive(Debug)]
pub struct UpstreamResponse {
    inner: reqwest::Response,
}

impl UpstreamResponse {
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Consume the response into its body stream, chunk by chunk as received.
    pub fn into_body_stream(self) -> impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static {
        self.inner.bytes_stream()
    }
}

/// Client bound to the single upstream.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Validate the base URL and build the shared client.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ForwardingError> {
        let base_url = normalize_base_url(&config.base_url)?;
        let mut builder = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
        if !config.use_env_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full upstream URL for an inbound path and query.
    pub fn target_url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }

    /// Send one request upstream.
    ///
    /// An empty `body` is sent as no body at all.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<UpstreamResponse, ForwardingError> {
        let url = self.target_url(path_and_query);
        tracing::debug!(url = %url, body_bytes = body.len(), "Forwarding to upstream");

        let mut request = self.client.request(method, &url).headers(headers);
        if !body.is_empty() {
            request = request.body(body);
        }

        let inner = request.send().await?;
        Ok(UpstreamResponse { inner })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ForwardingError> {
    let invalid = |reason: String| ForwardingError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> Result<UpstreamClient, ForwardingError> {
        UpstreamClient::new(&UpstreamConfig {
            base_url: base.to_string(),
            use_env_proxy: false,
        })
    }

    #[test]
    fn appends_path_verbatim() {
        let upstream = client("https://api.anthropic.com").unwrap();
        assert_eq!(
            upstream.target_url("/v1/messages?beta=true"),
            "https://api.anthropic.com/v1/messages?beta=true"
        );
        assert_eq!(upstream.target_url("//double"), "https://api.anthropic.com//double");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let upstream = client("http://127.0.0.1:9000/").unwrap();
        assert_eq!(upstream.base_url(), "http://127.0.0.1:9000");
        assert_eq!(upstream.target_url("/v1/models"), "http://127.0.0.1:9000/v1/models");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let upstream = client("https://gateway.example.com/anthropic").unwrap();
        assert_eq!(
            upstream.target_url("/v1/messages"),
            "https://gateway.example.com/anthropic/v1/messages"
        );
    }

    #[test]
    fn rejects_bad_base_urls() {
        assert!(matches!(client("not a url"), Err(ForwardingError::InvalidUrl { .. })));
        assert!(matches!(client("ftp://example.com"), Err(ForwardingError::InvalidUrl { .. })));
        assert!(matches!(client("https://example.com/?a=b"), Err(ForwardingError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let upstream = client(&format!("http://{}", addr)).unwrap();
        let result = upstream
            .forward(Method::GET, "/v1/models", HeaderMap::new(), Bytes::new())
            .await;
        assert!(matches!(result, Err(ForwardingError::Transport(_))));
    }
}
