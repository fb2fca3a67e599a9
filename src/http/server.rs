//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with proxy and preflight handlers
//! - Wire up middleware (tracing)
//! - Bind the listener
//! - Serve until the shutdown signal, then drain in-flight requests

use std::sync::Arc;

use axum::{
    routing::{get, MethodRouter},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{ListenerConfig, ProxyConfig, SamplingOverrides};
use crate::http::forward::{ForwardingError, UpstreamClient};
use crate::http::proxy::{preflight_handler, proxy_handler};
use crate::lifecycle::{shutdown, ShutdownReason};

/// Application state injected into handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub sampling: SamplingOverrides,
}

impl AppState {
    /// Build the shared state from configuration.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ForwardingError> {
        Ok(Self {
            upstream: Arc::new(UpstreamClient::new(&config.upstream)?),
            sampling: config.sampling,
        })
    }
}

/// HTTP server for the sampling proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails only if the upstream base URL is unusable.
    pub fn new(config: ProxyConfig) -> Result<Self, ForwardingError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let methods = || -> MethodRouter<AppState> {
            get(proxy_handler).post(proxy_handler).options(preflight_handler)
        };

        Router::new()
            .route("/{*path}", methods())
            .route("/", methods())
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured listener. Failure here is the one fatal startup error.
    pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, std::io::Error> {
        let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
        tracing::info!(address = %listener.local_addr()?, "Listener bound");
        Ok(listener)
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns once `stop` fires and every in-flight request has finished.
    pub async fn run(
        self,
        listener: TcpListener,
        mut stop: broadcast::Receiver<ShutdownReason>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let reason = shutdown::wait_for(&mut stop).await;
                tracing::info!(%reason, "Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    fn unreachable_upstream_config() -> ProxyConfig {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = ProxyConfig::default();
        config.upstream.base_url = format!("http://{}", addr);
        config.upstream.use_env_proxy = false;
        config
    }

    #[tokio::test]
    async fn preflight_is_answered_locally() {
        let server = HttpServer::new(unreachable_upstream_config()).unwrap();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/v1/messages")
            .body(Body::empty())
            .unwrap();

        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn unreachable_upstream_yields_502_json() {
        let server = HttpServer::new(unreachable_upstream_config()).unwrap();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/messages")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"model":"x"}"#))
            .unwrap();

        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(value["error"].is_string());
    }

    #[tokio::test]
    async fn broken_request_body_yields_502_json() {
        let server = HttpServer::new(unreachable_upstream_config()).unwrap();
        let chunks = futures_util::stream::iter(vec![
            Ok(axum::body::Bytes::from_static(b"{\"model\":")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ]);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/messages")
            .body(Body::from_stream(chunks))
            .unwrap();

        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(value["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("failed to read request body")));
    }

    #[tokio::test]
    async fn unsupported_methods_are_rejected() {
        let server = HttpServer::new(unreachable_upstream_config()).unwrap();
        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/v1/messages")
            .body(Body::empty())
            .unwrap();

        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn invalid_upstream_is_rejected_at_construction() {
        let mut config = ProxyConfig::default();
        config.upstream.base_url = "not a url".into();
        assert!(HttpServer::new(config).is_err());
    }
}
