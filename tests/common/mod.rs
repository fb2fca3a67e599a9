//! Shared utilities for integration testing.

// Each test binary uses a different subset.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use sampling_proxy::config::{ListenerConfig, ProxyConfig, SamplingOverrides};
use sampling_proxy::{HttpServer, Shutdown};

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A running mock upstream.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("upstream saw no requests")
    }
}

/// Start a programmable mock upstream on an ephemeral port.
///
/// Every request is recorded, then `f` produces the response.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockUpstream
where
    F: Fn(Recorded) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let recorded = requests.clone();
    let app = Router::new().fallback(move |request: Request<Body>| {
        let f = f.clone();
        let recorded = recorded.clone();
        async move {
            let (parts, body) = request.into_parts();
            let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
            let request = Recorded {
                method: parts.method,
                path_and_query: parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_default(),
                headers: parts.headers,
                body,
            };
            recorded.lock().unwrap().push(request.clone());
            f(request).await
        }
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, requests }
}

/// Start a mock upstream that always answers 200 with a fixed body.
pub async fn start_mock_backend(response: &'static str) -> MockUpstream {
    start_programmable_backend(move |_| async move { Response::new(Body::from(response)) }).await
}

/// A running proxy under test.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the proxy on an ephemeral port in front of `upstream_base`.
pub async fn start_proxy(upstream_base: &str, sampling: SamplingOverrides) -> TestProxy {
    let mut config = ProxyConfig::default();
    config.listener = ListenerConfig {
        host: "127.0.0.1".into(),
        port: 0,
    };
    config.upstream.base_url = upstream_base.to_string();
    config.upstream.use_env_proxy = false;
    config.sampling = sampling;

    let server = HttpServer::new(config).unwrap();
    let listener = HttpServer::bind(&server.config().listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestProxy {
        addr,
        shutdown,
        handle,
    }
}

/// An address with nothing listening on it.
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Client that never goes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}
