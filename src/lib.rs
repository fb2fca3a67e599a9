//! Sampling Proxy Library
//!
//! A transparent forwarding proxy between a command-line AI client and its
//! inference API. Requests to `/messages` endpoints get their sampling
//! parameters (`temperature`, `top_p`, `top_k`) pinned to configured values;
//! everything else, including the streamed response, passes through as-is.

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rewrite;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
