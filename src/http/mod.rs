//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, one task per connection)
//!     → proxy.rs (read body, rewrite, forward)
//!     → request.rs (path + headers for the upstream)
//!     → forward.rs (reqwest client, single upstream)
//!     → response.rs (relay status/headers, stream body)
//!     → Send to client
//! ```

pub mod forward;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use forward::{ForwardingError, UpstreamClient, UpstreamResponse};
pub use response::ProxyError;
pub use server::{AppState, HttpServer};
