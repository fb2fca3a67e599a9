//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! CLI flags ─────────────────────────────┐
//!                                        ▼
//! config file (JSON) → loader.rs → merge (CLI wins per field)
//!                                        │
//!                                        ▼
//!                          validation.rs (warnings only)
//!                                        │
//!                                        ▼
//!                    ProxyConfig (immutable, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Config is written exactly once, before the listener is bound
//! - A broken or missing config file never aborts startup
//! - All fields have defaults to allow running with no flags at all

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::ProxyConfig;
pub use schema::SamplingOverrides;
pub use schema::UpstreamConfig;
