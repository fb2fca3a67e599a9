//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → per-request spans (request id, method, path)
//!
//! Consumers:
//!     → logging.rs (fmt subscriber on stdout)
//! ```
//!
//! # Design Decisions
//! - Request id lives in the span only, never in forwarded headers
//! - Override changes are logged at info, raw request parameters at debug

pub mod logging;
