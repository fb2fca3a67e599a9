//! Routing subsystem.
//!
//! There is exactly one upstream, so routing only decides whether a request
//! is a target endpoint (body eligible for rewriting) or a pass-through.
//!
//! ```text
//! Incoming Request (path and query)
//!     → matcher.rs ("/messages" substring)
//!     → target: rewrite body, then forward
//!     → otherwise: forward byte-identical
//! ```

pub mod matcher;

pub use matcher::{is_target, MESSAGES_FRAGMENT};
