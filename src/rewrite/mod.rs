//! Request body rewriting subsystem.
//!
//! # Data Flow
//! ```text
//! inbound body bytes (target endpoint only)
//!     → parse as JSON object (failure = forward as-is)
//!     → apply each set override, recording real changes
//!     → re-encode only if something changed
//!     → RewriteResult { body, changes }
//! ```
//!
//! # Design Decisions
//! - Pure function of (body, overrides, is_target); no I/O
//! - Overrides are always written, but only differing values are reported
//! - Key order of the caller's object is preserved on re-encode

pub mod body;

pub use body::{rewrite_body, ParamChange, RewriteResult};
