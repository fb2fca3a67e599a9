//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Keep logged request values bounded in size
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level when set
//! - Request bodies can carry entire conversations, so values are truncated

use std::borrow::Cow;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Longest value printed in full in request logs.
pub const MAX_LOG_LENGTH: usize = 200;

/// Build the filter: `RUST_LOG` if set, else the configured level for this crate.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "sampling_proxy={level},tower_http={level}",
            level = config.log_level
        )
        .into()
    })
}

/// Install the global subscriber. Returns an error if one is already set.
pub fn init(config: &ObservabilityConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// Truncate a value for logging, noting the original length.
pub fn truncate_for_log(value: &str) -> Cow<'_, str> {
    let chars = value.chars().count();
    if chars <= MAX_LOG_LENGTH {
        return Cow::Borrowed(value);
    }
    let head: String = value.chars().take(MAX_LOG_LENGTH).collect();
    Cow::Owned(format!("{}... ({} chars)", head, chars))
}
