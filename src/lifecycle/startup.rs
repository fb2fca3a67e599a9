//! Startup reporting.
//!
//! # Responsibilities
//! - Surface override warnings before traffic starts
//! - Log the effective configuration and how to point a client at the proxy

use crate::config::validation::validate_overrides;
use crate::config::ProxyConfig;

/// Environment variable the CLI client reads for its API base URL.
pub const CLIENT_BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";

/// Shell hint for routing the client through this proxy.
pub fn client_hint(config: &ProxyConfig) -> String {
    format!(
        "{}=http://{} claude",
        CLIENT_BASE_URL_VAR,
        config.listener.display_address()
    )
}

/// Log validation findings and the startup banner.
pub fn report(config: &ProxyConfig) {
    for warning in validate_overrides(&config.sampling) {
        tracing::warn!(%warning, "Suspicious sampling override");
    }

    let overrides = serde_json::to_string(&config.sampling).unwrap_or_default();
    if config.sampling.is_empty() {
        tracing::info!("No sampling overrides set, requests pass through unchanged");
    } else {
        tracing::info!(overrides = %overrides, "Sampling config");
    }

    tracing::info!(
        listen = %config.listener.display_address(),
        upstream = %config.upstream.base_url,
        "Starting proxy"
    );
    tracing::info!(hint = %client_hint(config), "To use with Claude Code, run");
}
