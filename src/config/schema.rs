//! Configuration schema definitions.
//!
//! `ProxyConfig` is assembled once at startup (CLI + optional config file) and
//! never mutated afterwards. Handlers only ever see shared, read-only views.

use serde::Serialize;
use serde_json::{Number, Value};

/// Default upstream inference API.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.anthropic.com";

/// Root configuration for the proxy.
#[derive(Debug, Clone, Default)]
pub struct ProxyConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// The single upstream every request is forwarded to.
    pub upstream: UpstreamConfig,

    /// Sampling parameters forced onto outbound `/messages` bodies.
    pub sampling: SamplingOverrides,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Host or IP to bind to.
    pub host: String,

    /// TCP port to bind to.
    pub port: u16,
}

impl ListenerConfig {
    /// Address in `host:port` form, bracketing bare IPv6 hosts.
    pub fn display_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Upstream configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL; the inbound path and query are appended verbatim.
    pub base_url: String,

    /// Honor `HTTPS_PROXY`/`HTTP_PROXY`/`NO_PROXY` for the outbound hop.
    pub use_env_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            use_env_proxy: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Sampling parameter overrides.
///
/// `None` means "pass the caller's value through", `Some(v)` means "force `v`".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SamplingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

impl SamplingOverrides {
    /// Merge per field: `preferred` wins wherever it is set, otherwise `fallback`.
    ///
    /// Used as `SamplingOverrides::merged(cli, file)`.
    pub fn merged(preferred: Self, fallback: Self) -> Self {
        Self {
            temperature: preferred.temperature.or(fallback.temperature),
            top_p: preferred.top_p.or(fallback.top_p),
            top_k: preferred.top_k.or(fallback.top_k),
        }
    }

    /// True when no parameter is overridden.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.top_p.is_none() && self.top_k.is_none()
    }

    /// Set overrides as JSON values, in request-body key order.
    ///
    /// Non-finite floats have no JSON representation and are skipped.
    pub fn json_values(&self) -> Vec<(&'static str, Value)> {
        let mut values = Vec::with_capacity(3);
        if let Some(v) = self.temperature.and_then(Number::from_f64) {
            values.push(("temperature", Value::Number(v)));
        }
        if let Some(v) = self.top_p.and_then(Number::from_f64) {
            values.push(("top_p", Value::Number(v)));
        }
        if let Some(v) = self.top_k {
            values.push(("top_k", Value::from(v)));
        }
        values
    }
}

impl std::fmt::Display for SamplingOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn field<T: std::fmt::Display>(v: Option<T>) -> String {
            v.map(|v| v.to_string()).unwrap_or_else(|| "unset".to_string())
        }
        write!(
            f,
            "temperature={} top_p={} top_k={}",
            field(self.temperature),
            field(self.top_p),
            field(self.top_k)
        )
    }
}
