//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::load_overrides;
use crate::config::schema::DEFAULT_UPSTREAM_URL;
use crate::config::{
    ListenerConfig, ObservabilityConfig, ProxyConfig, SamplingOverrides, UpstreamConfig,
};

#[derive(Debug, Parser)]
#[command(name = "sampling-proxy")]
#[command(about = "Forwarding proxy that pins sampling parameters on /messages requests")]
#[command(after_help = "Examples:
  sampling-proxy -t 0.7
  sampling-proxy -t 0.7 -p 0.95 -k 40
  sampling-proxy --config ~/.claude/sampling.json
  sampling-proxy --config config.json -t 0.5   # CLI overrides file

Then point the client at it:
  ANTHROPIC_BASE_URL=http://127.0.0.1:8080 claude")]
pub struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Path to JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Temperature (0.0-1.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Top-p / nucleus sampling (0.0-1.0)
    #[arg(short = 'p', long)]
    pub top_p: Option<f64>,

    /// Top-k sampling (1-100+)
    #[arg(short = 'k', long)]
    pub top_k: Option<u32>,

    /// Upstream API base URL
    #[arg(long, env = "SAMPLING_PROXY_UPSTREAM", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream: String,

    /// Ignore HTTP(S)_PROXY environment variables for the upstream hop
    #[arg(long)]
    pub no_env_proxy: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Overrides given directly on the command line.
    pub fn overrides(&self) -> SamplingOverrides {
        SamplingOverrides {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
        }
    }

    pub fn observability(&self) -> ObservabilityConfig {
        ObservabilityConfig {
            log_level: self.log_level.clone(),
        }
    }

    /// Resolve the final configuration, reading the config file if one was given.
    pub fn into_config(self) -> ProxyConfig {
        let file = self
            .config
            .as_deref()
            .map(load_overrides)
            .unwrap_or_default();

        ProxyConfig {
            sampling: SamplingOverrides::merged(self.overrides(), file),
            observability: self.observability(),
            listener: ListenerConfig {
                host: self.host,
                port: self.port,
            },
            upstream: UpstreamConfig {
                base_url: self.upstream,
                use_env_proxy: !self.no_env_proxy,
            },
        }
    }
}
