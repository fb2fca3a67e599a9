//! Sampling Proxy (v1)
//!
//! Sits between a command-line AI client and the inference API, pinning
//! sampling parameters on `/messages` requests.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                  SAMPLING PROXY                  │
//!                     │                                                  │
//!   Client Request    │  ┌─────────┐    ┌──────────┐    ┌────────────┐  │
//!   ──────────────────┼─▶│  http   │───▶│ routing  │───▶│  rewrite   │  │
//!                     │  │ server  │    │ /messages│    │ overrides  │  │
//!                     │  └─────────┘    └──────────┘    └─────┬──────┘  │
//!                     │                                       │         │
//!                     │                                       ▼         │
//!   Client Response   │  ┌─────────┐                   ┌────────────┐  │
//!   ◀─────────────────┼──│response │◀──────────────────│  forward   │◀─┼──── Upstream
//!                     │  │ relay   │   streamed body   │  (reqwest) │  │     API
//!                     │  └─────────┘                   └────────────┘  │
//!                     │                                                  │
//!                     │  config (CLI + file, immutable) · lifecycle ·    │
//!                     │  observability                                   │
//!                     └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;

use sampling_proxy::cli::Cli;
use sampling_proxy::lifecycle::{signals, startup, Shutdown};
use sampling_proxy::observability::logging;
use sampling_proxy::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logging first so config-file warnings are visible
    logging::init(&cli.observability())?;

    tracing::info!("sampling-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let config = cli.into_config();
    startup::report(&config);

    let server = HttpServer::new(config)?;
    let listener = HttpServer::bind(&server.config().listener).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(&shutdown);

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
