//! WebSocket audio relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────┐
//!                    │                  AUDIO RELAY                  │
//!                    │                                               │
//!   WS client  ──────┼─▶ http server ──▶ route table ──┬─▶ /audio ───┼──▶ upstream
//!   (upgrade)        │   (axum, TLS)     (path → fn)   │   relay     │    HTTP stream
//!                    │                                 └─▶ /echo     │
//!                    │                                               │
//!                    │  config · logging/metrics · timeouts · signals │
//!                    └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use audio_relay::config::load_or_default;
use audio_relay::http::HttpServer;
use audio_relay::lifecycle::{signals, Shutdown};
use audio_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "audio-relay")]
#[command(about = "Relays an HTTP audio stream to WebSocket clients", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("audio-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        chunk_size = config.upstream.chunk_size,
        tls = config.listener.tls.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
