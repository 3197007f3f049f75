//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the route table (`/audio`, `/echo`) from configuration
//! - Create the Axum Router with the health endpoint and tracing layer
//! - Serve plain HTTP or TLS on the given listener
//! - Stop gracefully when the shutdown broadcast fires

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::lifecycle::shutdown::wait as wait_for_shutdown;
use crate::net::load_tls_config;
use crate::relay::{AudioRelay, Echo, RelayError};
use crate::routing::{RouteError, RouteTable};

/// Time TLS connections get to finish after shutdown is requested.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Errors raised while building or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("handler setup failed: {0}")]
    Relay(#[from] RelayError),

    #[error("route setup failed: {0}")]
    Route(#[from] RouteError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP/WebSocket server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let routes = Self::route_table(&config)?;
        let router = Self::build_router(routes);
        Ok(Self { router, config })
    }

    /// Register every WebSocket endpoint.
    pub fn route_table(config: &RelayConfig) -> Result<RouteTable, ServerError> {
        let audio = Arc::new(AudioRelay::from_config(&config.upstream)?);

        let mut table = RouteTable::new();
        table
            .register("/audio", audio)?
            .register("/echo", Arc::new(Echo))?;
        Ok(table)
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(routes: RouteTable) -> Router {
        routes
            .into_router()
            .route("/health", get(health))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;

        match self.config.listener.tls.as_ref() {
            None => {
                tracing::info!(address = %addr, "Relay server listening");
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(wait_for_shutdown(shutdown))
                    .await?;
            }
            Some(tls) => {
                let rustls = load_tls_config(tls).await?;
                let handle = axum_server::Handle::new();

                let stopper = handle.clone();
                tokio::spawn(async move {
                    wait_for_shutdown(shutdown).await;
                    stopper.graceful_shutdown(Some(SHUTDOWN_GRACE));
                });

                // axum-server binds its own socket; release ours first.
                drop(listener);
                tracing::info!(address = %addr, "Relay server listening (TLS)");
                axum_server::bind_rustls(addr, rustls)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
        }

        tracing::info!("Relay server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

async fn health() -> &'static str {
    "ok"
}
