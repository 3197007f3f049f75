//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define relay metrics (sessions, active sessions, bytes, chunks)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `relay_sessions_total` (counter): finished sessions by route, outcome
//! - `relay_active_sessions` (gauge): sessions currently open by route
//! - `relay_chunks_total` (counter): binary messages sent by route
//! - `relay_bytes_total` (counter): payload bytes sent by route
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Labels are static strings, so no per-session allocation

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count a finished session.
pub fn record_session(route: &'static str, outcome: &'static str) {
    counter!("relay_sessions_total", "route" => route, "outcome" => outcome).increment(1);
}

/// Count one binary message of `len` bytes sent to a client.
pub fn record_chunk(route: &'static str, len: usize) {
    counter!("relay_chunks_total", "route" => route).increment(1);
    counter!("relay_bytes_total", "route" => route).increment(len as u64);
}

/// Keeps `relay_active_sessions` raised for as long as it lives.
#[derive(Debug)]
pub struct ActiveSession {
    route: &'static str,
}

impl ActiveSession {
    pub fn enter(route: &'static str) -> Self {
        gauge!("relay_active_sessions", "route" => route).increment(1.0);
        Self { route }
    }
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        gauge!("relay_active_sessions", "route" => self.route).decrement(1.0);
    }
}
