//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and server produce:
//!     → logging.rs (structured log events, per-session spans)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Session ID and route flow through every log event of a session
//! - Metrics are cheap (atomic increments) and off unless enabled

pub mod logging;
pub mod metrics;
