//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream fetch:
//!     → timeouts.rs (connect / response head / per-read deadlines)
//!     → On expiry: session ends, logged
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - No retries: a failed relay session simply closes the client

pub mod timeouts;
