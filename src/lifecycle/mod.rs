//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → server stops accepting → in-flight requests finish → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → main calls Shutdown::trigger()
//! ```
//!
//! # Design Decisions
//! - The server only knows about the broadcast, never about OS signals,
//!   so tests can stop it the same way main does
//! - Shutdown has a deadline: TLS connections are forced closed after it

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
