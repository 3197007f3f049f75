//! WebSocket session handlers.
//!
//! # Data Flow
//! ```text
//! /audio:  upstream GET → chunker.rs → client, until body ends or client leaves
//! /echo:   client frame → same client, until client leaves
//! ```
//!
//! # Design Decisions
//! - Each session owns its socket (and, for audio, its upstream response)
//! - No state is shared between sessions
//! - Failures end the session and are logged; they never reach the server

pub mod audio;
pub mod chunker;
pub mod echo;
pub mod error;
pub mod socket;

pub use audio::{AudioRelay, RelayOutcome, RelayStats};
pub use echo::Echo;
pub use error::RelayError;
