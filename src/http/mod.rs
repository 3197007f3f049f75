//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, TraceLayer)
//!     → route table: /audio, /echo (WebSocket upgrade), /health
//!     → relay handlers own the upgraded socket
//! ```

pub mod server;

pub use server::{HttpServer, ServerError};
