//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     handlers built from RelayConfig
//!     → router.rs (RouteTable: path → SocketHandler)
//!     → into_router() freezes the table as an axum Router
//!
//! Per upgrade request:
//!     exact path match → WebSocket upgrade → handler.handle(socket)
//! ```
//!
//! # Design Decisions
//! - Routes registered once at startup, immutable at runtime
//! - Exact path matching only
//! - Each session runs inside its own tracing span (route + session id)

pub mod handler;
pub mod router;

pub use handler::SocketHandler;
pub use router::{RouteError, RouteTable};
