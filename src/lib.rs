//! WebSocket audio relay and echo server library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod relay;
pub mod resilience;
pub mod routing;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
