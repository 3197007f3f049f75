//! Handler interface for upgraded WebSocket sessions.

use std::sync::Arc;

use axum::extract::ws::WebSocket;
use futures_util::future::BoxFuture;

/// A WebSocket endpoint.
///
/// Implementations own nothing mutable across sessions; each call to
/// `handle` gets exclusive ownership of one client connection.
pub trait SocketHandler: Send + Sync + 'static {
    /// Short name used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Serve one session until it ends.
    ///
    /// Errors never escape: the future resolves to an outcome label once the
    /// session is over and the socket has been dropped.
    fn handle(self: Arc<Self>, socket: WebSocket) -> BoxFuture<'static, &'static str>;
}
