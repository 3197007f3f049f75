//! Echo handler (`/echo`).

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::observability::metrics;
use crate::relay::socket;
use crate::routing::SocketHandler;

const ROUTE: &str = "echo";

/// Sends every binary frame back to its sender, byte for byte.
#[derive(Debug, Default, Clone, Copy)]
pub struct Echo;

impl Echo {
    /// Echo frames until the client leaves or the transport fails.
    ///
    /// Returns the number of frames echoed and the outcome label.
    pub async fn echo(&self, socket: &mut WebSocket) -> (u64, &'static str) {
        let mut frames = 0u64;

        loop {
            let message = match socket.recv().await {
                Some(Ok(message)) => message,
                None => return (frames, "client_closed"),
                Some(Err(e)) if socket::is_disconnect(&e) => return (frames, "client_closed"),
                Some(Err(e)) => {
                    tracing::warn!(error = %e, frames, "Echo read failed");
                    return (frames, "read_error");
                }
            };

            match message {
                Message::Binary(data) => {
                    let len = data.len();
                    if let Err(e) = socket.send(Message::Binary(data)).await {
                        if socket::is_disconnect(&e) {
                            return (frames, "client_closed");
                        }
                        tracing::warn!(error = %e, frames, "Echo write failed");
                        return (frames, "send_error");
                    }
                    frames += 1;
                    metrics::record_chunk(ROUTE, len);
                }
                Message::Close(_) => {
                    socket::finish_close(socket).await;
                    return (frames, "client_closed");
                }
                Message::Text(text) => {
                    tracing::debug!(len = text.as_str().len(), "Ignoring text frame");
                }
                // Pong replies are queued by the transport itself.
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    }
}

impl SocketHandler for Echo {
    fn name(&self) -> &'static str {
        ROUTE
    }

    fn handle(self: Arc<Self>, mut socket: WebSocket) -> BoxFuture<'static, &'static str> {
        async move {
            let (frames, outcome) = self.echo(&mut socket).await;
            tracing::debug!(frames, "Echo loop finished");
            outcome
        }
        .boxed()
    }
}
