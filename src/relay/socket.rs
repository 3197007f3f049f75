//! Client socket helpers shared by the handlers.

use std::error::Error as StdError;
use std::io::{self, ErrorKind};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};

/// Upper bound on waiting for the transport to flush a close reply.
const CLOSE_FLUSH: Duration = Duration::from_secs(5);

/// Transport messages that mean the peer is gone rather than misbehaving.
///
/// axum hides the transport error type behind `axum::Error`, so these are
/// matched on their rendered text instead of by type.
const DISCONNECT_MESSAGES: &[&str] = &[
    "Connection closed normally",
    "Trying to work with closed connection",
    "Connection reset without closing handshake",
];

/// Whether a transport error means the client went away.
///
/// Covers both a completed close handshake and an abrupt TCP drop.
pub fn is_disconnect(error: &axum::Error) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);

    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<io::Error>() {
            return matches!(
                io.kind(),
                ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
                    | ErrorKind::UnexpectedEof
            );
        }
        let text = err.to_string();
        if DISCONNECT_MESSAGES.iter().any(|m| text.contains(m)) {
            return true;
        }
        current = err.source();
    }

    false
}

/// Resolve once the client has closed or dropped the connection.
///
/// Data frames are discarded unread. Cancel-safe: dropping the future
/// between polls loses no close notification.
pub async fn closed(socket: &mut WebSocket) {
    loop {
        match socket.recv().await {
            None | Some(Ok(Message::Close(_))) => return,
            Some(Err(e)) => {
                if !is_disconnect(&e) {
                    tracing::warn!(error = %e, "Client read failed");
                }
                return;
            }
            Some(Ok(_)) => continue,
        }
    }
}

/// Complete a close handshake the client started.
///
/// The close reply is queued when the client's Close frame is read but only
/// written on the next read, so drive the socket once more. Harmless when
/// the connection is already gone.
pub async fn finish_close(socket: &mut WebSocket) {
    if tokio::time::timeout(CLOSE_FLUSH, socket.recv()).await.is_err() {
        tracing::debug!("Close reply not flushed in time");
    }
}

/// Send a close frame and drop the connection.
pub async fn close(mut socket: WebSocket) {
    if let Err(e) = socket.send(Message::Close(None)).await {
        tracing::debug!(error = %e, "Close frame not delivered");
    }
}
