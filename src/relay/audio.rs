//! Audio relay handler (`/audio`).
//!
//! # Data Flow
//! ```text
//! upstream HTTP body ──frames──→ ChunkBuffer ──N-byte chunks──→ client (binary messages)
//! ```
//!
//! # Design Decisions
//! - One upstream GET per session; the response is dropped on every exit path
//! - The client's receive side is watched while waiting on upstream, so a
//!   disconnect stops the loop before another upstream read is issued
//! - Non-200, timeouts, and read errors end the session; nothing is retried

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::{Client, Response, StatusCode};
use url::Url;

use crate::config::schema::{UpstreamConfig, SMOOTH_PLAYBACK_CHUNK_SIZE};
use crate::observability::metrics;
use crate::relay::chunker::ChunkBuffer;
use crate::relay::error::RelayError;
use crate::relay::socket;
use crate::resilience::timeouts::{with_deadline, UpstreamTimeouts};
use crate::routing::SocketHandler;

const ROUTE: &str = "audio";

/// Bytes and messages delivered during one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub chunks: u64,
    pub bytes: u64,
}

/// How a relay session that did not fail came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Upstream body ended; everything was forwarded.
    Exhausted(RelayStats),
    /// Client closed or dropped the connection.
    ClientGone(RelayStats),
}

/// Relays a fixed upstream stream to each connecting client.
#[derive(Debug)]
pub struct AudioRelay {
    client: Client,
    source: Url,
    chunk_size: usize,
    timeouts: UpstreamTimeouts,
}

impl AudioRelay {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, RelayError> {
        let source = Url::parse(&config.url)?;
        let timeouts = UpstreamTimeouts::from_config(config);

        let mut builder = Client::builder()
            .connect_timeout(timeouts.connect)
            .pool_max_idle_per_host(0);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(RelayError::Client)?;

        if config.chunk_size < SMOOTH_PLAYBACK_CHUNK_SIZE {
            tracing::warn!(
                chunk_size = config.chunk_size,
                recommended_min = SMOOTH_PLAYBACK_CHUNK_SIZE,
                "Small chunk size may cause choppy playback"
            );
        }

        Ok(Self {
            client,
            source,
            chunk_size: config.chunk_size,
            timeouts,
        })
    }

    pub fn source(&self) -> &Url {
        &self.source
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Run one relay session over `socket`.
    pub async fn relay(&self, socket: &mut WebSocket) -> Result<RelayOutcome, RelayError> {
        let mut response = self.open_upstream().await?;
        tracing::debug!(source = %self.source, "Upstream connected, streaming");

        let mut buffer = ChunkBuffer::new(self.chunk_size);
        let mut stats = RelayStats::default();

        loop {
            let frame = tokio::select! {
                biased;
                () = socket::closed(socket) => return Ok(RelayOutcome::ClientGone(stats)),
                frame = self.read_frame(&mut response) => frame?,
            };

            let Some(frame) = frame else {
                if let Some(tail) = buffer.finish() {
                    if !send_chunk(socket, tail, &mut stats).await? {
                        return Ok(RelayOutcome::ClientGone(stats));
                    }
                }
                return Ok(RelayOutcome::Exhausted(stats));
            };

            buffer.push(&frame);
            while let Some(chunk) = buffer.next_chunk() {
                if !send_chunk(socket, chunk, &mut stats).await? {
                    return Ok(RelayOutcome::ClientGone(stats));
                }
            }
        }
    }

    async fn open_upstream(&self) -> Result<Response, RelayError> {
        let response = with_deadline(
            self.timeouts.response,
            async {
                self.client
                    .get(self.source.clone())
                    .send()
                    .await
                    .map_err(RelayError::Connect)
            },
            RelayError::ResponseTimeout,
        )
        .await?;

        if response.status() != StatusCode::OK {
            return Err(RelayError::Status(response.status()));
        }
        Ok(response)
    }

    async fn read_frame(&self, response: &mut Response) -> Result<Option<Bytes>, RelayError> {
        with_deadline(
            self.timeouts.read,
            async move { response.chunk().await.map_err(RelayError::Read) },
            RelayError::ReadTimeout,
        )
        .await
    }
}

/// Send one chunk; `Ok(false)` means the client is gone.
async fn send_chunk(
    socket: &mut WebSocket,
    chunk: Bytes,
    stats: &mut RelayStats,
) -> Result<bool, RelayError> {
    let len = chunk.len();
    match socket.send(Message::Binary(chunk)).await {
        Ok(()) => {
            stats.chunks += 1;
            stats.bytes += len as u64;
            metrics::record_chunk(ROUTE, len);
            Ok(true)
        }
        Err(e) if socket::is_disconnect(&e) => Ok(false),
        Err(e) => Err(RelayError::Send(e)),
    }
}

impl SocketHandler for AudioRelay {
    fn name(&self) -> &'static str {
        ROUTE
    }

    fn handle(self: Arc<Self>, mut socket: WebSocket) -> BoxFuture<'static, &'static str> {
        async move {
            match self.relay(&mut socket).await {
                Ok(RelayOutcome::Exhausted(stats)) => {
                    tracing::info!(chunks = stats.chunks, bytes = stats.bytes, "Upstream exhausted");
                    socket::close(socket).await;
                    "exhausted"
                }
                Ok(RelayOutcome::ClientGone(stats)) => {
                    tracing::info!(chunks = stats.chunks, bytes = stats.bytes, "Client disconnected");
                    socket::finish_close(&mut socket).await;
                    "client_closed"
                }
                Err(e) => {
                    tracing::error!(error = %e, source = %self.source, "Relay session failed");
                    socket::close(socket).await;
                    e.outcome()
                }
            }
        }
        .boxed()
    }
}
