//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use audio_relay::config::RelayConfig;
use audio_relay::http::HttpServer;
use audio_relay::lifecycle::Shutdown;
use audio_relay::routing::SocketHandler;
use axum::body::{Body, Bytes};
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::StreamExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

pub type Client =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Deterministic body bytes so reassembled output can be compared.
pub fn body_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Observations made by the mock upstream.
#[derive(Default)]
pub struct UpstreamProbe {
    /// Requests received on any path.
    pub requests: AtomicUsize,
    /// Live streams currently being served.
    pub live_streams: AtomicUsize,
    /// Set once a live stream body has been dropped by the server.
    pub live_dropped: AtomicBool,
}

struct LiveGuard(Arc<UpstreamProbe>);

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.live_streams.fetch_sub(1, Ordering::SeqCst);
        self.0.live_dropped.store(true, Ordering::SeqCst);
    }
}

/// Start a mock upstream server.
///
/// - `/body/{len}`: 200 with `len` deterministic bytes, sent in 1000-byte frames
/// - `/status/{code}`: the given status with a small body
/// - `/live`: 200 with an endless body, 1000 bytes every 10ms
/// - `/stall`: 200, one 1000-byte frame, then nothing
/// - `/broken`: 200, three 1000-byte frames, then the body fails
/// - `/slow_head`: 200 after a 5s delay before the response head
pub async fn start_upstream() -> (SocketAddr, Arc<UpstreamProbe>) {
    let probe = Arc::new(UpstreamProbe::default());
    let app = Router::new()
        .route("/body/{len}", get(fixed_body))
        .route("/status/{code}", get(status))
        .route("/live", get(live))
        .route("/stall", get(stall))
        .route("/broken", get(broken))
        .route("/slow_head", get(slow_head))
        .with_state(probe.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, probe)
}

async fn fixed_body(State(probe): State<Arc<UpstreamProbe>>, Path(len): Path<usize>) -> Body {
    probe.requests.fetch_add(1, Ordering::SeqCst);
    let frames: Vec<Result<Bytes, std::io::Error>> = body_bytes(len)
        .chunks(1000)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();
    Body::from_stream(futures_util::stream::iter(frames))
}

async fn status(State(probe): State<Arc<UpstreamProbe>>, Path(code): Path<u16>) -> impl IntoResponse {
    probe.requests.fetch_add(1, Ordering::SeqCst);
    let code = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (code, "not audio")
}

async fn live(State(probe): State<Arc<UpstreamProbe>>) -> Body {
    probe.requests.fetch_add(1, Ordering::SeqCst);
    probe.live_streams.fetch_add(1, Ordering::SeqCst);
    let guard = LiveGuard(probe);

    let stream = futures_util::stream::unfold(guard, |guard| async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Some((Ok::<_, std::io::Error>(Bytes::from(vec![7u8; 1000])), guard))
    });
    Body::from_stream(stream)
}

async fn stall(State(probe): State<Arc<UpstreamProbe>>) -> Body {
    probe.requests.fetch_add(1, Ordering::SeqCst);
    let first = futures_util::stream::once(async {
        Ok::<_, std::io::Error>(Bytes::from(vec![1u8; 1000]))
    });
    Body::from_stream(first.chain(futures_util::stream::pending()))
}

async fn broken(State(probe): State<Arc<UpstreamProbe>>) -> Body {
    probe.requests.fetch_add(1, Ordering::SeqCst);
    let frames = futures_util::stream::iter(
        (0..3).map(|_| Ok::<_, std::io::Error>(Bytes::from(vec![2u8; 1000]))),
    );
    // Let the good frames reach the wire before the connection is aborted.
    let failure = futures_util::stream::once(async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Err::<Bytes, _>(std::io::Error::other("source died"))
    });
    Body::from_stream(frames.chain(failure))
}

async fn slow_head(State(probe): State<Arc<UpstreamProbe>>) -> Body {
    probe.requests.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(5)).await;
    Body::from(vec![3u8; 1000])
}

/// Serve a single handler at `/` and report each session's outcome label.
pub async fn serve_handler(
    handler: Arc<dyn SocketHandler>,
) -> (SocketAddr, mpsc::UnboundedReceiver<&'static str>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new().route(
        "/",
        get(move |ws: WebSocketUpgrade| {
            let handler = handler.clone();
            let tx = tx.clone();
            async move {
                ws.on_upgrade(move |socket| async move {
                    let _ = tx.send(handler.handle(socket).await);
                })
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, rx)
}

/// Wait for the next session outcome reported by `serve_handler`.
pub async fn next_outcome(outcomes: &mut mpsc::UnboundedReceiver<&'static str>) -> &'static str {
    tokio::time::timeout(Duration::from_secs(10), outcomes.recv())
        .await
        .expect("session did not finish")
        .expect("handler server stopped")
}

/// Read until the server's Close frame, skipping data still in flight.
pub async fn expect_close_reply(client: &mut Client) {
    let wait = async {
        loop {
            match client.next().await {
                Some(Ok(Message::Close(_))) => return,
                Some(Ok(_)) => continue,
                other => panic!("expected a close reply, got {other:?}"),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("no close reply");
}

/// Start the relay with `config` on an ephemeral port.
pub async fn start_relay(mut config: RelayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Relay config pointing at `path` on the mock upstream.
pub fn relay_config(upstream: SocketAddr, path: &str, chunk_size: usize) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.upstream.url = format!("http://{upstream}{path}");
    config.upstream.chunk_size = chunk_size;
    config.upstream.system_proxy = false;
    config
}

pub async fn connect(addr: SocketAddr, path: &str) -> Client {
    let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}{path}"))
        .await
        .expect("WebSocket handshake failed");
    client
}

/// Read binary messages until the server closes the connection.
pub async fn collect_binary(client: &mut Client) -> Vec<Bytes> {
    let mut out = Vec::new();
    let read_all = async {
        while let Some(message) = client.next().await {
            match message {
                Ok(Message::Binary(data)) => out.push(data),
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(10), read_all)
        .await
        .expect("server did not close the stream");
    out
}

/// Poll `check` until it holds or `within` elapses.
pub async fn eventually(within: Duration, check: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + within;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
