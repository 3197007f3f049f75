//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Chunk sizes below this were observed to produce audible gaps in playback.
pub const SMOOTH_PLAYBACK_CHUNK_SIZE: usize = 30_000;

/// Root configuration for the audio relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Upstream stream source and read behaviour.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9000").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9000".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Upstream audio source.
///
/// `chunk_size` is a playback tuning knob, not a protocol requirement. Small
/// chunks leave the client under-buffered and playback turns choppy; large
/// chunks add latency and a per-write memory spike.
///
/// Messages are always exactly `chunk_size` bytes (except the tail), so up to
/// `chunk_size` bytes are held per session before anything is sent. On a live
/// source this delays the first message by `chunk_size / bitrate`: about one
/// second for the default 16000 against a 128 kbit/s stream.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Stream URL fetched for every `/audio` session.
    pub url: String,

    /// Bytes per binary message sent to the client.
    pub chunk_size: usize,

    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Time allowed for the response head to arrive, in seconds.
    pub response_timeout_secs: u64,

    /// Time allowed between two body reads, in seconds.
    pub read_timeout_secs: u64,

    /// Honour HTTP(S)_PROXY from the environment for upstream requests.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "https://radio.talksport.com/stream?gdpr=0&partnerId=RadioTime".to_string(),
            chunk_size: 16_000,
            connect_timeout_secs: 10,
            response_timeout_secs: 10,
            read_timeout_secs: 30,
            system_proxy: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
