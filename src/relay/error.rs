//! Relay session error definitions.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that end a relay session.
///
/// None of these leave the handler; they are logged and the client
/// connection is closed.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The configured source is not a valid URL.
    #[error("invalid upstream url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The relay HTTP client could not be built.
    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    /// Upstream connection or request failed before a response arrived.
    #[error("upstream request failed: {0}")]
    Connect(#[source] reqwest::Error),

    /// Upstream answered with something other than 200.
    #[error("upstream returned status {0}")]
    Status(StatusCode),

    /// Upstream did not produce a response head in time.
    #[error("upstream response timed out after {0:?}")]
    ResponseTimeout(Duration),

    /// Reading the upstream body failed.
    #[error("upstream read failed: {0}")]
    Read(#[source] reqwest::Error),

    /// Upstream body stalled.
    #[error("upstream read timed out after {0:?}")]
    ReadTimeout(Duration),

    /// Writing to the client failed for a reason other than a disconnect.
    #[error("client send failed: {0}")]
    Send(#[source] axum::Error),
}

impl RelayError {
    /// Label used for the `outcome` metric dimension.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayError::InvalidUrl(_) | RelayError::Client(_) => "client_error",
            RelayError::Connect(_) => "connect_error",
            RelayError::Status(_) => "bad_status",
            RelayError::ResponseTimeout(_) => "response_timeout",
            RelayError::Read(_) => "read_error",
            RelayError::ReadTimeout(_) => "read_timeout",
            RelayError::Send(_) => "send_error",
        }
    }
}
