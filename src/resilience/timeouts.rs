//! Timeout enforcement.
//!
//! # Responsibilities
//! - Derive connect/response/read deadlines from upstream config
//! - Wrap upstream calls with a deadline
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - A timed-out relay session ends; there is no retry

use std::future::Future;
use std::time::Duration;

use crate::config::UpstreamConfig;

/// Deadlines applied to one upstream fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    /// TCP connect deadline (enforced by the HTTP client).
    pub connect: Duration,
    /// Deadline for the response head.
    pub response: Duration,
    /// Deadline for each body read.
    pub read: Duration,
}

impl UpstreamTimeouts {
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            connect: Duration::from_secs(config.connect_timeout_secs),
            response: Duration::from_secs(config.response_timeout_secs),
            read: Duration::from_secs(config.read_timeout_secs),
        }
    }
}

/// Run `fut` with a deadline, mapping expiry to `on_timeout(deadline)`.
pub async fn with_deadline<F, T, E>(
    deadline: Duration,
    fut: F,
    on_timeout: impl FnOnce(Duration) -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout(deadline)),
    }
}
