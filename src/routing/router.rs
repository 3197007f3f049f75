//! Path → handler route table.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::response::Response;
use axum::routing::get;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::observability::metrics;
use crate::routing::handler::SocketHandler;

/// Errors raised while registering routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route '{0}' is already registered")]
    Duplicate(String),

    #[error("route '{0}' must start with '/'")]
    InvalidPath(String),
}

/// Explicit mapping from URL path to WebSocket handler.
///
/// Built once at startup and frozen into an axum `Router`.
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<(String, Arc<dyn SocketHandler>)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` at `path`.
    pub fn register(
        &mut self,
        path: impl Into<String>,
        handler: Arc<dyn SocketHandler>,
    ) -> Result<&mut Self, RouteError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(RouteError::InvalidPath(path));
        }
        if self.lookup(&path).is_some() {
            return Err(RouteError::Duplicate(path));
        }

        tracing::debug!(path = %path, handler = handler.name(), "Route registered");
        self.routes.push((path, handler));
        Ok(self)
    }

    /// Find the handler registered at exactly `path`.
    pub fn lookup(&self, path: &str) -> Option<&Arc<dyn SocketHandler>> {
        self.routes
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, handler)| handler)
    }

    /// Registered paths in registration order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Build an axum router with one upgrade route per entry.
    pub fn into_router(self) -> axum::Router {
        self.routes
            .into_iter()
            .fold(axum::Router::new(), |router, (path, handler)| {
                router.route(
                    &path,
                    get(move |ws: WebSocketUpgrade| {
                        let handler = handler.clone();
                        async move { upgrade(ws, handler) }
                    }),
                )
            })
    }
}

/// Complete the upgrade and run the handler inside a per-session span.
fn upgrade(ws: WebSocketUpgrade, handler: Arc<dyn SocketHandler>) -> Response {
    let route = handler.name();

    ws.on_failed_upgrade(move |error| {
        tracing::warn!(route, error = %error, "WebSocket upgrade failed");
    })
    .on_upgrade(move |socket| {
        let session_id = Uuid::new_v4();
        let span = tracing::info_span!("session", route, session_id = %session_id);

        async move {
            tracing::info!("Session opened");
            let _active = metrics::ActiveSession::enter(route);
            let outcome = handler.handle(socket).await;
            metrics::record_session(route, outcome);
            tracing::info!(outcome, "Session closed");
        }
        .instrument(span)
    })
}
