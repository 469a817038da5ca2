//! HTTP server setup and the relay handler.
//!
//! # Responsibilities
//! - Create the Axum router (every method, every path → relay handler)
//! - Accept connections and serve each one in its own task
//! - Capture, log and relay each request
//! - Drain in-flight connections on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use hyper_util::client::legacy::connect::Connect;
use hyper_util::service::TowerToHyperService;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::schema::DEFAULT_DRAIN_TIMEOUT_SECS;
use crate::config::TapConfig;
use crate::http::relay::{pump, RelayOutcome};
use crate::http::request::InboundRequest;
use crate::http::response::{client_response, upstream_failure};
use crate::net::connection::{serve_connection, ConnectionTracker};
use crate::net::listener::{Listener, ListenerError};
use crate::observability::emit_capture;
use crate::security::RedactionPolicy;
use crate::upstream::{UpstreamClient, UpstreamError};

/// Per-request state injected into the handler. Immutable and shared.
#[derive(Debug)]
pub struct RelayState<C> {
    pub upstream: UpstreamClient<C>,
    pub redaction: RedactionPolicy,
}

/// HTTP server for the tap proxy.
pub struct HttpServer {
    router: Router,
    upstream_label: String,
    drain_timeout: Duration,
}

impl HttpServer {
    /// Create a server relaying over TLS to the configured upstream.
    pub fn new(config: &TapConfig) -> Result<Self, UpstreamError> {
        let upstream = UpstreamClient::https(config.upstream.clone(), config.timeouts.upstream())?;
        Ok(Self::with_upstream(upstream).with_drain_timeout(config.timeouts.drain()))
    }

    /// Create a server around an already-built upstream client.
    pub fn with_upstream<C>(upstream: UpstreamClient<C>) -> Self
    where
        C: Connect + Clone + Send + Sync + 'static,
    {
        let upstream_label = upstream.target().to_string();
        let state = Arc::new(RelayState {
            upstream,
            redaction: RedactionPolicy::default(),
        });
        Self {
            router: Self::build_router(state),
            upstream_label,
            drain_timeout: Duration::from_secs(DEFAULT_DRAIN_TIMEOUT_SECS),
        }
    }

    /// Bound how long `run` waits for open connections after shutdown.
    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }

    fn build_router<C>(state: Arc<RelayState<C>>) -> Router
    where
        C: Connect + Clone + Send + Sync + 'static,
    {
        Router::new()
            .fallback(relay_handler::<C>)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for driving the handler without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain open connections.
    ///
    /// Connections still open when the drain timeout expires (typically event
    /// streams the upstream keeps alive) are abandoned.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        let addr = listener.local_addr().map_err(ListenerError::Bind)?;
        tracing::info!(
            "Tap proxy listening on http://{} (-> {})",
            addr,
            self.upstream_label
        );

        let tracker = ConnectionTracker::new();

        loop {
            let accepted = tokio::select! {
                _ = shutdown.recv() => break,
                accepted = listener.accept() => accepted,
            };

            let (stream, peer, permit) = match accepted {
                Ok(conn) => conn,
                Err(ListenerError::Accept(e)) => {
                    tracing::warn!(error = %e, "Accept failed");
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let guard = tracker.track();
            let span = tracing::debug_span!("connection", id = %guard.id(), peer = %peer);
            let service = TowerToHyperService::new(self.router.clone());
            let drain = tracker.shutdown_receiver();

            tokio::spawn(
                async move {
                    serve_connection(stream, service, drain).await;
                    drop(permit);
                    drop(guard);
                }
                .instrument(span),
            );
        }

        tracing::info!(open = tracker.active_count(), "Shutdown signal received, draining");
        tracker.begin_drain();
        if tokio::time::timeout(self.drain_timeout, tracker.wait_for_shutdown())
            .await
            .is_err()
        {
            tracing::warn!(
                open = tracker.active_count(),
                timeout_secs = self.drain_timeout.as_secs_f64(),
                "Drain timeout expired, abandoning open connections"
            );
        }
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Relay handler: capture, log, forward, stream back.
async fn relay_handler<C>(
    State(state): State<Arc<RelayState<C>>>,
    request: Request<Body>,
) -> Response
where
    C: Connect + Clone + Send + Sync + 'static,
{
    let relay_id = Uuid::new_v4().to_string();

    let inbound = match InboundRequest::capture(request).await {
        Ok(inbound) => inbound,
        Err(e) => {
            tracing::warn!(relay_id = %relay_id, error = %e, "Failed to read request body");
            return (StatusCode::BAD_REQUEST, "Failed to read request body")
                .into_response();
        }
    };

    emit_capture(&relay_id, &inbound, &state.redaction);

    let method = inbound.method.clone();
    let path = inbound.path.clone();

    let upstream = match state.upstream.send(inbound).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                relay_id = %relay_id,
                method = %method,
                path = %path,
                error = %e,
                "Upstream exchange failed"
            );
            return upstream_failure(&e);
        }
    };

    tracing::info!(
        relay_id = %relay_id,
        method = %method,
        path = %path,
        status = %upstream.status(),
        "Upstream responded"
    );

    let (parts, body) = upstream.into_parts();
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(
        async move {
            match pump(body, tx).await {
                RelayOutcome::Completed { bytes } => {
                    tracing::debug!(bytes, "Relay completed");
                }
                RelayOutcome::ClientGone { bytes } => {
                    tracing::debug!(bytes, "Client disconnected mid-stream");
                }
                RelayOutcome::UpstreamFailed { bytes } => {
                    tracing::warn!(bytes, "Upstream stream broke off");
                }
            }
        }
        .instrument(tracing::debug_span!("relay", id = %relay_id)),
    );

    client_response(&parts, Body::from_stream(ReceiverStream::new(rx)))
}
