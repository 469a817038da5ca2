//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the upstream client (TLS roots) and the HTTP server
//! - Bind the loopback listener
//! - Run until a stop signal, then drain
//! - Give up on the drain when a second signal arrives
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last, after everything that can fail has been built

use crate::config::TapConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net::{Listener, ListenerError};
use crate::upstream::UpstreamError;

/// Error type for startup failures.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Start the proxy with `config` and serve until Ctrl+C / SIGTERM.
pub async fn run(config: TapConfig) -> Result<(), StartupError> {
    tracing::debug!(
        port = config.listener.port,
        max_connections = config.listener.max_connections,
        upstream = %config.upstream,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        drain_timeout_secs = config.timeouts.drain_secs,
        "Configuration loaded"
    );

    let server = HttpServer::new(&config)?;
    let listener = Listener::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::select! {
        result = server.run(listener, server_shutdown) => result?,
        _ = signals::shutdown_on_signal(shutdown) => {}
    }
    Ok(())
}
