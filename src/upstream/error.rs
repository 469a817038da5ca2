//! Upstream failure taxonomy.

use std::time::Duration;

use axum::http::StatusCode;

/// Error type for one upstream exchange. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Trust roots could not be loaded; fatal at startup.
    #[error("failed to load TLS trust roots: {0}")]
    TlsRoots(#[source] std::io::Error),

    /// The relayed request could not be assembled (bad path or header value).
    #[error("invalid upstream request: {0}")]
    InvalidRequest(#[from] axum::http::Error),

    /// Connect, TLS handshake or protocol failure.
    #[error("upstream request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),

    /// No response headers within the configured bound.
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

impl UpstreamError {
    /// Status returned to the client when the exchange fails.
    pub fn status(&self) -> StatusCode {
        match self {
            UpstreamError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}
