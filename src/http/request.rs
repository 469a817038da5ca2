//! Inbound request capture.
//!
//! # Responsibilities
//! - Snapshot method, path (with query), headers and body of a client request
//! - Read the body only as far as the declared Content-Length
//!
//! # Design Decisions
//! - The body is fully buffered before anything is forwarded
//! - A missing Content-Length means "no body"
//! - Bodies framed without Content-Length (chunked uploads) are not read
//! - A malformed or conflicting Content-Length never gets here: hyper's
//!   HTTP/1 parser answers it with `400 Bad Request` before routing

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Method, Request};

/// A fully captured client request.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Path including the query string, exactly as requested.
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    /// Capture a request, reading its body when a Content-Length is declared.
    pub async fn capture(request: Request<Body>) -> Result<Self, axum::Error> {
        let (parts, body) = request.into_parts();

        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        let body = match declared_body_len(&parts.headers) {
            Some(0) | None => Bytes::new(),
            Some(len) => axum::body::to_bytes(body, len).await?,
        };

        Ok(Self {
            method: parts.method,
            path,
            headers: parts.headers,
            body,
        })
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}

/// The declared Content-Length, if any.
///
/// Requests built in-process can still carry garbage here, so anything that
/// does not parse counts as absent.
pub fn declared_body_len(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
