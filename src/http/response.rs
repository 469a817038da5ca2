//! Client-facing response assembly.
//!
//! # Responsibilities
//! - Copy upstream status and reason phrase verbatim
//! - Copy upstream headers except Transfer-Encoding
//! - Attach the streamed body
//!
//! # Design Decisions
//! - Framing (chunked vs Content-Length) is left to the local server
//! - Upstream failures become plain-text 502/504 responses, never a 200

use axum::body::Body;
use axum::http::response::Parts;
use axum::http::Response;
use axum::response::IntoResponse;
use hyper::ext::ReasonPhrase;

use crate::security::client_response_headers;
use crate::upstream::UpstreamError;

/// Build the response head for the client from the upstream head.
pub fn client_response(upstream: &Parts, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = upstream.status;
    *response.headers_mut() = client_response_headers(&upstream.headers);

    // Only present when upstream used a non-canonical phrase.
    if let Some(reason) = upstream.extensions.get::<ReasonPhrase>() {
        response.extensions_mut().insert(reason.clone());
    }
    response
}

/// Response sent when the upstream exchange failed outright.
pub fn upstream_failure(err: &UpstreamError) -> Response<Body> {
    let message = match err {
        UpstreamError::Timeout(_) => "Upstream timed out",
        _ => "Upstream request failed",
    };
    (err.status(), message).into_response()
}
