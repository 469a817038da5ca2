//! Header hygiene for both legs of a relay.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers before forwarding upstream
//! - Replace the client's Host with the upstream host
//! - Drop upstream Transfer-Encoding before answering the client
//!
//! # Design Decisions
//! - `HeaderMap` names are case-insensitive, so matching is by lowercase name
//! - Values and duplicate entries are carried verbatim; no semantic rewriting
//! - The local server owns response framing, so only Transfer-Encoding is
//!   removed on the way back

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Headers that only make sense for a single connection leg.
pub const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

/// Returns true if `name` is a hop-by-hop header (any casing).
pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(name))
}

/// Build the header set sent upstream.
///
/// Hop-by-hop headers and the inbound Host are dropped, every other entry is
/// copied unchanged (duplicates included), and exactly one Host equal to
/// `upstream_host` is appended.
pub fn forwarded_headers(inbound: &HeaderMap, upstream_host: &HeaderValue) -> HeaderMap {
    let mut forwarded = HeaderMap::with_capacity(inbound.len() + 1);

    for (name, value) in inbound {
        if is_hop_by_hop(name.as_str()) || name == header::HOST {
            continue;
        }
        forwarded.append(name.clone(), value.clone());
    }

    forwarded.insert(header::HOST, upstream_host.clone());
    forwarded
}

/// Build the header set written back to the client from an upstream response.
pub fn client_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if name == header::TRANSFER_ENCODING {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Render a header name in the `Title-Case` form most clients put on the wire.
///
/// The HTTP stack stores names lowercased; the capture log uses this so the
/// trace reads like the original request.
pub fn display_name(name: &HeaderName) -> String {
    let mut out = String::with_capacity(name.as_str().len());
    let mut upper = true;
    for c in name.as_str().chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        upper = c == '-';
    }
    out
}
