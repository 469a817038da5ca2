//! HTTP relay subsystem.
//!
//! # Data Flow
//! ```text
//! client connection
//!     → server.rs (Axum fallback handler, one relay per request)
//!     → request.rs (capture method, path, headers, body)
//!     → observability::capture (log block)
//!     → upstream::UpstreamClient (one TLS connection per relay)
//!     → response.rs (status, reason, headers minus Transfer-Encoding)
//!     → relay.rs (chunked pump, client-disconnect tolerant)
//!     → client connection
//! ```

pub mod relay;
pub mod request;
pub mod response;
pub mod server;

pub use relay::{pump, RelayOutcome, CHUNK_SIZE};
pub use request::InboundRequest;
pub use server::HttpServer;
