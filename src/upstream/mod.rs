//! Upstream exchange subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → security::forwarded_headers (hop-by-hop stripped, Host rewritten)
//!     → client.rs (fresh TLS connection, bounded wait for headers)
//!     → Response<Incoming> handed to the relay
//! ```

pub mod client;
pub mod error;

pub use client::{https_connector, HttpsUpstreamConnector, UpstreamBody, UpstreamClient};
pub use error::UpstreamError;
