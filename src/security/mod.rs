//! Header hygiene and redaction.
//!
//! # Data Flow
//! ```text
//! inbound headers
//!     → redaction.rs (log rendering only)
//!     → headers.rs (strip hop-by-hop, rewrite Host) → upstream
//!
//! upstream response headers
//!     → headers.rs (drop Transfer-Encoding) → client
//! ```

pub mod headers;
pub mod redaction;

pub use headers::{client_response_headers, forwarded_headers, is_hop_by_hop, HOP_BY_HOP_HEADERS};
pub use redaction::{RedactionPolicy, REDACTION_MARKER};
