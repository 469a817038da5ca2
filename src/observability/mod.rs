//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay handler
//!     → capture.rs (render request block, redacted)
//!     → tracing events (relay id, status, bytes relayed)
//!     → logging.rs (fmt subscriber → stderr)
//! ```
//!
//! # Design Decisions
//! - Logs are unstructured text meant for humans diffing request traces
//! - Concurrent relays may interleave; no per-request atomicity is promised

pub mod capture;
pub mod logging;

pub use capture::{emit_capture, render_body, render_capture, NO_BODY_MARKER};
