//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection on 127.0.0.1
//!     → listener.rs (accept loop, connection limits)
//!     → connection.rs (HTTP/1.1 serving, lifecycle tracking)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Bounded accept via semaphore prevents resource exhaustion
//! - Each connection runs in its own task; nothing is shared between them
//!   except the immutable router
//! - Each connection tracked for graceful shutdown

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{ConnectionPermit, Listener, ListenerError};
