//! Local diagnostic tap proxy.
//!
//! Listens on loopback, logs every request it receives (sensitive headers
//! redacted), relays it unchanged to one fixed HTTPS upstream and streams the
//! response back, event streams included.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request     ┌──────────┐    ┌──────────┐    ┌───────────┐
//!     ──────────────────▶│   net    │───▶│   http   │───▶│ upstream  │────▶ HTTPS
//!                        │ listener │    │ capture  │    │  client   │      origin
//!                        └──────────┘    └────┬─────┘    └─────┬─────┘
//!                                             │                │
//!                                     observability     security::headers
//!                                     (stderr log)      (hop-by-hop, Host)
//!     Client Response    ┌──────────┐                          │
//!     ◀──────────────────│  relay   │◀─────────────────────────┘
//!                        │  pump    │
//!                        └──────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod upstream;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::TapConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
