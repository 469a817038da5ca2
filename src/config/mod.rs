//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! argv
//!     → cli.rs (clap parse)
//!     → validation.rs (upstream URL must be https with a host)
//!     → TapConfig (validated, immutable)
//!     → cloned into each worker
//! ```
//!
//! # Design Decisions
//! - Config is immutable once built; there is no reload
//! - Invalid upstream is rejected during argument parsing, before binding

pub mod cli;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use schema::{ListenerConfig, TapConfig, TimeoutConfig, UpstreamTarget};
pub use validation::ConfigError;
