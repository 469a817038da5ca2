//! Log subscriber setup.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber once per process
//! - Route all output to stderr so relayed bytes never mix with logs
//!
//! # Design Decisions
//! - Human-readable fmt layer; this is a diagnostic tool, not a service
//! - `RUST_LOG` wins over the built-in default filter

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directives.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "tap_proxy=debug,tower_http=debug"
    } else {
        "tap_proxy=info,tower_http=warn"
    }
}

/// Install the global subscriber writing to stderr.
pub fn init(verbose: bool) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
