//! Configuration schema definitions.
//!
//! Everything here is built once at startup and never mutated afterwards.
//! Workers receive a clone (or an `Arc`) of the values they need.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Default local listen port.
pub const DEFAULT_PORT: u16 = 18080;

/// Default secure port used when the upstream URL carries none.
pub const DEFAULT_UPSTREAM_PORT: u16 = 443;

/// Default bound on upstream connect + response headers.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 120;

/// Default cap on concurrent client connections.
pub const DEFAULT_MAX_CONNECTIONS: usize = 1024;

/// Default grace period for open connections (event streams) at shutdown.
pub const DEFAULT_DRAIN_TIMEOUT_SECS: u64 = 10;

/// Root configuration for the tap proxy.
#[derive(Debug, Clone)]
pub struct TapConfig {
    /// Local listener settings.
    pub listener: ListenerConfig,

    /// The single HTTPS origin every request is relayed to.
    pub upstream: UpstreamTarget,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

/// Listener configuration.
///
/// The bind address is always loopback; only the port is configurable.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Local port. `0` asks the OS for an ephemeral port.
    pub port: u16,

    /// Maximum concurrent client connections (backpressure).
    pub max_connections: usize,
}

impl ListenerConfig {
    /// The socket address the listener binds to.
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }
}

/// Timeout configuration.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Upper bound on connect + TLS + response headers, in seconds.
    /// The streamed body is not covered.
    pub upstream_secs: u64,

    /// How long shutdown waits for open connections before abandoning them.
    pub drain_secs: u64,
}

impl TimeoutConfig {
    pub fn upstream(&self) -> Duration {
        Duration::from_secs(self.upstream_secs)
    }

    pub fn drain(&self) -> Duration {
        Duration::from_secs(self.drain_secs)
    }
}

/// The fixed upstream origin.
///
/// Only constructible through [`UpstreamTarget::parse`] (or `FromStr`), which
/// guarantees the scheme was `https` and a host was present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    pub(crate) host: String,
    pub(crate) port: u16,
}

impl UpstreamTarget {
    /// Hostname as written in the URL (IPv6 literals keep their brackets).
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port`, suitable for a URI authority.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "https://{}:{}", self.host, self.port)
    }
}
