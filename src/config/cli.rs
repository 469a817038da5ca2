//! Command-line arguments.

use clap::Parser;

use crate::config::schema::{
    ListenerConfig, TapConfig, TimeoutConfig, UpstreamTarget, DEFAULT_DRAIN_TIMEOUT_SECS,
    DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT, DEFAULT_UPSTREAM_TIMEOUT_SECS,
};

#[derive(Debug, Parser)]
#[command(name = "tap-proxy")]
#[command(about = "Capture requests on loopback and relay them to a fixed HTTPS upstream", long_about = None)]
pub struct Cli {
    /// Local port to listen on (always bound to 127.0.0.1).
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Upstream origin, e.g. https://api.example.com
    #[arg(long)]
    pub upstream: UpstreamTarget,

    /// Upstream connect + response-header timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Seconds to wait for open connections on shutdown before exiting anyway.
    #[arg(long, default_value_t = DEFAULT_DRAIN_TIMEOUT_SECS)]
    pub drain_timeout_secs: u64,

    /// Maximum concurrent client connections.
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: usize,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Turn parsed arguments into the immutable runtime configuration.
    pub fn into_config(self) -> TapConfig {
        TapConfig {
            listener: ListenerConfig {
                port: self.port,
                max_connections: self.max_connections.max(1),
            },
            upstream: self.upstream,
            timeouts: TimeoutConfig {
                upstream_secs: self.timeout_secs,
                drain_secs: self.drain_timeout_secs,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["tap-proxy", "--upstream", "https://yunyi.example"]).unwrap();
        let config = cli.into_config();
        assert_eq!(config.listener.port, 18080);
        assert_eq!(config.listener.bind_address().to_string(), "127.0.0.1:18080");
        assert_eq!(config.upstream.host(), "yunyi.example");
        assert_eq!(config.upstream.port(), 443);
        assert_eq!(config.timeouts.upstream_secs, 120);
        assert_eq!(config.timeouts.drain_secs, 10);
        assert_eq!(config.listener.max_connections, 1024);
    }

    #[test]
    fn test_upstream_required() {
        assert!(Cli::try_parse_from(["tap-proxy", "--port", "9000"]).is_err());
    }

    #[test]
    fn test_insecure_upstream_rejected_by_parser() {
        let err = Cli::try_parse_from(["tap-proxy", "--upstream", "http://example.com"]).unwrap_err();
        assert!(err.to_string().contains("https"));
    }

    #[test]
    fn test_custom_port() {
        let cli = Cli::try_parse_from([
            "tap-proxy",
            "--port",
            "0",
            "--upstream",
            "https://example.com:8443",
        ])
        .unwrap();
        let config = cli.into_config();
        assert_eq!(config.listener.port, 0);
        assert_eq!(config.upstream.authority(), "example.com:8443");
    }

    #[test]
    fn test_drain_timeout_flag() {
        let cli = Cli::try_parse_from([
            "tap-proxy",
            "--upstream",
            "https://example.com",
            "--drain-timeout-secs",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.into_config().timeouts.drain(), std::time::Duration::from_secs(2));
    }
}
