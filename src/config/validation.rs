//! Upstream URL validation.
//!
//! # Responsibilities
//! - Parse the `--upstream` URL
//! - Reject anything that is not `https`
//! - Resolve the port (443 when omitted)
//!
//! # Design Decisions
//! - Validation is a pure function: `&str → Result<UpstreamTarget, ConfigError>`
//! - Runs before any listener is bound, so a bad upstream never serves traffic
//! - Path and query on the upstream URL are ignored; only the origin is used

use std::str::FromStr;

use url::Url;

use crate::config::schema::{UpstreamTarget, DEFAULT_UPSTREAM_PORT};

/// Error type for configuration problems. All of them are fatal at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid upstream URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("upstream must use https, got '{0}'")]
    InsecureScheme(String),

    #[error("upstream URL '{0}' has no hostname")]
    MissingHost(String),
}

impl UpstreamTarget {
    /// Parse and validate an upstream URL such as `https://api.example.com`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "https" {
            return Err(ConfigError::InsecureScheme(url.scheme().to_string()));
        }

        let host = match url.host_str() {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => return Err(ConfigError::MissingHost(raw.to_string())),
        };

        // `Url::port` hides the scheme default, so an explicit ":443" also lands here.
        let port = url.port().unwrap_or(DEFAULT_UPSTREAM_PORT);

        Ok(Self { host, port })
    }
}

impl FromStr for UpstreamTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
