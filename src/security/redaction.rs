//! Redaction of sensitive header values in captured traces.
//!
//! The policy only ever touches log rendering. Forwarded requests carry the
//! original values.

use std::borrow::Cow;

/// Marker written in place of a sensitive value.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Headers redacted by default, lowercase.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie"];

/// Header names whose values must never reach the log.
#[derive(Debug, Clone)]
pub struct RedactionPolicy {
    names: &'static [&'static str],
}

impl RedactionPolicy {
    /// Returns true if values of `name` are redacted.
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// The value to log for header `name`.
    pub fn redact<'a>(&self, name: &str, value: &'a str) -> Cow<'a, str> {
        if self.is_sensitive(name) {
            Cow::Borrowed(REDACTION_MARKER)
        } else {
            Cow::Borrowed(value)
        }
    }
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self {
            names: SENSITIVE_HEADERS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names_any_casing() {
        let policy = RedactionPolicy::default();
        for name in ["authorization", "Authorization", "COOKIE", "Set-Cookie"] {
            assert!(policy.is_sensitive(name), "{name}");
            assert_eq!(policy.redact(name, "Bearer secret123"), REDACTION_MARKER);
        }
    }

    #[test]
    fn test_other_headers_verbatim() {
        let policy = RedactionPolicy::default();
        assert!(!policy.is_sensitive("x-api-key"));
        assert_eq!(policy.redact("content-type", "application/json"), "application/json");
    }
}
