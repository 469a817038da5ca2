//! Human-readable capture of inbound requests.
//!
//! # Responsibilities
//! - Render request line, headers and body as one text block
//! - Redact sensitive header values
//! - Pretty-print JSON bodies, fall back to lossy text otherwise
//!
//! # Design Decisions
//! - Rendering is pure (`&InboundRequest → String`) and never fails
//! - Emission goes through `tracing`, so the block lands on stderr with the
//!   rest of the log
//! - JSON key order is preserved so the trace can be diffed against the
//!   reference client's wire format

use std::fmt::Write;

use crate::http::InboundRequest;
use crate::security::headers::display_name;
use crate::security::RedactionPolicy;

const BEGIN_BANNER: &str = "===== TAP REQUEST BEGIN =====";
const END_BANNER: &str = "===== TAP REQUEST END =====";

/// Shown instead of an empty body section.
pub const NO_BODY_MARKER: &str = "(no body)";

/// Render a captured request for the observation log.
pub fn render_capture(request: &InboundRequest, policy: &RedactionPolicy) -> String {
    let mut out = String::with_capacity(256 + request.body.len() * 2);

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{BEGIN_BANNER}");
    let _ = writeln!(out, "{} {}", request.method, request.path);
    for (name, value) in &request.headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        let _ = writeln!(
            out,
            "{}: {}",
            display_name(name),
            policy.redact(name.as_str(), &value)
        );
    }

    if request.has_body() {
        let _ = writeln!(out, "\n--- body ---");
        let _ = writeln!(out, "{}", render_body(&request.body));
    } else {
        let _ = writeln!(out, "\n{NO_BODY_MARKER}");
    }
    out.push_str(END_BANNER);
    out
}

/// Pretty JSON when the bytes parse as JSON, lossy UTF-8 text otherwise.
pub fn render_body(raw: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(raw)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(raw).into_owned())
}

/// Log a captured request under its relay id.
pub fn emit_capture(relay_id: &str, request: &InboundRequest, policy: &RedactionPolicy) {
    tracing::info!(relay_id = %relay_id, "captured request\n{}", render_capture(request, policy));
}
