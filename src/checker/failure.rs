// src/checker/failure.rs
// =============================================================================
// Why a linked document failed its check.
//
// Each variant renders (via Display) to the exact human-readable reason that
// ends up in LinkCheckResult.fail_reason, so operators get a sentence while
// tests and API clients get a stable "kind" to match on.
//
// JSON shape (internally tagged):
//   {"kind": "http_status", "code": 404, "reason": "Not Found"}
// =============================================================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum FailureKind {
    /// Not an http:// or https:// URL (mailto:, ftp:, unresolvable relative paths, ...)
    #[error("Invalid URL protocol (must be http:// or https://)")]
    InvalidScheme,

    /// No complete response within the per-link deadline
    #[error("Request timed out after {} seconds", seconds_text(*millis))]
    Timeout { millis: u64 },

    /// DNS, connect, TLS or redirect failure
    #[error("Network error: {message}")]
    Network { message: String },

    /// Server answered with a non-2xx status
    #[error("HTTP {code} {reason}")]
    HttpStatus { code: u16, reason: String },

    /// Body could not be read after a successful status
    #[error("Unexpected error: {message}")]
    Unexpected { message: String },

    /// Neither text/plain nor text/markdown
    #[error("Invalid content-type: {content_type} (expected text/plain or text/markdown)")]
    InvalidContentType { content_type: String },

    /// Over the linked document token ceiling
    #[error("Document too large: {tokens} tokens (max 100,000)")]
    TooLarge { tokens: u64 },
}

// Whole seconds print bare ("5"), anything else keeps the fraction ("0.25")
fn seconds_text(millis: u64) -> String {
    if millis % 1000 == 0 {
        (millis / 1000).to_string()
    } else {
        let text = format!("{}.{:03}", millis / 1000, millis % 1000);
        text.trim_end_matches('0').to_string()
    }
}
