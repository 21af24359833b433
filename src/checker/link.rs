// src/checker/link.rs
// =============================================================================
// This module checks one linked document from an llms.txt file.
//
// Key functionality:
// - Makes a GET request (we need the body to count tokens)
// - Detects the failure modes that matter for llms.txt links:
//   bad scheme, timeout, network error, non-2xx status, wrong content type,
//   document too large
// - Never returns an error: every outcome is a LinkCheckResult
//
// One broken link should make the report worse, not abort the run.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::failure::FailureKind;
use super::fetch::Fetcher;
use crate::config::{LINK_TIMEOUT, MAX_LINKED_DOC_TOKENS};
use crate::error::FetchError;
use crate::tokens::estimate_tokens;

/// Sentinel content type for links that were never requested (bad scheme)
pub const CONTENT_TYPE_INVALID: &str = "invalid";
/// Sentinel content type for links whose request failed
pub const CONTENT_TYPE_ERROR: &str = "error";
/// Sentinel content type for links skipped by the ignore policy
pub const CONTENT_TYPE_IGNORED: &str = "ignored";

// Represents the result of checking a single link
//
// Serialized with camelCase keys: url, valid, tokens, contentType,
// failReason, ignored (only when true), failure (only when invalid).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCheckResult {
    /// Absolute URL that was checked
    pub url: String,
    pub valid: bool,
    /// Token estimate of the body (0 when no body was read)
    pub tokens: u64,
    /// Raw Content-Type header, or one of the sentinels above
    pub content_type: String,
    /// Empty iff valid
    pub fail_reason: String,
    /// Skipped by the ignore policy; never counted in statistics
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ignored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl LinkCheckResult {
    fn passed(url: String, tokens: u64, content_type: String) -> Self {
        Self {
            url,
            valid: true,
            tokens,
            content_type,
            fail_reason: String::new(),
            ignored: false,
            failure: None,
        }
    }

    fn failed(url: String, tokens: u64, content_type: String, failure: FailureKind) -> Self {
        Self {
            url,
            valid: false,
            tokens,
            content_type,
            fail_reason: failure.to_string(),
            ignored: false,
            failure: Some(failure),
        }
    }

    // Entry for a link the ignore policy skipped
    pub fn ignored(url: String) -> Self {
        Self {
            url,
            valid: true,
            tokens: 0,
            content_type: CONTENT_TYPE_IGNORED.to_string(),
            fail_reason: String::new(),
            ignored: true,
            failure: None,
        }
    }

    // True when the response declared text/plain or text/markdown
    pub fn is_text_content(&self) -> bool {
        is_text_content_type(&self.content_type)
    }
}

// Checks links one at a time; share it (Arc) across queue workers
#[derive(Clone)]
pub struct LinkChecker {
    fetcher: Arc<dyn Fetcher>,
    timeout: Duration,
}

impl LinkChecker {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            timeout: LINK_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    // Checks a single link
    //
    // Steps, stopping at the first failure:
    //   1. scheme must be http:// or https://
    //   2. GET must finish in time and return 2xx
    //   3. Content-Type must be text/plain or text/markdown
    //   4. body must be at most 100,000 tokens
    pub async fn check(&self, url: &str) -> LinkCheckResult {
        let url = url.to_string();

        if !is_http_link(&url) {
            return LinkCheckResult::failed(
                url,
                0,
                CONTENT_TYPE_INVALID.to_string(),
                FailureKind::InvalidScheme,
            );
        }

        let document = match self.fetcher.fetch(&url, self.timeout).await {
            Ok(document) => document,
            Err(error) => {
                let failure = match error {
                    FetchError::Timeout => FailureKind::Timeout {
                        millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    },
                    FetchError::Network(message) => FailureKind::Network { message },
                    FetchError::Body(message) => FailureKind::Unexpected { message },
                };
                log::debug!("link {} failed: {}", url, failure);
                return LinkCheckResult::failed(url, 0, CONTENT_TYPE_ERROR.to_string(), failure);
            }
        };

        if !document.is_success() {
            let failure = FailureKind::HttpStatus {
                code: document.status,
                reason: document.status_text,
            };
            return LinkCheckResult::failed(url, 0, CONTENT_TYPE_ERROR.to_string(), failure);
        }

        let tokens = estimate_tokens(&document.body);
        let content_type = document.content_type;

        if !is_text_content_type(&content_type) {
            let failure = FailureKind::InvalidContentType {
                content_type: content_type.clone(),
            };
            return LinkCheckResult::failed(url, tokens, content_type, failure);
        }

        if tokens > MAX_LINKED_DOC_TOKENS {
            let failure = FailureKind::TooLarge { tokens };
            return LinkCheckResult::failed(url, tokens, content_type, failure);
        }

        LinkCheckResult::passed(url, tokens, content_type)
    }
}

// Case-insensitive substring match, so "text/plain; charset=utf-8" passes
pub fn is_text_content_type(content_type: &str) -> bool {
    let lower = content_type.to_ascii_lowercase();
    lower.contains("text/plain") || lower.contains("text/markdown")
}

// We skip mailto:, tel:, ftp:, and anything that does not parse as a URL
// (entries the validator could not resolve arrive here verbatim)
fn is_http_link(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
