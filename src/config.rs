// src/config.rs
// =============================================================================
// Tunables for a validation run.
//
// Most values are fixed policy (timeouts, the 6-request concurrency ceiling,
// token ceilings). The only per-run knobs are the link sampling limit and the
// sampling mode, which come from CLI flags or from the ?limit= query parameter.
// =============================================================================

use std::time::Duration;

use crate::error::LimitError;

/// Timeout for fetching the llms.txt document itself.
pub const ROOT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for each linked document.
pub const LINK_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum number of link requests in flight at once.
pub const LINK_CONCURRENCY: usize = 6;

/// Links sampled per run when no limit is given.
pub const DEFAULT_LINK_LIMIT: usize = 50;

/// Hard ceiling for the sampling limit. Larger requests are clamped.
pub const MAX_LINK_LIMIT: usize = 500;

/// A linked document above this many tokens is invalid.
pub const MAX_LINKED_DOC_TOKENS: u64 = 100_000;

/// An llms.txt above this many tokens gets a warning.
pub const MAX_ROOT_DOC_TOKENS: u64 = 20_000;

/// Sent with every outbound request.
pub const ACCEPT_HEADER: &str = "text/plain, text/markdown, */*";

pub const MAX_REDIRECTS: usize = 10;

pub const USER_AGENT: &str = concat!("llmstxt-check/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8787;

/// Where the sampler gets its randomness from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingMode {
    /// Seed from a hash of the llms.txt body: same document, same sample.
    #[default]
    ContentHash,
    /// Seed given explicitly (CLI --seed).
    Seeded(u64),
    /// Fresh entropy every run.
    Random,
}

// Settings for one validation run
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// How many non-ignored links to check at most (already clamped)
    pub limit: usize,
    pub sampling: SamplingMode,
    /// Worker count for the link queue
    pub concurrency: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LINK_LIMIT,
            sampling: SamplingMode::default(),
            concurrency: LINK_CONCURRENCY,
        }
    }
}

impl ValidatorConfig {
    // Builds a config with the given limit, clamped to MAX_LINK_LIMIT
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: clamp_limit(limit),
            ..Self::default()
        }
    }

    pub fn sampling(mut self, sampling: SamplingMode) -> Self {
        self.sampling = sampling;
        self
    }
}

pub fn clamp_limit(limit: usize) -> usize {
    limit.min(MAX_LINK_LIMIT)
}

// Parses the optional ?limit= query value
//
// Rules:
//   absent or empty   -> DEFAULT_LINK_LIMIT
//   leading integer   -> that integer ("12abc" reads as 12)
//   no digits, or < 1 -> LimitError::NotPositive
//   above 500         -> clamped to 500
pub fn parse_limit(raw: Option<&str>) -> Result<usize, LimitError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw.trim_start(),
        _ => return Ok(DEFAULT_LINK_LIMIT),
    };

    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() || negative {
        return Err(LimitError::NotPositive);
    }

    // Anything too long for usize is certainly above the ceiling
    let value = digits.parse::<usize>().unwrap_or(usize::MAX);
    if value < 1 {
        return Err(LimitError::NotPositive);
    }

    Ok(clamp_limit(value))
}
