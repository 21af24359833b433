// src/error.rs
// =============================================================================
// Error types for the library side of the crate.
//
// Only a few things are allowed to fail with an error value:
// - the fetch seam (timeouts, connection problems, unreadable bodies)
// - the llms.txt parser
// - parsing the ?limit= query parameter
//
// Everything a user would call "the document is broken" is NOT an error here.
// Those end up as strings in ValidationResult.errors / warnings, or as a
// FailureKind on a single link (see checker::failure).
// =============================================================================

use thiserror::Error;

// Why fetching a URL did not give us a response body
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The per-request deadline passed
    #[error("request timed out")]
    Timeout,

    /// DNS, connect, TLS, redirect loop, ...
    #[error("{0}")]
    Network(String),

    /// Headers arrived but the body could not be read or decoded
    #[error("{0}")]
    Body(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_body() || error.is_decode() {
            FetchError::Body(error.to_string())
        } else {
            FetchError::Network(error.to_string())
        }
    }
}

// Structural problems that make a text unreadable as llms.txt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("document is empty")]
    Empty,

    #[error("document must start with a '# Title' heading")]
    MissingTitle,

    #[error("the '# Title' heading has no text")]
    EmptyTitle,

    #[error("document has more than one '# Title' heading (line {line})")]
    MultipleTitles { line: usize },
}

// Failures the validator does not expect. They are caught at the top of a run
// and reported as "Unexpected error: ...".
#[derive(Error, Debug)]
pub enum ValidateError {
    #[error("failed to read response body: {0}")]
    Body(String),

    /// A stage ran before the stage that feeds it
    #[error("{0} stage ran before its input was ready")]
    OutOfOrder(&'static str),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitError {
    #[error("limit must be a positive number")]
    NotPositive,
}
