// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - fetch: The Fetcher trait and its reqwest-backed implementation
// - link: Checks one linked document and classifies the outcome
// - failure: The typed reasons a link can fail
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod failure;
mod fetch;
mod link;

// Re-export public items from submodules
// This lets users write `checker::LinkChecker` instead of
// `checker::link::LinkChecker`
pub use failure::FailureKind;
pub use fetch::{FetchedDocument, Fetcher, HttpFetcher};
pub use link::{
    is_text_content_type, LinkCheckResult, LinkChecker, CONTENT_TYPE_ERROR, CONTENT_TYPE_IGNORED,
    CONTENT_TYPE_INVALID,
};
