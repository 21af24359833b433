// src/lib.rs
// =============================================================================
// Library side of llmstxt-check.
//
// The binary (src/main.rs) is a thin shell around this: it parses arguments,
// builds a Validator and either runs one check or starts the HTTP API.
//
// Module map:
// - tokens     : cheap token estimate (bytes / 5, rounded up)
// - parser     : llms.txt markdown -> LlmsTxt
// - checker    : the Fetcher seam and the per-link checker
// - schedule   : bounded-concurrency queue and link sampling
// - validator  : the staged validation run and its report
// - server     : GET /check and friends
// - config     : limits, timeouts and sampling settings
// - error      : error types
// - logging    : env_logger setup
// =============================================================================

pub mod checker;
pub mod config;
pub mod error;
pub mod logging;
pub mod parser;
pub mod schedule;
pub mod server;
pub mod tokens;
pub mod validator;

pub use checker::{FailureKind, Fetcher, HttpFetcher, LinkCheckResult, LinkChecker};
pub use config::{SamplingMode, ValidatorConfig};
pub use parser::{parse_llms_txt, LlmsTxt};
pub use tokens::estimate_tokens;
pub use validator::{Metadata, ValidationResult, Validator};
