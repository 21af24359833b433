// src/validator/report.rs
// =============================================================================
// The validation report and the statistics behind it.
//
// ValidationResult is what the API returns and what `check --json` prints.
// Its JSON keys are camelCase to stay compatible with existing clients.
//
// The helpers at the bottom are pure functions over LinkCheckResults so the
// numbers can be tested without any network.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::checker::LinkCheckResult;
use crate::config::MAX_LINKED_DOC_TOKENS;
use crate::parser::LlmsTxt;
use crate::tokens::estimate_tokens;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True iff `errors` is empty
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// The parsed document, null when the run stopped before parsing succeeded
    pub parsed: Option<LlmsTxt>,
    /// Checked links (sample order) followed by ignored links
    pub link_results: Vec<LinkCheckResult>,
    /// Present iff parsing succeeded
    pub metadata: Option<Metadata>,
}

impl ValidationResult {
    // A run that stopped early: no parse, no links, no metadata
    pub fn stopped(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
            parsed: None,
            link_results: Vec::new(),
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    // Root document
    pub size_tokens: u64,
    pub content_type: String,
    pub link_count: usize,
    pub tokens_in_llms_txt: u64,

    // Link stats (ignored links never count)
    pub checked_link_count: usize,
    pub ignored_link_count: usize,
    pub valid_link_count: usize,
    pub valid_percentage: f64,
    pub text_plain_or_markdown_count: usize,
    pub other_content_type_count: usize,

    // Sizes of valid linked documents
    pub min_linked_doc_tokens: Option<u64>,
    pub max_linked_doc_tokens: Option<u64>,
    pub avg_linked_doc_tokens: Option<u64>,

    // Structure
    pub section_count: usize,
    pub avg_description_length: u64,
    pub has_description: bool,
    pub has_details: bool,
}

// Numbers derived from the checked (non-ignored) link results
#[derive(Debug, Clone, PartialEq)]
pub struct LinkStats {
    pub checked: usize,
    pub valid: usize,
    /// Unrounded, 0.0 when nothing was checked
    pub percentage: f64,
    pub text_plain_or_markdown: usize,
    pub other_content_type: usize,
    pub min_tokens: Option<u64>,
    pub max_tokens: Option<u64>,
    pub avg_tokens: Option<u64>,
}

impl LinkStats {
    pub fn from_results(checked: &[LinkCheckResult]) -> Self {
        let valid = checked.iter().filter(|r| r.valid).count();

        // Empty documents say nothing about size, leave them out
        let sizes: Vec<u64> = checked
            .iter()
            .filter(|r| r.valid && r.tokens > 0)
            .map(|r| r.tokens)
            .collect();

        let text_plain_or_markdown = checked.iter().filter(|r| r.is_text_content()).count();

        let percentage = if checked.is_empty() {
            0.0
        } else {
            valid as f64 / checked.len() as f64 * 100.0
        };

        let avg_tokens = if sizes.is_empty() {
            None
        } else {
            let sum: u64 = sizes.iter().sum();
            Some((sum as f64 / sizes.len() as f64).round() as u64)
        };

        Self {
            checked: checked.len(),
            valid,
            percentage,
            text_plain_or_markdown,
            other_content_type: checked.len() - text_plain_or_markdown,
            min_tokens: sizes.iter().copied().min(),
            max_tokens: sizes.iter().copied().max(),
            avg_tokens,
        }
    }

    // Percentage as reported in metadata: two decimals
    pub fn rounded_percentage(&self) -> f64 {
        round2(self.percentage)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// Error naming every checked document above the token ceiling
pub fn oversized_error(checked: &[LinkCheckResult]) -> Option<String> {
    let oversized: Vec<String> = checked
        .iter()
        .filter(|r| r.tokens > MAX_LINKED_DOC_TOKENS)
        .map(|r| format!("{} ({} tokens)", r.url, r.tokens))
        .collect();

    if oversized.is_empty() {
        return None;
    }
    Some(format!(
        "The following linked documents exceed {} tokens: {}",
        MAX_LINKED_DOC_TOKENS,
        oversized.join(", ")
    ))
}

// Error listing every invalid link, when at least one was checked and not all passed
pub fn percentage_error(stats: &LinkStats, checked: &[LinkCheckResult]) -> Option<String> {
    if stats.checked == 0 || stats.percentage >= 100.0 {
        return None;
    }

    let invalid: Vec<String> = checked
        .iter()
        .filter(|r| !r.valid)
        .map(|r| format!("{} ({})", r.url, r.fail_reason))
        .collect();

    Some(format!(
        "From {} checked links, only {} returned valid ({:.1}%) markdown/text. Invalid links: {}",
        stats.checked,
        stats.valid,
        round_half_up_1(stats.percentage),
        invalid.join(", ")
    ))
}

// Ties go up (1.25 -> 1.3); `{:.1}` alone would round them to even
fn round_half_up_1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// Mean token estimate of the per-file notes; files without notes count as 0
pub fn avg_description_length(document: &LlmsTxt) -> u64 {
    let lengths: Vec<u64> = document
        .files()
        .map(|file| estimate_tokens(file.notes.as_deref().unwrap_or("")))
        .collect();

    if lengths.is_empty() {
        return 0;
    }
    let sum: u64 = lengths.iter().sum();
    (sum as f64 / lengths.len() as f64).round() as u64
}
