// src/validator/run.rs
// =============================================================================
// One validation run as an explicit state machine.
//
//   ValidatingUrl -> FetchingDocument -> ParsingDocument -> ExtractingLinks
//     -> SamplingLinks -> CheckingLinks -> Aggregating -> Done
//
// Severity has two tiers:
// - errors / warnings: what the user sees; any error makes the document invalid
// - terminal: set by a stage that cannot go on (bad URL, fetch failure,
//   unparsable document). The machine jumps straight to Done and the report
//   carries no metadata.
//
// Errors that are NOT terminal (wrong content type, no links, broken links)
// are recorded and the run keeps going, so every other advisory still shows up.
// =============================================================================

use url::Url;

use super::report::{
    avg_description_length, oversized_error, percentage_error, LinkStats, Metadata,
    ValidationResult,
};
use super::Validator;
use crate::checker::{is_text_content_type, LinkCheckResult};
use crate::config::{ValidatorConfig, MAX_ROOT_DOC_TOKENS};
use crate::error::{FetchError, ValidateError};
use crate::parser::{parse_llms_txt, LlmsTxt};
use crate::schedule::{run_queue, sampling_rng, LinkSampler, Sample};
use crate::tokens::estimate_tokens;

const REQUIRED_PATH: &str = "/llms.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidatingUrl,
    FetchingDocument,
    ParsingDocument,
    ExtractingLinks,
    SamplingLinks,
    CheckingLinks,
    Aggregating,
    Done,
}

// Everything a run has learned so far
pub struct Run<'a> {
    validator: &'a Validator,
    config: &'a ValidatorConfig,
    input: &'a str,

    pub(crate) errors: Vec<String>,
    pub(crate) warnings: Vec<String>,
    pub(crate) terminal: bool,

    url: Option<Url>,
    content_type: String,
    body: String,
    tokens_in_llms_txt: u64,
    parsed: Option<LlmsTxt>,
    links: Vec<String>,
    sample: Sample,
    checked: Vec<LinkCheckResult>,
    metadata: Option<Metadata>,
}

impl<'a> Run<'a> {
    pub fn new(validator: &'a Validator, config: &'a ValidatorConfig, input: &'a str) -> Self {
        Self {
            validator,
            config,
            input,
            errors: Vec::new(),
            warnings: Vec::new(),
            terminal: false,
            url: None,
            content_type: String::new(),
            body: String::new(),
            tokens_in_llms_txt: 0,
            parsed: None,
            links: Vec::new(),
            sample: Sample::default(),
            checked: Vec::new(),
            metadata: None,
        }
    }

    // Executes one stage and returns the next one
    pub async fn advance(&mut self, stage: Stage) -> Result<Stage, ValidateError> {
        log::debug!("{}: {:?}", self.input, stage);

        let next = match stage {
            Stage::ValidatingUrl => {
                self.validate_url();
                Stage::FetchingDocument
            }
            Stage::FetchingDocument => {
                self.fetch_document().await?;
                Stage::ParsingDocument
            }
            Stage::ParsingDocument => {
                self.parse_document();
                Stage::ExtractingLinks
            }
            Stage::ExtractingLinks => {
                self.extract_links()?;
                Stage::SamplingLinks
            }
            Stage::SamplingLinks => {
                self.sample_links()?;
                Stage::CheckingLinks
            }
            Stage::CheckingLinks => {
                self.check_links().await;
                Stage::Aggregating
            }
            Stage::Aggregating => {
                self.aggregate()?;
                Stage::Done
            }
            Stage::Done => Stage::Done,
        };

        Ok(if self.terminal { Stage::Done } else { next })
    }

    // Builds the report; metadata and link results only exist for finished runs
    pub fn finish(self) -> ValidationResult {
        if self.terminal || self.metadata.is_none() {
            return ValidationResult::stopped(self.errors, self.warnings);
        }

        let mut link_results = self.checked;
        link_results.extend(self.sample.ignored.into_iter().map(LinkCheckResult::ignored));

        ValidationResult {
            valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
            parsed: self.parsed,
            link_results,
            metadata: self.metadata,
        }
    }

    fn stop(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.terminal = true;
    }

    // Both checks run so the user sees every problem with the URL at once
    fn validate_url(&mut self) {
        let url = match Url::parse(self.input) {
            Ok(url) => url,
            Err(_) => {
                self.stop("Invalid URL format");
                return;
            }
        };

        if url.scheme() != "https" {
            self.errors.push("URL must use HTTPS".to_string());
        }
        if url.path() != REQUIRED_PATH {
            self.errors.push("Path must be /llms.txt".to_string());
        }

        if self.errors.is_empty() {
            self.url = Some(url);
        } else {
            self.terminal = true;
        }
    }

    async fn fetch_document(&mut self) -> Result<(), ValidateError> {
        let url = self.url.as_ref().ok_or(ValidateError::OutOfOrder("fetch"))?;

        let document = match self
            .validator
            .fetcher
            .fetch(url.as_str(), self.validator.root_timeout)
            .await
        {
            Ok(document) => document,
            Err(FetchError::Timeout) => {
                log::warn!("{}: request timed out", url);
                self.stop("Request timed out");
                return Ok(());
            }
            Err(FetchError::Network(message)) => {
                log::warn!("{}: network error: {}", url, message);
                self.stop("Network error");
                return Ok(());
            }
            Err(FetchError::Body(message)) => return Err(ValidateError::Body(message)),
        };

        if !document.is_success() {
            self.stop(format!("HTTP {}", document.status));
            return Ok(());
        }

        if !is_text_content_type(&document.content_type) {
            self.errors
                .push(format!("Invalid content-type: {}", document.content_type));
        }

        self.tokens_in_llms_txt = estimate_tokens(&document.body);
        if self.tokens_in_llms_txt > MAX_ROOT_DOC_TOKENS {
            self.warnings
                .push(format!("Content too large: {} tokens", self.tokens_in_llms_txt));
        }

        self.content_type = document.content_type;
        self.body = document.body;
        Ok(())
    }

    fn parse_document(&mut self) {
        match parse_llms_txt(&self.body) {
            Ok(parsed) => self.parsed = Some(parsed),
            Err(error) => {
                log::debug!("{}: parse failed: {}", self.input, error);
                self.stop("Failed to parse llms.txt");
            }
        }
    }

    fn extract_links(&mut self) -> Result<(), ValidateError> {
        let url = self.url.as_ref().ok_or(ValidateError::OutOfOrder("extract"))?;
        let parsed = self.parsed.as_ref().ok_or(ValidateError::OutOfOrder("extract"))?;

        let base = origin(url);
        self.links = parsed
            .files()
            .map(|file| match base.join(&file.url) {
                Ok(resolved) => resolved.to_string(),
                Err(_) => file.url.clone(),
            })
            .collect();

        if self.links.is_empty() {
            self.errors.push(
                "No links found, please ensure your llms.txt is parsed correctly.".to_string(),
            );
        }

        if parsed.description.is_none() {
            self.warnings.push(
                "Consider adding a description section to explain what this llms.txt file contains"
                    .to_string(),
            );
        }
        if parsed.details.is_none() {
            self.warnings.push(
                "Consider adding a details section with additional context about your content"
                    .to_string(),
            );
        }

        Ok(())
    }

    fn sample_links(&mut self) -> Result<(), ValidateError> {
        let url = self.url.as_ref().ok_or(ValidateError::OutOfOrder("sample"))?;
        let root_host = url.host_str().unwrap_or("");

        let mut rng = sampling_rng(self.config.sampling, &self.body);
        self.sample = LinkSampler::new(self.config.limit).sample(&self.links, root_host, &mut rng);

        log::debug!(
            "{}: {} links, {} sampled, {} ignored",
            self.input,
            self.links.len(),
            self.sample.checked.len(),
            self.sample.ignored.len()
        );
        Ok(())
    }

    async fn check_links(&mut self) {
        let checker = &self.validator.checker;
        self.checked = run_queue(
            &self.sample.checked,
            |link: String| async move { checker.check(&link).await },
            self.config.concurrency,
        )
        .await;
    }

    fn aggregate(&mut self) -> Result<(), ValidateError> {
        let parsed = self.parsed.as_ref().ok_or(ValidateError::OutOfOrder("aggregate"))?;
        let stats = LinkStats::from_results(&self.checked);

        if let Some(error) = oversized_error(&self.checked) {
            self.errors.push(error);
        }
        if let Some(error) = percentage_error(&stats, &self.checked) {
            self.errors.push(error);
        }

        if stats.checked > 0 && stats.valid == 0 {
            self.warnings
                .push("None of the checked links were valid".to_string());
        }
        if !self.sample.ignored.is_empty() {
            self.warnings.push(format!(
                "Ignored {} link(s) to llms-full.txt on the same hostname: {}",
                self.sample.ignored.len(),
                self.sample.ignored.join(", ")
            ));
        }

        self.metadata = Some(Metadata {
            size_tokens: self.tokens_in_llms_txt,
            content_type: self.content_type.clone(),
            link_count: self.links.len(),
            tokens_in_llms_txt: self.tokens_in_llms_txt,

            checked_link_count: stats.checked,
            ignored_link_count: self.sample.ignored.len(),
            valid_link_count: stats.valid,
            valid_percentage: stats.rounded_percentage(),
            text_plain_or_markdown_count: stats.text_plain_or_markdown,
            other_content_type_count: stats.other_content_type,

            min_linked_doc_tokens: stats.min_tokens,
            max_linked_doc_tokens: stats.max_tokens,
            avg_linked_doc_tokens: stats.avg_tokens,

            section_count: parsed.sections.len(),
            avg_description_length: avg_description_length(parsed),
            has_description: parsed.description.is_some(),
            has_details: parsed.details.is_some(),
        });

        Ok(())
    }
}

// Relative links resolve against the site root, not against /llms.txt
fn origin(url: &Url) -> Url {
    let mut base = url.clone();
    base.set_path("/");
    base.set_query(None);
    base.set_fragment(None);
    base
}
