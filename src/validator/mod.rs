// src/validator/mod.rs
// =============================================================================
// This module validates an llms.txt URL end to end.
//
// What happens in one run:
// 1. Check the URL shape (https, path exactly /llms.txt)
// 2. Fetch the document, check its content type and size
// 3. Parse it into title / description / details / sections
// 4. Resolve every linked file against the site root
// 5. Skip same-host llms-full.txt, sample up to `limit` of the rest
// 6. Check the sample, 6 requests at a time
// 7. Turn the results into errors, warnings and metadata
//
// The stages live in run.rs; the report types and the statistics in report.rs.
// =============================================================================

mod report;
mod run;

use std::sync::Arc;
use std::time::Duration;

use crate::checker::{Fetcher, LinkChecker};
use crate::config::{ValidatorConfig, ROOT_FETCH_TIMEOUT};

pub use report::{LinkStats, Metadata, ValidationResult};
pub use run::{Run, Stage};

// Holds the fetcher and link checker; one Validator serves any number of runs
//
// Runs share nothing but the HTTP connection pool inside the fetcher:
// no document from one run is ever reused by another.
#[derive(Clone)]
pub struct Validator {
    fetcher: Arc<dyn Fetcher>,
    checker: LinkChecker,
    root_timeout: Duration,
}

impl Validator {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            checker: LinkChecker::new(fetcher.clone()),
            fetcher,
            root_timeout: ROOT_FETCH_TIMEOUT,
        }
    }

    // Overrides the root and per-link timeouts (5s each by default)
    pub fn with_timeouts(mut self, root: Duration, link: Duration) -> Self {
        self.root_timeout = root;
        self.checker = self.checker.with_timeout(link);
        self
    }

    // Validates the llms.txt at `url`
    //
    // Never fails: every problem ends up in the returned report.
    pub async fn validate(&self, url: &str, config: &ValidatorConfig) -> ValidationResult {
        let mut run = Run::new(self, config, url);
        let mut stage = Stage::ValidatingUrl;

        while stage != Stage::Done {
            stage = match run.advance(stage).await {
                Ok(next) => next,
                Err(error) => {
                    log::error!("{}: unexpected error: {}", url, error);
                    run.errors.push(format!("Unexpected error: {}", error));
                    run.terminal = true;
                    Stage::Done
                }
            };
        }

        let result = run.finish();
        log::info!(
            "{}: {} ({} errors, {} warnings)",
            url,
            if result.valid { "valid" } else { "invalid" },
            result.errors.len(),
            result.warnings.len()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{FailureKind, FetchedDocument};
    use crate::config::SamplingMode;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // In-memory web: URL -> canned response, unknown URLs answer 404
    #[derive(Default)]
    struct FakeWeb {
        pages: HashMap<String, Result<FetchedDocument, FetchError>>,
        calls: AtomicUsize,
    }

    impl FakeWeb {
        fn page(mut self, url: &str, content_type: &str, body: String) -> Self {
            self.pages.insert(
                url.to_string(),
                Ok(FetchedDocument {
                    status: 200,
                    status_text: "OK".to_string(),
                    content_type: content_type.to_string(),
                    body,
                }),
            );
            self
        }

        fn failure(mut self, url: &str, error: FetchError) -> Self {
            self.pages.insert(url.to_string(), Err(error));
            self
        }

        fn status(mut self, url: &str, status: u16, text: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                Ok(FetchedDocument {
                    status,
                    status_text: text.to_string(),
                    content_type: "text/html".to_string(),
                    body: String::new(),
                }),
            );
            self
        }
    }

    #[async_trait]
    impl Fetcher for FakeWeb {
        async fn fetch(
            &self,
            url: &str,
            _timeout: Duration,
        ) -> Result<FetchedDocument, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages.get(url).cloned().unwrap_or(Ok(FetchedDocument {
                status: 404,
                status_text: "Not Found".to_string(),
                content_type: "text/html".to_string(),
                body: String::new(),
            }))
        }
    }

    const ROOT: &str = "https://good.example/llms.txt";

    // A document with title, description and details around the given list lines
    fn llms_txt(entries: &[&str]) -> String {
        let mut text = String::from(
            "# Good Example\n\n> Docs for the good example.\n\nSome details.\n\n## Docs\n\n",
        );
        for entry in entries {
            text.push_str(entry);
            text.push('\n');
        }
        text
    }

    async fn validate(
        web: FakeWeb,
        url: &str,
        config: ValidatorConfig,
    ) -> (ValidationResult, usize) {
        let web = Arc::new(web);
        let validator = Validator::new(web.clone());
        let result = validator.validate(url, &config).await;
        assert_eq!(result.valid, result.errors.is_empty());
        assert_eq!(result.metadata.is_some(), result.parsed.is_some());
        (result, web.calls.load(Ordering::SeqCst))
    }

    fn text(tokens: usize) -> String {
        "x".repeat(tokens * 5)
    }

    #[tokio::test]
    async fn test_happy_path() {
        let mut body = llms_txt(&[
            "- [A](https://good.example/a.md): First doc",
            "- [B](/b.md)",
            "- [C](c.md): Third",
        ]);
        // pad to exactly 500 tokens
        let pad = 2500 - body.len();
        body.push_str(&" ".repeat(pad));

        let web = FakeWeb::default()
            .page(ROOT, "text/plain; charset=utf-8", body)
            .page("https://good.example/a.md", "text/plain", text(1000))
            .page("https://good.example/b.md", "text/plain", text(1000))
            .page("https://good.example/c.md", "text/markdown", text(1000));

        let (result, calls) = validate(web, ROOT, ValidatorConfig::default()).await;

        assert!(result.valid, "errors: {:?}", result.errors);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(calls, 4);

        let metadata = result.metadata.unwrap();
        assert_eq!(metadata.tokens_in_llms_txt, 500);
        assert_eq!(metadata.size_tokens, 500);
        assert_eq!(metadata.link_count, 3);
        assert_eq!(metadata.checked_link_count, 3);
        assert_eq!(metadata.ignored_link_count, 0);
        assert_eq!(metadata.valid_link_count, 3);
        assert_eq!(metadata.valid_percentage, 100.0);
        assert_eq!(metadata.text_plain_or_markdown_count, 3);
        assert_eq!(metadata.other_content_type_count, 0);
        assert_eq!(metadata.min_linked_doc_tokens, Some(1000));
        assert_eq!(metadata.max_linked_doc_tokens, Some(1000));
        assert_eq!(metadata.avg_linked_doc_tokens, Some(1000));
        assert_eq!(metadata.section_count, 1);
        assert!(metadata.has_description);
        assert!(metadata.has_details);
        assert_eq!(result.link_results.len(), 3);
    }

    #[tokio::test]
    async fn test_wrong_path_makes_no_requests() {
        let url = "https://good.example/other.txt";
        let (result, calls) = validate(FakeWeb::default(), url, ValidatorConfig::default()).await;
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["Path must be /llms.txt"]);
        assert!(result.metadata.is_none());
        assert!(result.link_results.is_empty());
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_scheme_and_path_reported_together() {
        let url = "http://good.example/docs/llms.txt";
        let (result, calls) = validate(FakeWeb::default(), url, ValidatorConfig::default()).await;
        assert_eq!(result.errors, vec!["URL must use HTTPS", "Path must be /llms.txt"]);
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let (result, calls) =
            validate(FakeWeb::default(), "not a url", ValidatorConfig::default()).await;
        assert_eq!(result.errors, vec!["Invalid URL format"]);
        assert!(result.metadata.is_none());
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_root_timeout_is_terminal() {
        let web = FakeWeb::default().failure(ROOT, FetchError::Timeout);
        let (result, calls) = validate(web, ROOT, ValidatorConfig::default()).await;
        assert_eq!(result.errors, vec!["Request timed out"]);
        assert!(result.metadata.is_none());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_root_network_error_is_terminal() {
        let web = FakeWeb::default()
            .failure(ROOT, FetchError::Network("connection refused".to_string()));
        let (result, _) = validate(web, ROOT, ValidatorConfig::default()).await;
        assert_eq!(result.errors, vec!["Network error"]);
    }

    #[tokio::test]
    async fn test_root_http_status_is_terminal() {
        let web = FakeWeb::default().status(ROOT, 503, "Service Unavailable");
        let (result, _) = validate(web, ROOT, ValidatorConfig::default()).await;
        assert_eq!(result.errors, vec!["HTTP 503"]);
        assert!(result.metadata.is_none());
    }

    #[tokio::test]
    async fn test_root_body_failure_is_unexpected() {
        let web = FakeWeb::default().failure(ROOT, FetchError::Body("stream reset".to_string()));
        let (result, _) = validate(web, ROOT, ValidatorConfig::default()).await;
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Unexpected error: "));
        assert!(result.errors[0].contains("stream reset"));
        assert!(result.metadata.is_none());
        assert!(result.parsed.is_none());
    }

    #[tokio::test]
    async fn test_wrong_root_content_type_continues() {
        let web = FakeWeb::default()
            .page(ROOT, "text/html", llms_txt(&["- [A](/a.md)"]))
            .page("https://good.example/a.md", "text/plain", text(10));
        let (result, calls) = validate(web, ROOT, ValidatorConfig::default()).await;
        assert_eq!(result.errors, vec!["Invalid content-type: text/html"]);
        assert_eq!(calls, 2);
        let metadata = result.metadata.unwrap();
        assert_eq!(metadata.content_type, "text/html");
        assert_eq!(metadata.valid_link_count, 1);
    }

    #[tokio::test]
    async fn test_large_root_is_only_a_warning() {
        let mut body = llms_txt(&["- [A](/a.md)"]);
        body.push_str(&text(20_001));
        let web = FakeWeb::default()
            .page(ROOT, "text/plain", body)
            .page("https://good.example/a.md", "text/plain", text(10));
        let (result, _) = validate(web, ROOT, ValidatorConfig::default()).await;
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("Content too large: "));
    }

    #[tokio::test]
    async fn test_parse_failure_is_terminal() {
        let web = FakeWeb::default().page(ROOT, "text/plain", "<html>nope</html>".to_string());
        let (result, _) = validate(web, ROOT, ValidatorConfig::default()).await;
        assert_eq!(result.errors, vec!["Failed to parse llms.txt"]);
        assert!(result.parsed.is_none());
        assert!(result.metadata.is_none());
    }

    #[tokio::test]
    async fn test_no_links_and_missing_sections() {
        let web = FakeWeb::default().page(ROOT, "text/plain", "# Bare\n".to_string());
        let (result, calls) = validate(web, ROOT, ValidatorConfig::default()).await;
        assert_eq!(
            result.errors,
            vec!["No links found, please ensure your llms.txt is parsed correctly."]
        );
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("description"));
        assert!(result.warnings[1].contains("details"));
        assert_eq!(calls, 1);

        let metadata = result.metadata.unwrap();
        assert_eq!(metadata.link_count, 0);
        assert_eq!(metadata.checked_link_count, 0);
        assert_eq!(metadata.valid_percentage, 0.0);
        assert!(!metadata.has_description);
        assert!(!metadata.has_details);
    }

    #[tokio::test]
    async fn test_oversized_link() {
        let web = FakeWeb::default()
            .page(ROOT, "text/plain", llms_txt(&["- [Big](/big.txt)", "- [Small](/small.txt)"]))
            .page("https://good.example/big.txt", "text/plain", text(150_000))
            .page("https://good.example/small.txt", "text/plain", text(10));
        let (result, _) = validate(web, ROOT, ValidatorConfig::default()).await;

        assert!(!result.valid);
        let big = result
            .link_results
            .iter()
            .find(|r| r.url == "https://good.example/big.txt")
            .unwrap();
        assert!(!big.valid);
        assert!(big.fail_reason.contains("150000"));
        assert!(big.fail_reason.contains("100,000"));
        assert_eq!(big.failure, Some(FailureKind::TooLarge { tokens: 150_000 }));

        assert!(result.errors.iter().any(|e| {
            e.contains("exceed 100000 tokens")
                && e.contains("https://good.example/big.txt (150000 tokens)")
        }));
        assert!(result.errors.iter().any(|e| e.contains("(50.0%)")));

        let metadata = result.metadata.unwrap();
        assert_eq!(metadata.valid_percentage, 50.0);
        // size stats only look at valid documents
        assert_eq!(metadata.max_linked_doc_tokens, Some(10));
    }

    #[tokio::test]
    async fn test_only_ignored_links() {
        let web = FakeWeb::default().page(
            ROOT,
            "text/plain",
            llms_txt(&["- [Everything](https://good.example/llms-full.txt)"]),
        );
        let (result, calls) = validate(web, ROOT, ValidatorConfig::default()).await;

        assert!(result.valid, "errors: {:?}", result.errors);
        assert_eq!(calls, 1);
        let metadata = result.metadata.as_ref().unwrap();
        assert_eq!(metadata.link_count, 1);
        assert_eq!(metadata.ignored_link_count, 1);
        assert_eq!(metadata.checked_link_count, 0);
        assert_eq!(metadata.valid_percentage, 0.0);
        assert_eq!(
            result.warnings,
            vec![
                "Ignored 1 link(s) to llms-full.txt on the same hostname: \
                 https://good.example/llms-full.txt"
            ]
        );
        assert_eq!(result.link_results.len(), 1);
        assert!(result.link_results[0].ignored);
    }

    #[tokio::test]
    async fn test_llms_full_on_other_host_is_checked() {
        let web = FakeWeb::default()
            .page(ROOT, "text/plain", llms_txt(&["- [Other](https://other.example/llms-full.txt)"]))
            .page("https://other.example/llms-full.txt", "text/plain", text(5));
        let (result, calls) = validate(web, ROOT, ValidatorConfig::default()).await;
        assert_eq!(calls, 2);
        assert_eq!(result.metadata.unwrap().checked_link_count, 1);
    }

    #[tokio::test]
    async fn test_all_links_broken() {
        let web = FakeWeb::default()
            .page(
                ROOT,
                "text/plain",
                llms_txt(&["- [A](/a.md)", "- [B](mailto:docs@good.example)"]),
            )
            .status("https://good.example/a.md", 500, "Internal Server Error");
        let (result, _) = validate(web, ROOT, ValidatorConfig::default()).await;

        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("From 2 checked links, only 0 returned valid (0.0%)"));
        assert!(result.errors[0]
            .contains("https://good.example/a.md (HTTP 500 Internal Server Error)"));
        assert!(result.errors[0].contains("mailto:docs@good.example (Invalid URL protocol"));
        assert_eq!(result.warnings, vec!["None of the checked links were valid"]);

        let metadata = result.metadata.unwrap();
        assert_eq!(metadata.min_linked_doc_tokens, None);
        assert_eq!(metadata.avg_linked_doc_tokens, None);
        assert_eq!(metadata.other_content_type_count, 2);
    }

    #[tokio::test]
    async fn test_unresolvable_entry_is_checked_verbatim() {
        let web = FakeWeb::default()
            .page(
                ROOT,
                "text/plain",
                llms_txt(&["- [A](/a.md)", "- [Bad](http://[oops)"]),
            )
            .page("https://good.example/a.md", "text/plain", text(10));
        let (result, calls) = validate(web, ROOT, ValidatorConfig::default()).await;

        // root and /a.md only; the broken entry never reaches the network
        assert_eq!(calls, 2);
        assert!(!result.valid);

        let bad = result
            .link_results
            .iter()
            .find(|r| r.url == "http://[oops")
            .unwrap();
        assert!(!bad.valid);
        assert!(!bad.ignored);
        assert_eq!(bad.content_type, "invalid");
        assert_eq!(bad.failure, Some(FailureKind::InvalidScheme));

        let metadata = result.metadata.unwrap();
        assert_eq!(metadata.link_count, 2);
        assert_eq!(metadata.checked_link_count, 2);
        assert_eq!(metadata.ignored_link_count, 0);
        assert!(result.errors[0].contains("http://[oops (Invalid URL protocol"));
    }

    // Answers after `delay`, or times out if the caller's deadline is shorter
    struct SlowWeb {
        inner: FakeWeb,
        delay: Duration,
        timeouts: std::sync::Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Fetcher for SlowWeb {
        async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedDocument, FetchError> {
            if let Ok(mut seen) = self.timeouts.lock() {
                seen.push(timeout);
            }
            if timeout < self.delay {
                return Err(FetchError::Timeout);
            }
            self.inner.fetch(url, timeout).await
        }
    }

    fn slow_site() -> SlowWeb {
        SlowWeb {
            inner: FakeWeb::default()
                .page(ROOT, "text/plain", llms_txt(&["- [A](/a.md)"]))
                .page("https://good.example/a.md", "text/plain", text(10)),
            delay: Duration::from_secs(2),
            timeouts: std::sync::Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_short_root_timeout_stops_the_run() {
        let web = Arc::new(slow_site());
        let validator = Validator::new(web.clone())
            .with_timeouts(Duration::from_millis(500), Duration::from_secs(5));
        let result = validator.validate(ROOT, &ValidatorConfig::default()).await;

        assert_eq!(result.errors, vec!["Request timed out"]);
        assert!(result.metadata.is_none());
        assert_eq!(*web.timeouts.lock().unwrap(), vec![Duration::from_millis(500)]);
    }

    #[tokio::test]
    async fn test_short_link_timeout_fails_links_only() {
        let web = Arc::new(slow_site());
        let validator = Validator::new(web.clone())
            .with_timeouts(Duration::from_secs(5), Duration::from_millis(1500));
        let result = validator.validate(ROOT, &ValidatorConfig::default()).await;

        assert!(!result.valid);
        assert_eq!(
            result.link_results[0].failure,
            Some(FailureKind::Timeout { millis: 1500 })
        );
        assert_eq!(
            *web.timeouts.lock().unwrap(),
            vec![Duration::from_secs(5), Duration::from_millis(1500)]
        );
    }

    #[tokio::test]
    async fn test_ignored_results_come_after_checked() {
        let web = FakeWeb::default()
            .page(
                ROOT,
                "text/plain",
                llms_txt(&["- [Full](/llms-full.txt)", "- [A](/a.md)", "- [B](/b.md)"]),
            )
            .page("https://good.example/a.md", "text/plain", text(3))
            .page("https://good.example/b.md", "text/plain", text(4));
        let (result, _) = validate(web, ROOT, ValidatorConfig::default()).await;
        assert_eq!(result.link_results.len(), 3);
        assert!(!result.link_results[0].ignored);
        assert!(!result.link_results[1].ignored);
        assert!(result.link_results[2].ignored);
        assert_eq!(result.link_results[2].url, "https://good.example/llms-full.txt");
    }

    #[tokio::test]
    async fn test_sampling_truncates_but_counts_all_links() {
        let entries: Vec<String> = (0..10).map(|i| format!("- [D{}](/d{}.md)", i, i)).collect();
        let refs: Vec<&str> = entries.iter().map(|s| s.as_str()).collect();
        let mut web = FakeWeb::default().page(ROOT, "text/plain", llms_txt(&refs));
        for i in 0..10 {
            web = web.page(&format!("https://good.example/d{}.md", i), "text/plain", text(7));
        }

        let (result, calls) = validate(web, ROOT, ValidatorConfig::with_limit(4)).await;
        assert_eq!(calls, 5);
        let metadata = result.metadata.unwrap();
        assert_eq!(metadata.link_count, 10);
        assert_eq!(metadata.checked_link_count, 4);
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let entries: Vec<String> = (0..30).map(|i| format!("- [D{}](/d{}.md)", i, i)).collect();
        let refs: Vec<&str> = entries.iter().map(|s| s.as_str()).collect();

        let build = || {
            let mut web = FakeWeb::default().page(ROOT, "text/plain", llms_txt(&refs));
            for i in 0..30 {
                // every third document is broken
                if i % 3 == 0 {
                    web = web.status(&format!("https://good.example/d{}.md", i), 404, "Not Found");
                } else {
                    let url = format!("https://good.example/d{}.md", i);
                    web = web.page(&url, "text/plain", text(i + 1));
                }
            }
            web
        };

        for config in [
            ValidatorConfig::with_limit(50),
            ValidatorConfig::with_limit(8),
            ValidatorConfig::with_limit(8).sampling(SamplingMode::Seeded(42)),
        ] {
            let (first, _) = validate(build(), ROOT, config.clone()).await;
            let (second, _) = validate(build(), ROOT, config.clone()).await;
            assert_eq!(first.errors, second.errors);
            assert_eq!(first.warnings, second.warnings);
            assert_eq!(first.metadata, second.metadata);
            assert_eq!(first.link_results, second.link_results);
        }
    }

    #[tokio::test]
    async fn test_random_sampling_still_respects_limit() {
        let entries: Vec<String> = (0..20).map(|i| format!("- [D{}](/d{}.md)", i, i)).collect();
        let refs: Vec<&str> = entries.iter().map(|s| s.as_str()).collect();
        let web = FakeWeb::default().page(ROOT, "text/plain", llms_txt(&refs));
        let config = ValidatorConfig::with_limit(5).sampling(SamplingMode::Random);
        let (result, calls) = validate(web, ROOT, config).await;
        assert_eq!(calls, 6);
        assert_eq!(result.metadata.unwrap().checked_link_count, 5);
    }

    #[tokio::test]
    async fn test_stages_step_by_step() {
        let web = Arc::new(FakeWeb::default().page(ROOT, "text/plain", "# Bare\n".to_string()));
        let validator = Validator::new(web);
        let config = ValidatorConfig::default();
        let mut run = Run::new(&validator, &config, ROOT);

        let mut seen = vec![Stage::ValidatingUrl];
        let mut stage = Stage::ValidatingUrl;
        while stage != Stage::Done {
            stage = run.advance(stage).await.unwrap();
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                Stage::ValidatingUrl,
                Stage::FetchingDocument,
                Stage::ParsingDocument,
                Stage::ExtractingLinks,
                Stage::SamplingLinks,
                Stage::CheckingLinks,
                Stage::Aggregating,
                Stage::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_terminal_stage_jumps_to_done() {
        let validator = Validator::new(Arc::new(FakeWeb::default()));
        let config = ValidatorConfig::default();
        let mut run = Run::new(&validator, &config, "ftp://good.example/llms.txt");
        assert_eq!(run.advance(Stage::ValidatingUrl).await.unwrap(), Stage::Done);
    }

    #[tokio::test]
    async fn test_stage_out_of_order_is_an_error() {
        let validator = Validator::new(Arc::new(FakeWeb::default()));
        let config = ValidatorConfig::default();
        let mut run = Run::new(&validator, &config, ROOT);
        assert!(run.advance(Stage::FetchingDocument).await.is_err());
    }
}
