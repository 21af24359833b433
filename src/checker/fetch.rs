// src/checker/fetch.rs
// =============================================================================
// This module is the only place that talks to the network.
//
// Everything else in the crate asks a `Fetcher` for a URL and gets back a
// `FetchedDocument` (status, content type, body). Keeping this behind a trait
// lets the validator run against an in-memory fake in tests, and keeps the
// reqwest details (timeouts, redirects, headers) in one file.
//
// Rust concepts:
// - Traits: An interface that several types can implement
// - async-trait: Lets trait methods be async (boxed futures under the hood)
// - Arc<dyn Trait>: Shared ownership of "some Fetcher" chosen at runtime
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use crate::config::{ACCEPT_HEADER, MAX_REDIRECTS, USER_AGENT};
use crate::error::FetchError;

// What came back from one GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    /// HTTP status code
    pub status: u16,
    /// Reason phrase for the status ("Not Found"), empty if unknown
    pub status_text: String,
    /// Raw Content-Type header value, empty when the header is missing
    pub content_type: String,
    /// Response body. Only read for 2xx responses; empty otherwise.
    pub body: String,
}

impl FetchedDocument {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// "Fetch bytes for a URL with a timeout"
//
// Implementations must not retry, must send the Accept header from config,
// and must apply `timeout` to the whole exchange including the body.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedDocument, FetchError>;
}

// The real fetcher, backed by a shared reqwest Client
//
// The client is created once and reused for every request (connection
// pooling); cloning an HttpFetcher is cheap.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds a client that follows up to MAX_REDIRECTS redirects
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedDocument, FetchError> {
        // RequestBuilder::timeout covers connect, headers AND body
        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_HEADER)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let mut document = FetchedDocument {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            content_type,
            body: String::new(),
        };

        // No point downloading an error page
        if status.is_success() {
            document.body = response.text().await?;
        }

        log::debug!(
            "GET {} -> {} ({} bytes, {:?})",
            url,
            document.status,
            document.body.len(),
            document.content_type
        );

        Ok(document)
    }
}
