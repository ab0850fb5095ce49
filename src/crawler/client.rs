//! Rate-limited HTTP fetch client
//!
//! Replaces ad-hoc per-callsite requests with one client that enforces the
//! crawl's resource policy: domain allow-listing, a depth bound on request
//! chains, a global in-flight cap, and a fixed-plus-random pacing delay
//! applied before every dispatch. Failures are reported to the caller and
//! never cancel sibling fetches.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tokio::sync::Semaphore;
use url::Url;

use crate::config::FetchLimits;
use crate::{CrawlError, Result};

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Content-Type header value, empty when absent
    pub content_type: String,

    /// Response body
    pub body: String,
}

/// Concurrency-bounded, paced HTTP fetcher.
pub struct FetchClient {
    client: Client,
    allowed_domains: Vec<String>,
    limits: FetchLimits,
    permits: Arc<Semaphore>,
}

impl FetchClient {
    /// Builds the client from the site's allowed hosts and the configured
    /// limits.
    pub fn new(allowed_domains: Vec<String>, limits: FetchLimits) -> Result<Self> {
        let client = Client::builder()
            .user_agent(limits.user_agent.clone())
            .timeout(Duration::from_secs(limits.timeout_secs))
            .gzip(true)
            .brotli(true)
            .build()?;

        let permits = Arc::new(Semaphore::new(limits.parallelism));

        Ok(Self {
            client,
            allowed_domains,
            limits,
            permits,
        })
    }

    /// Fetches a URL at the given request-chain depth.
    ///
    /// Depth and allowlist violations are rejected before anything is sent.
    /// Transport errors, timeouts and non-2xx statuses all come back as
    /// errors for the caller to report; none of them aborts the run.
    pub async fn fetch(&self, url: &str, depth: u32) -> Result<FetchedPage> {
        if depth > self.limits.max_depth {
            return Err(CrawlError::DepthExceeded {
                url: url.to_string(),
                depth,
            });
        }

        let parsed = Url::parse(url)?;
        if !self.is_allowed(&parsed) {
            return Err(CrawlError::DomainNotAllowed {
                url: url.to_string(),
            });
        }

        // The pacing sleep happens while the permit is held so dispatches
        // are spaced out, not just capped.
        let _permit = self
            .permits
            .acquire()
            .await
            .expect("fetch semaphore is never closed");
        self.pace().await;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|source| CrawlError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .text()
            .await
            .map_err(|source| CrawlError::Http {
                url: url.to_string(),
                source,
            })?;

        Ok(FetchedPage {
            url: final_url,
            status: status.as_u16(),
            content_type,
            body,
        })
    }

    fn is_allowed(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => self
                .allowed_domains
                .iter()
                .any(|domain| domain.eq_ignore_ascii_case(host)),
            None => false,
        }
    }

    async fn pace(&self) {
        let jitter_ms = if self.limits.random_delay_ms > 0 {
            rand::thread_rng().gen_range(0..=self.limits.random_delay_ms)
        } else {
            0
        };

        let wait = Duration::from_millis(self.limits.delay_ms + jitter_ms);
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}
