//! HTTP client with a status-aware retry policy
//!
//! One long-lived `reqwest::Client` is shared by every request of a run. It is
//! handed to the crawler through the [`PageFetcher`] trait.

#![allow(clippy::uninlined_format_args)]

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, ClientBuilder, Method, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::infrastructure::config::defaults;
use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

/// Configuration for HTTP client behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Total attempts per request, first one included
    pub max_attempts: u32,
    /// Base of the exponential backoff, in milliseconds
    pub backoff_factor_ms: u64,
    /// Upper bound of a single backoff wait, in milliseconds
    pub max_backoff_ms: u64,
    /// Response statuses that are retried
    pub retry_statuses: Vec<u16>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_attempts: defaults::MAX_ATTEMPTS,
            backoff_factor_ms: defaults::BACKOFF_FACTOR_MS,
            max_backoff_ms: defaults::MAX_BACKOFF_MS,
            retry_statuses: defaults::RETRY_STATUSES.to_vec(),
        }
    }
}

/// When and how long to wait before trying a request again
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_factor: Duration,
    pub max_backoff: Duration,
    pub retry_statuses: Vec<u16>,
}

impl RetryPolicy {
    pub fn from_config(config: &HttpClientConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff_factor: Duration::from_millis(config.backoff_factor_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
            retry_statuses: config.retry_statuses.clone(),
        }
    }

    /// Wait after failed attempt `attempt` (1-based): `factor * 2^(attempt-1)`, capped
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let multiplier = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff_factor
            .saturating_mul(multiplier)
            .min(self.max_backoff)
    }

    /// Backoff, lengthened by a server-provided `Retry-After`, still capped
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self.backoff_for(attempt);
        retry_after
            .map_or(backoff, |hint| hint.max(backoff))
            .min(self.max_backoff)
    }

    /// Only methods without side effects are repeated
    pub fn is_idempotent(method: &Method) -> bool {
        matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
    }

    fn attempts_for(&self, method: &Method) -> u32 {
        if Self::is_idempotent(method) {
            self.max_attempts
        } else {
            1
        }
    }
}

/// Source of page bodies for the crawler
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the decoded body text
    async fn fetch_text(&self, url: &str) -> ScrapeResult<String>;
}

/// HTTP client with a fixed User-Agent, a per-request timeout and retries
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    policy: RetryPolicy,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: &HttpClientConfig) -> ScrapeResult<Self> {
        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|e| {
            ScrapeError::ClientBuild {
                message: format!("invalid User-Agent: {}", e),
            }
        })?;
        headers.insert(USER_AGENT, user_agent);

        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| ScrapeError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self::with_client(client, RetryPolicy::from_config(config)))
    }

    /// Wrap an already configured `reqwest::Client`
    pub fn with_client(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Send a request, retrying retryable failures of idempotent methods
    pub async fn request(&self, method: Method, url: &str) -> ScrapeResult<Response> {
        let attempts = self.policy.attempts_for(&method);
        let mut attempt = 1;

        loop {
            debug!("HTTP {} (attempt {}/{}): {}", method, attempt, attempts, url);

            let (error, retry_after) = match self.client.request(method.clone(), url).send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let retry_after = parse_retry_after(response.headers());
                    let error = ScrapeError::HttpStatus {
                        status: response.status().as_u16(),
                        url: url.to_string(),
                    };
                    (error, retry_after)
                }
                Err(e) => {
                    let error = ScrapeError::Transport {
                        url: url.to_string(),
                        message: e.to_string(),
                        retryable: !e.is_builder(),
                    };
                    (error, None)
                }
            };

            if attempt >= attempts || !error.is_retryable(&self.policy.retry_statuses) {
                return Err(error);
            }

            let delay = self.policy.delay_for(attempt, retry_after);
            warn!(
                "Attempt {}/{} failed: {}; retrying in {:?}",
                attempt, attempts, error, delay
            );
            sleep(delay).await;
            attempt += 1;
        }
    }

    /// GET `url` and return the body as text
    pub async fn get_text(&self, url: &str) -> ScrapeResult<String> {
        let response = self.request(Method::GET, url).await?;
        response.text().await.map_err(|e| ScrapeError::Transport {
            url: url.to_string(),
            message: format!("failed to read body: {}", e),
            retryable: false,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_text(&self, url: &str) -> ScrapeResult<String> {
        self.get_text(url).await
    }
}

/// `Retry-After` in delta-seconds form; HTTP-date values are ignored
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
