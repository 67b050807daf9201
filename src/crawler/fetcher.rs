//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests to fetch page content
//! - Retry with exponential backoff for transient failures
//! - Error classification into typed failures

use crate::config::{FetchConfig, UserAgentConfig};
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The URL that was requested
    pub url: Url,

    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code
    pub status: u16,

    /// Content-Type header value, if the server sent one
    pub content_type: Option<String>,

    /// Page body, decoded using the declared charset
    pub body: String,

    /// Number of attempts it took
    pub attempts: u32,
}

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed")]
    Connect,

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("not an HTML document ({0})")]
    NotHtml(String),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("request error: {0}")]
    Request(String),
}

impl FailureKind {
    /// Transient failures are worth another attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Connect | Self::Body(_))
    }
}

/// A fetch that failed for good, possibly after several attempts
#[derive(Debug, Clone, Error)]
#[error("fetch failed for {url} after {attempts} attempt(s): {kind}")]
pub struct FetchFailed {
    pub url: String,
    pub kind: FailureKind,
    pub attempts: u32,
}

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }

    /// Delay after the given failed attempt (1-based): initial * 2^(attempt-1), capped
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use qa_harvest::config::{FetchConfig, UserAgentConfig};
/// use qa_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    fetch: &FetchConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(fetch.timeout_secs))
        .connect_timeout(Duration::from_secs(fetch.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages with retry and backoff
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(fetch: &FetchConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(fetch, user_agent)?,
            retry: RetryPolicy::from_config(fetch),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Fetches an HTML page
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Timeout / connection error / truncated body | Retry with backoff up to `max_attempts` |
    /// | Non-2xx status | Fail immediately |
    /// | Non-HTML Content-Type | Fail immediately |
    ///
    /// Never panics and never aborts the run; every failure comes back as
    /// a [`FetchFailed`].
    pub async fn fetch(&self, url: &Url) -> Result<FetchResult, FetchFailed> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(url, true).await {
                Ok((final_url, status, content_type, body)) => {
                    return Ok(FetchResult {
                        url: url.clone(),
                        final_url,
                        status,
                        content_type,
                        body,
                        attempts: attempt,
                    });
                }
                Err(kind) if kind.is_transient() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    tracing::warn!(
                        "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                        attempt,
                        self.retry.max_attempts,
                        url,
                        kind,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(kind) => {
                    return Err(FetchFailed {
                        url: url.to_string(),
                        kind,
                        attempts: attempt,
                    });
                }
            }
        }
    }

    /// Fetches any text resource once, without retries or a Content-Type check
    pub async fn fetch_plain(&self, url: &Url) -> Result<String, FetchFailed> {
        self.fetch_once(url, false)
            .await
            .map(|(_, _, _, body)| body)
            .map_err(|kind| FetchFailed {
                url: url.to_string(),
                kind,
                attempts: 1,
            })
    }

    async fn fetch_once(
        &self,
        url: &Url,
        require_html: bool,
    ) -> Result<(Url, u16, Option<String>, String), FailureKind> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FailureKind::HttpStatus(status.as_u16()));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if require_html {
            if let Some(ct) = &content_type {
                if !is_html_content_type(ct) {
                    return Err(FailureKind::NotHtml(ct.clone()));
                }
            }
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FailureKind::Timeout
            } else {
                FailureKind::Body(e.to_string())
            }
        })?;

        Ok((final_url, status.as_u16(), content_type, body))
    }
}

/// Classifies a transport error
fn classify_error(e: reqwest::Error) -> FailureKind {
    if e.is_timeout() {
        FailureKind::Timeout
    } else if e.is_connect() {
        FailureKind::Connect
    } else {
        FailureKind::Request(e.to_string())
    }
}

/// HTML and XHTML are parsed; everything else is skipped
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}
