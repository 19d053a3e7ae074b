//! HTTP fetcher implementation
//!
//! This module is the only network-facing part of the crawler:
//! - The `PageFetcher` seam the pipeline is written against
//! - Building HTTP clients with a proper user agent string
//! - Retry logic for transient failures
//! - A minimum delay between request starts

use crate::config::{Config, CrawlerConfig, UserAgentConfig};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Retrieves raw resources by URL
///
/// Implementations decide transport and retry policy; callers only see the
/// final outcome.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches an HTML page and decodes it as UTF-8
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;

    /// Fetches raw bytes (images)
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use shelf_crawler::config::UserAgentConfig;
/// use shelf_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `PageFetcher` backed by a reqwest client
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Success |
/// | HTTP 4xx | Immediate failure |
/// | HTTP 5xx | Retry up to `max_retries` times |
/// | Timeout | Retry up to `max_retries` times |
/// | Connection refused, TLS error | Immediate failure |
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
    request_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl HttpFetcher {
    /// Creates a fetcher from the crawl configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        let client = build_http_client(&config.user_agent, timeout)?;
        Ok(Self::with_client(client, &config.crawler))
    }

    /// Wraps an existing client, taking retry and delay settings from `crawler`
    pub fn with_client(client: Client, crawler: &CrawlerConfig) -> Self {
        Self {
            client,
            max_retries: crawler.max_retries,
            retry_delay: Duration::from_millis(crawler.retry_delay_ms),
            request_delay: Duration::from_millis(crawler.request_delay_ms),
            last_request: Mutex::new(None),
        }
    }

    /// Waits until `request_delay` has passed since the previous request start
    async fn throttle(&self) {
        if self.request_delay.is_zero() {
            return;
        }

        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.request_delay {
                tokio::time::sleep(self.request_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Sends one GET request and reads the whole body
    async fn get_once(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map(|body| body.to_vec())
            .map_err(|e| FetchError::Body {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn get_with_retry(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut attempt = 0;
        loop {
            self.throttle().await;

            match self.get_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Transient failure ({}), retry {}/{} in {:?}",
                        e,
                        attempt,
                        self.max_retries,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("GET {}", url);
        let body = self.get_with_retry(url).await?;
        // Pages are UTF-8 regardless of what the server declares
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::debug!("GET {} (bytes)", url);
        self.get_with_retry(url).await
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}
