//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building HTTP clients with browser-like default headers
//! - GET requests returning raw bodies
//! - Bounded retry with exponential backoff and jitter
//! - Decoding bodies from the site's legacy encoding
//! - Error classification

use crate::config::{FetchConfig, SiteConfig};
use crate::crawler::backoff::RetryPolicy;
use crate::crawler::decode::{decode_body, encoding_for};
use crate::ConfigError;
use encoding_rs::Encoding;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA, REFERER};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: StatusCode },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Giving up on {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// The URL the failed request was for
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. }
            | Self::Timeout { url }
            | Self::Network { url, .. }
            | Self::Exhausted { url, .. } => url,
        }
    }
}

/// A fetched and decoded page
#[derive(Debug, Clone)]
pub struct Page {
    /// The requested URL
    pub url: String,

    /// Decoded markup
    pub markup: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use reel_harvest::config::FetchConfig;
/// use reel_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    insert_header(&mut headers, ACCEPT, &config.accept);
    insert_header(&mut headers, ACCEPT_LANGUAGE, &config.accept_language);

    if let Some(referer) = &config.referer {
        insert_header(&mut headers, REFERER, referer);
    }

    if config.no_cache {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    }

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

fn insert_header(headers: &mut HeaderMap, name: reqwest::header::HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => tracing::warn!("Ignoring invalid {} header value: {:?}", name.as_str(), value),
    }
}

/// Fetches pages with retry and decodes them
///
/// # Retry Logic
///
/// | Condition            | Action                              |
/// |----------------------|-------------------------------------|
/// | HTTP 200             | Success                             |
/// | Any other status     | Retry                               |
/// | Timeout              | Retry                               |
/// | Connection / network | Retry                               |
///
/// Every failure class is retried the same way, up to the policy's attempt
/// limit, waiting `base * 2^(n-1) + jitter` before retry `n`.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retry: RetryPolicy,
    encoding: &'static Encoding,
    fallback_encoding: &'static Encoding,
}

impl Fetcher {
    pub fn new(
        client: Client,
        retry: RetryPolicy,
        encoding: &'static Encoding,
        fallback_encoding: &'static Encoding,
    ) -> Self {
        Self {
            client,
            retry,
            encoding,
            fallback_encoding,
        }
    }

    /// Builds a fetcher from the fetch and site configuration
    pub fn from_config(fetch: &FetchConfig, site: &SiteConfig) -> crate::Result<Self> {
        let client = build_http_client(fetch)?;
        let encoding = encoding_for(&site.encoding)
            .ok_or_else(|| ConfigError::UnknownEncoding(site.encoding.clone()))?;
        let fallback = encoding_for(&site.fallback_encoding)
            .ok_or_else(|| ConfigError::UnknownEncoding(site.fallback_encoding.clone()))?;

        Ok(Self::new(
            client,
            RetryPolicy::from_config(fetch),
            encoding,
            fallback,
        ))
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fetches a URL and decodes its body
    pub async fn fetch_page(&self, url: &str) -> Result<Page, FetchError> {
        let bytes = self.fetch_bytes(url).await?;

        let markup = decode_body(&bytes, self.encoding, self.fallback_encoding);

        Ok(Page {
            url: url.to_string(),
            markup,
        })
    }

    /// Fetches a URL's raw body, retrying per the policy
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut attempt = 0;

        loop {
            let delay = self.retry.delay_for(attempt);
            if !delay.is_zero() {
                tracing::info!(
                    "Waiting {:.1}s before attempt {} for {}",
                    delay.as_secs_f64(),
                    attempt + 1,
                    url
                );
                tokio::time::sleep(delay).await;
            }

            match self.attempt(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    tracing::warn!("Attempt {} failed: {}", attempt + 1, e);

                    if !self.retry.should_retry(attempt) {
                        return Err(FetchError::Exhausted {
                            url: url.to_string(),
                            attempts: attempt + 1,
                            last: Box::new(e),
                        });
                    }
                }
            }

            attempt += 1;
        }
    }

    /// A single GET request
    async fn attempt(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response.bytes().await.map_err(|e| classify_error(url, e))?;
        Ok(bytes.to_vec())
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
