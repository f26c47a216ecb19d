//! Network seam used by every source adapter
//!
//! Adapters only ever see response bodies as text. Status handling, retries
//! and error mapping live in [`ReqwestTransport`]; tests swap in a scripted
//! transport instead.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use crate::constants::retry;
use crate::error::AppError;

#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and return the body of a 2xx response
    async fn get_text(&self, url: &str) -> Result<String, AppError>;

    /// POST `body` as JSON to `url` and return the body of a 2xx response
    async fn post_json_text(&self, url: &str, body: &serde_json::Value)
    -> Result<String, AppError>;
}

/// Production transport backed by a pooled `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    max_retries: u32,
    base_delay: Duration,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            max_retries: retry::MAX_RETRIES,
            base_delay: Duration::from_millis(retry::BASE_DELAY_MS),
        }
    }

    /// Overrides the retry policy. `max_retries` counts attempts after the first.
    pub fn with_retry(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }

    /// Sends a request built by `build`, retrying failures that
    /// [`AppError::is_retryable`] classifies as transient, with exponential
    /// backoff. Honors Retry-After up to a fixed ceiling.
    async fn send_with_retry<F>(&self, url: &str, build: F) -> Result<Response, AppError>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0u32;
        let mut backoff = self.base_delay;
        loop {
            let (failure, wait) = match build().send().await {
                Ok(resp) if resp.status().is_success() => return Ok(resp),
                Ok(resp) => {
                    let status = resp.status();
                    let reason = status.canonical_reason().unwrap_or("Unknown error");
                    let failure = status_error(status.as_u16(), reason, url);
                    if !failure.is_retryable() || attempt >= self.max_retries {
                        return Ok(resp);
                    }
                    let retry_after = resp
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|h| h.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .map(|secs| secs.min(retry::MAX_RETRY_AFTER_SECONDS))
                        .map(Duration::from_secs);
                    (failure, retry_after.unwrap_or(backoff))
                }
                Err(e) => {
                    let failure = request_error(url, e);
                    if !failure.is_retryable() || attempt >= self.max_retries {
                        error!("Request failed for URL {}: {}", url, failure);
                        return Err(failure);
                    }
                    (failure, backoff)
                }
            };

            warn!(
                "{}. Retrying in {:?} (attempt {}/{})",
                failure,
                wait,
                attempt + 1,
                self.max_retries
            );
            tokio::time::sleep(wait).await;
            attempt += 1;
            backoff = backoff.saturating_mul(2);
        }
    }

    async fn read_body(url: &str, response: Response) -> Result<String, AppError> {
        let status = response.status();
        debug!("Response status: {status}");

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown error");
            error!("HTTP {} - {} (URL: {})", status.as_u16(), reason, url);
            return Err(status_error(status.as_u16(), reason, url));
        }

        let text = response.text().await.map_err(|e| {
            error!("Failed to read response text from URL {}: {}", url, e);
            AppError::ApiFetch(e)
        })?;

        debug!("Response length: {} bytes", text.len());
        let preview: String = text.chars().take(1024).collect();
        debug!("Response text (first 1024 chars): {preview}");
        Ok(text)
    }
}

/// Maps a failed send to the matching error variant
fn request_error(url: &str, e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::network_timeout(url)
    } else if e.is_connect() {
        AppError::network_connection(url, e.to_string())
    } else {
        AppError::ApiFetch(e)
    }
}

/// Maps a non-success status code to the matching error variant
pub fn status_error(status_code: u16, reason: &str, url: &str) -> AppError {
    match status_code {
        404 => AppError::api_not_found(url),
        429 => AppError::api_rate_limit(reason, url),
        400..=499 => AppError::api_client_error(status_code, reason, url),
        502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
        _ => AppError::api_server_error(status_code, reason, url),
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self))]
    async fn get_text(&self, url: &str) -> Result<String, AppError> {
        debug!("GET {url}");
        let response = self.send_with_retry(url, || self.client.get(url)).await?;
        Self::read_body(url, response).await
    }

    #[instrument(skip(self, body))]
    async fn post_json_text(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<String, AppError> {
        debug!("POST {url}");
        let response = self
            .send_with_retry(url, || self.client.post(url).json(body))
            .await?;
        Self::read_body(url, response).await
    }
}
