//! Generic HTTP fetching utilities with retry logic and error handling

use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use crate::constants::retry;
use crate::error::AppError;

/// Bounded exponential backoff applied around every upstream request
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Cap on a single sleep, including `Retry-After` values
    pub max_delay: Duration,
    pub jitter_fraction: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: retry::MAX_RETRIES,
            base_delay: Duration::from_millis(retry::BASE_DELAY_MS),
            max_delay: Duration::from_secs(retry::MAX_DELAY_SECONDS),
            jitter_fraction: retry::JITTER_FRACTION,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            ..Self::default()
        }
    }

    /// Backoff before retry number `attempt` (0-based), with jitter added
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay);
        let jitter = if self.jitter_fraction > 0.0 {
            exp.mul_f64(rand::rng().random_range(0.0..=self.jitter_fraction))
        } else {
            Duration::ZERO
        };
        (exp + jitter).min(self.max_delay)
    }

    fn wait_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after
            .map(|d| d.min(self.max_delay))
            .unwrap_or_else(|| self.backoff(attempt))
    }
}

fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Maps a non-success status to the matching error variant
pub fn status_error(status: StatusCode, url: &str) -> AppError {
    let status_code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown error");

    match status_code {
        404 => AppError::api_not_found(url),
        429 => AppError::api_rate_limit(reason, url),
        400..=499 => AppError::api_client_error(status_code, reason, url),
        502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
        _ => AppError::api_server_error(status_code, reason, url),
    }
}

/// Maps a transport failure (sending the request or reading the body).
///
/// Resets, truncated messages and body read errors count as connection
/// failures so they go through the same retry path as refused connections.
pub fn transport_error(err: reqwest::Error, url: &str) -> AppError {
    if err.is_timeout() {
        AppError::network_timeout(url)
    } else if err.is_connect() || err.is_request() || err.is_body() || err.is_decode() {
        AppError::network_connection(url, err.to_string())
    } else {
        AppError::ApiFetch(err)
    }
}

/// Classifies a body that failed to decode as `T`
fn decode_error(body: &str, err: serde_json::Error, url: &str) -> AppError {
    let trimmed = body.trim_start();
    if trimmed.is_empty() {
        AppError::api_no_data("Response body is empty", url)
    } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
        AppError::api_malformed_json("Response is not valid JSON", url)
    } else {
        AppError::api_unexpected_structure(err.to_string(), url)
    }
}

/// One request: send, check the status, read and decode the body.
/// A failure carries the server's `Retry-After` hint when it sent one.
async fn fetch_once<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    headers: &[(&str, &str)],
) -> Result<T, (AppError, Option<Duration>)> {
    let mut request = client.get(url).header(reqwest::header::ACCEPT, "application/json");
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| (transport_error(e, url), None))?;

    let status = response.status();
    if !status.is_success() {
        return Err((status_error(status, url), retry_after(&response)));
    }

    let body = response
        .text()
        .await
        .map_err(|e| (transport_error(e, url), None))?;
    debug!("Response length: {} bytes", body.len());

    serde_json::from_str::<T>(&body).map_err(|e| {
        debug!(
            "Response text (first 200 chars): {}",
            body.chars().take(200).collect::<String>()
        );
        (decode_error(&body, e, url), None)
    })
}

/// GETs `url` and decodes the JSON body as `T`.
///
/// Failures that [`AppError::is_retryable`] accepts (timeouts, connection
/// and body read failures, HTTP 429 and 5xx) are retried with the policy's
/// backoff, honoring `Retry-After`. Other failures return at once. The error
/// of the last attempt is returned on exhaustion.
#[instrument(skip(client, headers, policy))]
pub async fn fetch_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    headers: &[(&str, &str)],
    policy: &RetryPolicy,
) -> Result<T, AppError> {
    debug!("Fetching data from URL: {url}");

    let mut attempt = 0u32;
    loop {
        match fetch_once::<T>(client, url, headers).await {
            Ok(value) => return Ok(value),
            Err((err, hint)) if err.is_retryable() && attempt < policy.max_retries => {
                let wait = policy.wait_for(attempt, hint);
                warn!(
                    "{}. Retrying in {:?} (attempt {}/{})",
                    err,
                    wait,
                    attempt + 1,
                    policy.max_retries
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err((err, _)) => {
                error!("Request failed for URL {}: {}", url, err);
                return Err(err);
            }
        }
    }
}
