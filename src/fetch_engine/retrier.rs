//! One logical GET with bounded retries
//!
//! Before a retry the worker sleeps off its own backoff privately. Only a
//! 429 `Retry-After` is handed to the shared rate limiter as extra delay, so
//! one failing account never pushes back the request slots of the others.
//! The request then runs under a hard deadline that covers both the send and
//! the body read.
//!
//! Attempt classification:
//! - cancellation or deadline: returned immediately, never retried
//! - other transport failure: retried
//! - 200 / 404: returned to the caller
//! - 429: retried, honoring `Retry-After`
//! - any other status: retried
//!
//! Responses are consumed or dropped inside the attempt that produced them,
//! so no connection outlives its attempt.

use log::{debug, warn};
use reqwest::header::{ACCEPT, HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::fetch_types::{FetchError, FetchResult};
use super::rate_limiter::{RequestRateLimiter, pace, sleep_until_or_cancel};
use crate::utils::{BASE_RETRY_DELAY, FRONTEND_ID, FRONTEND_ID_HEADER, MAX_RETRY_DELAY};

/// Build the HTTP client shared by every worker of a run.
///
/// # Errors
///
/// Fails only if the TLS backend cannot be initialised.
pub fn build_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("nico-list/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// A terminal response: 200 with its body, or 404 with an empty one
#[derive(Debug, Clone)]
pub struct ListingResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ListingResponse {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }
}

enum Attempt {
    Done(ListingResponse),
    Fatal(FetchError),
    Retry {
        error: FetchError,
        retry_after: Duration,
    },
}

/// GET with retries, backoff and shared request spacing
#[derive(Debug, Clone)]
pub struct RequestRetrier {
    client: Client,
    limiter: Option<Arc<RequestRateLimiter>>,
    timeout: Duration,
    max_attempts: u32,
}

impl RequestRetrier {
    #[must_use]
    pub fn new(
        client: Client,
        limiter: Option<Arc<RequestRateLimiter>>,
        timeout: Duration,
        max_attempts: u32,
    ) -> Self {
        Self {
            client,
            limiter,
            timeout,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Fetch `url` until it yields 200/404, a fatal error, or attempts run out
    ///
    /// # Errors
    ///
    /// - `Cancelled` / `Timeout` straight away when the run is cancelled or an
    ///   attempt misses its deadline
    /// - the last attempt's error once every attempt failed
    pub async fn get(&self, url: &str, cancel: &CancellationToken) -> FetchResult<ListingResponse> {
        let mut delay = Duration::ZERO;
        let mut retry_after = Duration::ZERO;
        let mut last_error = FetchError::Cancelled;

        for attempt in 1..=self.max_attempts {
            // The Retry-After share of the delay is served by the limiter.
            let private = delay.saturating_sub(retry_after);
            if !private.is_zero() {
                sleep_until_or_cancel(Instant::now() + private, cancel).await?;
            }
            pace(self.limiter.as_deref(), retry_after, cancel).await?;

            match self.attempt(url, cancel).await {
                Attempt::Done(response) => return Ok(response),
                Attempt::Fatal(error) => return Err(error),
                Attempt::Retry {
                    error,
                    retry_after: hint,
                } => {
                    retry_after = hint;
                    delay = backoff_delay(attempt, hint);
                    debug!(
                        "attempt {attempt}/{} for {url} failed: {error}; next try in {delay:?}",
                        self.max_attempts
                    );
                    last_error = error;
                }
            }
        }

        Err(last_error)
    }

    async fn attempt(&self, url: &str, cancel: &CancellationToken) -> Attempt {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Attempt::Fatal(FetchError::Cancelled),
            outcome = tokio::time::timeout(self.timeout, self.send(url)) => match outcome {
                Ok(attempt) => attempt,
                Err(_) => Attempt::Fatal(FetchError::Timeout {
                    url: url.to_string(),
                    timeout: self.timeout,
                }),
            },
        }
    }

    async fn send(&self, url: &str) -> Attempt {
        let request = self
            .client
            .get(url)
            .header(FRONTEND_ID_HEADER, FRONTEND_ID)
            .header(ACCEPT, "*/*");

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return classify_transport(url, self.timeout, &e),
        };

        match response.status() {
            StatusCode::OK => match response.bytes().await {
                Ok(body) => Attempt::Done(ListingResponse {
                    status: StatusCode::OK,
                    body: body.to_vec(),
                }),
                Err(e) => classify_transport(url, self.timeout, &e),
            },
            StatusCode::NOT_FOUND => Attempt::Done(ListingResponse {
                status: StatusCode::NOT_FOUND,
                body: Vec::new(),
            }),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = retry_after_delay(response.headers(), SystemTime::now());
                warn!("throttled by {url}, retry-after {retry_after:?}");
                Attempt::Retry {
                    error: FetchError::Status {
                        url: url.to_string(),
                        status: StatusCode::TOO_MANY_REQUESTS.as_u16(),
                    },
                    retry_after,
                }
            }
            status => Attempt::Retry {
                error: FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                },
                retry_after: Duration::ZERO,
            },
        }
    }
}

fn classify_transport(url: &str, timeout: Duration, err: &reqwest::Error) -> Attempt {
    let error = FetchError::from_reqwest(url, timeout, err);
    if error.is_cancellation() {
        return Attempt::Fatal(error);
    }
    Attempt::Retry {
        error,
        retry_after: Duration::ZERO,
    }
}

/// Delay before attempt `attempt + 1`
///
/// `max(retry_after, min(BASE * 2^(attempt-1), MAX))`.
#[must_use]
pub fn backoff_delay(attempt: u32, retry_after: Duration) -> Duration {
    let factor = 1u32
        .checked_shl(attempt.saturating_sub(1))
        .unwrap_or(u32::MAX);
    let exponential = BASE_RETRY_DELAY.saturating_mul(factor).min(MAX_RETRY_DELAY);
    exponential.max(retry_after)
}

/// Extract the `Retry-After` delay from response headers.
#[must_use]
pub fn retry_after_delay(headers: &HeaderMap, now: SystemTime) -> Duration {
    let value = headers.get(RETRY_AFTER).and_then(|v| v.to_str().ok());
    parse_retry_after(value, now)
}

/// Parse a `Retry-After` value (delta seconds or HTTP date)
///
/// Malformed, zero, negative or past values yield `Duration::ZERO`.
#[must_use]
pub fn parse_retry_after(value: Option<&str>, now: SystemTime) -> Duration {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Duration::ZERO;
    };
    if let Ok(seconds) = value.parse::<i64>() {
        return u64::try_from(seconds)
            .map(Duration::from_secs)
            .unwrap_or(Duration::ZERO);
    }
    match httpdate::parse_http_date(value) {
        Ok(when) => when.duration_since(now).unwrap_or(Duration::ZERO),
        Err(_) => Duration::ZERO,
    }
}
