//! Core types for listing fetches.
//!
//! Error taxonomy for a single page request, the per-account outcome record,
//! and the run-level counters and error.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::input::InputError;

/// Failure while fetching one account's listing
///
/// `Cancelled` and `Timeout` are the fatal transport kinds: the retrier
/// returns them immediately and the listing fetcher treats them as a quiet
/// abort. Everything else surfaces to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The run's cancellation token fired.
    #[error("context canceled")]
    Cancelled,

    /// A single attempt exceeded its deadline.
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// Connection, TLS, or body transfer failure.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Any status other than 200 / 404 once retries ran out.
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    /// The page body was not a listing payload.
    #[error("failed to decode listing from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    /// True for the kinds that abort a fetch without retrying.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Timeout { .. })
    }

    /// Map a reqwest failure, keeping timeouts distinguishable.
    pub(crate) fn from_reqwest(url: &str, timeout: Duration, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout {
                url: url.to_string(),
                timeout,
            };
        }
        Self::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Result of fetching one account
///
/// Written once by the worker that owns the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOutcome {
    pub user_id: String,
    /// Matched video ids in listing order.
    pub items: Vec<String>,
    /// Terminal error, if the fetch did not finish cleanly.
    #[serde(skip)]
    pub error: Option<FetchError>,
}

impl FetchOutcome {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_inputs: u64,
    pub valid_inputs: u64,
    pub invalid_inputs: u64,
    pub fetch_ok: u64,
    pub fetch_err: u64,
}

/// Everything a run produced, independent of its final verdict
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub summary: RunSummary,
    /// Matched ids from all accounts, finished (deduped/sorted).
    pub ids: Vec<String>,
    /// One record per dispatched account, in completion order.
    pub outcomes: Vec<FetchOutcome>,
    /// Candidates that did not name an account, in arrival order.
    pub invalid_inputs: Vec<String>,
    /// Messages of every fetch error, in completion order.
    pub errors: Vec<String>,
}

/// Run-level failure, in precedence order
#[derive(Debug, Error)]
pub enum RunError {
    /// The candidate source failed; always wins.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Strict mode saw at least one invalid candidate.
    #[error("invalid input detected")]
    InvalidInput,

    /// First fetch error in completion order.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Convenience alias for Result with `FetchError`
pub type FetchResult<T> = Result<T, FetchError>;
