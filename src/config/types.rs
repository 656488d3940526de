//! Core configuration types for listing fetches
//!
//! This module contains the `FetchConfig` struct that carries every value the
//! fetch engine consumes, plus the error raised when a value is out of range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Main configuration struct for a fetch run
///
/// Built through [`FetchConfig::builder`]; every instance has passed
/// validation, so the engine never re-checks these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Listing API root, without trailing slash.
    pub(crate) base_url: String,

    /// Maximum number of accounts fetched at the same time (>= 1).
    pub(crate) concurrency: usize,

    /// Attempts per page request (>= 1).
    pub(crate) retries: u32,

    /// Hard deadline for a single attempt, covering send and body read.
    pub(crate) request_timeout: Duration,

    /// Requests per second shared by all workers. 0 disables.
    pub(crate) rate_limit: f64,

    /// Minimum spacing between two requests. Zero disables.
    pub(crate) min_interval: Duration,

    /// Pages fetched per account at most. 0 means unbounded.
    pub(crate) max_pages: u32,

    /// Matched ids collected per account at most. 0 means unbounded.
    pub(crate) max_items: usize,

    /// Entries need strictly more comments than this to match.
    pub(crate) comment_threshold: i64,

    /// First upload day included (UTC).
    pub(crate) date_after: NaiveDate,

    /// Last upload day included (UTC).
    pub(crate) date_before: NaiveDate,

    /// Drop repeated ids from the final list.
    pub(crate) dedupe: bool,

    /// Fail the run when any candidate was not a valid account reference.
    pub(crate) strict: bool,

    /// Report success even if some fetches failed.
    pub(crate) best_effort: bool,
}

/// Rejected configuration value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("concurrency must be at least 1")]
    Concurrency,

    #[error("retries must be at least 1")]
    Retries,

    #[error("timeout must be greater than 0")]
    Timeout,

    #[error("rate-limit must be at least 0")]
    RateLimit,

    #[error("max-pages must be at least 0")]
    MaxPages,

    #[error("max-videos must be at least 0")]
    MaxItems,

    #[error("dateafter format error")]
    DateAfterFormat,

    #[error("datebefore format error")]
    DateBeforeFormat,

    #[error("dateafter must be on or before datebefore")]
    DateRange,

    #[error("invalid base url: {0}")]
    BaseUrl(String),
}
