//! Getter methods for `FetchConfig`
//!
//! This module provides all the accessor methods for retrieving configuration
//! values from a `FetchConfig` instance.

use chrono::NaiveDate;
use std::time::Duration;

use super::types::FetchConfig;

impl FetchConfig {
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[must_use]
    pub fn retries(&self) -> u32 {
        self.retries
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn rate_limit(&self) -> f64 {
        self.rate_limit
    }

    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Pages fetched per account at most; 0 means unbounded.
    #[must_use]
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Matched ids per account at most; 0 means unbounded.
    #[must_use]
    pub fn max_items(&self) -> usize {
        self.max_items
    }

    #[must_use]
    pub fn comment_threshold(&self) -> i64 {
        self.comment_threshold
    }

    #[must_use]
    pub fn date_after(&self) -> NaiveDate {
        self.date_after
    }

    #[must_use]
    pub fn date_before(&self) -> NaiveDate {
        self.date_before
    }

    #[must_use]
    pub fn dedupe(&self) -> bool {
        self.dedupe
    }

    #[must_use]
    pub fn strict(&self) -> bool {
        self.strict
    }

    #[must_use]
    pub fn best_effort(&self) -> bool {
        self.best_effort
    }
}
