//! Builder for `FetchConfig`
//!
//! This module provides a fluent builder interface. Every field has a
//! default, and `build()` validates the whole set at once so callers get the
//! first violated constraint as a `ConfigError`.

use chrono::NaiveDate;
use std::time::Duration;
use tokio::sync::Semaphore;

use super::types::{ConfigError, FetchConfig};
use crate::utils::{DEFAULT_BASE_URL, DEFAULT_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RETRIES};

/// Date format accepted by `--dateafter` / `--datebefore`.
const DATE_FORMAT: &str = "%Y%m%d";

/// Parse an inclusive `YYYYMMDD` date range.
///
/// # Errors
///
/// Returns `DateAfterFormat`/`DateBeforeFormat` for unparsable input and
/// `DateRange` when `after` falls after `before`.
pub fn parse_date_range(after: &str, before: &str) -> Result<(NaiveDate, NaiveDate), ConfigError> {
    let after = NaiveDate::parse_from_str(after, DATE_FORMAT)
        .map_err(|_| ConfigError::DateAfterFormat)?;
    let before = NaiveDate::parse_from_str(before, DATE_FORMAT)
        .map_err(|_| ConfigError::DateBeforeFormat)?;
    if after > before {
        return Err(ConfigError::DateRange);
    }
    Ok((after, before))
}

fn default_date_after() -> NaiveDate {
    NaiveDate::from_ymd_opt(1000, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_date_before() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone)]
pub struct FetchConfigBuilder {
    base_url: String,
    concurrency: usize,
    retries: u32,
    request_timeout: Duration,
    rate_limit: f64,
    min_interval: Duration,
    max_pages: i64,
    max_items: i64,
    comment_threshold: i64,
    date_after: NaiveDate,
    date_before: NaiveDate,
    dedupe: bool,
    strict: bool,
    best_effort: bool,
}

impl Default for FetchConfigBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            retries: DEFAULT_RETRIES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            rate_limit: 0.0,
            min_interval: Duration::ZERO,
            max_pages: 0,
            max_items: 0,
            comment_threshold: 0,
            date_after: default_date_after(),
            date_before: default_date_before(),
            dedupe: false,
            strict: false,
            best_effort: false,
        }
    }
}

impl FetchConfig {
    /// Create a new builder with default values
    #[must_use]
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::default()
    }
}

impl FetchConfigBuilder {
    /// Set the listing API root. A trailing slash is removed.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the number of accounts fetched at once. Values above what a
    /// semaphore can hold are clamped in `build()`.
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set attempts per page request (first try included).
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the shared request rate in requests per second (0 disables).
    #[must_use]
    pub fn rate_limit(mut self, rps: f64) -> Self {
        self.rate_limit = rps;
        self
    }

    #[must_use]
    pub fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Limit pages fetched per account (0 = unbounded).
    #[must_use]
    pub fn max_pages(mut self, pages: i64) -> Self {
        self.max_pages = pages;
        self
    }

    /// Limit matched ids collected per account (0 = unbounded).
    #[must_use]
    pub fn max_items(mut self, items: i64) -> Self {
        self.max_items = items;
        self
    }

    #[must_use]
    pub fn comment_threshold(mut self, threshold: i64) -> Self {
        self.comment_threshold = threshold;
        self
    }

    /// Set the inclusive upload-date window.
    #[must_use]
    pub fn date_range(mut self, after: NaiveDate, before: NaiveDate) -> Self {
        self.date_after = after;
        self.date_before = before;
        self
    }

    #[must_use]
    pub fn dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn best_effort(mut self, best_effort: bool) -> Self {
        self.best_effort = best_effort;
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint, checked in flag order.
    pub fn build(self) -> Result<FetchConfig, ConfigError> {
        if self.concurrency < 1 {
            return Err(ConfigError::Concurrency);
        }
        if self.retries < 1 {
            return Err(ConfigError::Retries);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Timeout);
        }
        if !self.rate_limit.is_finite() || self.rate_limit < 0.0 {
            return Err(ConfigError::RateLimit);
        }
        let max_pages = u32::try_from(self.max_pages).map_err(|_| ConfigError::MaxPages)?;
        let max_items = usize::try_from(self.max_items).map_err(|_| ConfigError::MaxItems)?;
        if self.date_after > self.date_before {
            return Err(ConfigError::DateRange);
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::BaseUrl(self.base_url));
        }

        Ok(FetchConfig {
            base_url: self.base_url,
            concurrency: self.concurrency.min(Semaphore::MAX_PERMITS),
            retries: self.retries,
            request_timeout: self.request_timeout,
            rate_limit: self.rate_limit,
            min_interval: self.min_interval,
            max_pages,
            max_items,
            comment_threshold: self.comment_threshold,
            date_after: self.date_after,
            date_before: self.date_before,
            dedupe: self.dedupe,
            strict: self.strict,
            best_effort: self.best_effort,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build() {
        let config = FetchConfig::builder().build().expect("defaults are valid");
        assert_eq!(config.concurrency(), DEFAULT_CONCURRENCY);
        assert_eq!(config.retries(), DEFAULT_RETRIES);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.max_pages(), 0);
        assert_eq!(config.max_items(), 0);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cases = [
            (FetchConfig::builder().concurrency(0), ConfigError::Concurrency),
            (FetchConfig::builder().retries(0), ConfigError::Retries),
            (FetchConfig::builder().request_timeout(Duration::ZERO), ConfigError::Timeout),
            (FetchConfig::builder().rate_limit(-1.0), ConfigError::RateLimit),
            (FetchConfig::builder().rate_limit(f64::NAN), ConfigError::RateLimit),
            (FetchConfig::builder().max_pages(-1), ConfigError::MaxPages),
            (FetchConfig::builder().max_items(-1), ConfigError::MaxItems),
        ];
        for (builder, expected) in cases {
            assert_eq!(builder.build().unwrap_err(), expected);
        }
    }

    #[test]
    fn error_messages_match_flags() {
        assert_eq!(ConfigError::Concurrency.to_string(), "concurrency must be at least 1");
        assert_eq!(ConfigError::Retries.to_string(), "retries must be at least 1");
    }

    #[test]
    fn clamps_huge_concurrency() {
        let config = FetchConfig::builder()
            .concurrency(usize::MAX)
            .build()
            .expect("valid");
        assert_eq!(config.concurrency(), Semaphore::MAX_PERMITS);
    }

    #[test]
    fn trims_trailing_slash() {
        let config = FetchConfig::builder()
            .base_url("http://127.0.0.1:8080/v3/")
            .build()
            .expect("valid");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080/v3");
    }

    #[test]
    fn parses_date_range() {
        let (after, before) = parse_date_range("20240101", "20240131").expect("valid");
        assert_eq!(after, NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"));
        assert_eq!(before, NaiveDate::from_ymd_opt(2024, 1, 31).expect("date"));

        assert_eq!(parse_date_range("2024-01-01", "20240131"), Err(ConfigError::DateAfterFormat));
        assert_eq!(parse_date_range("20240101", "nope"), Err(ConfigError::DateBeforeFormat));
        assert_eq!(parse_date_range("20240201", "20240131"), Err(ConfigError::DateRange));
    }
}
