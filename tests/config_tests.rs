//! Tests for the configuration builder

use chrono::NaiveDate;
use nico_list::config::builder::parse_date_range;
use nico_list::{ConfigError, FetchConfig};
use std::time::Duration;

#[test]
fn test_builder_defaults() {
    let config = FetchConfig::builder().build().unwrap();

    assert_eq!(config.base_url(), "https://nvapi.nicovideo.jp/v3");
    assert_eq!(config.concurrency(), 3);
    assert_eq!(config.retries(), 10);
    assert_eq!(config.request_timeout(), Duration::from_secs(10));
    assert_eq!(config.rate_limit(), 0.0);
    assert_eq!(config.min_interval(), Duration::ZERO);
    assert_eq!(config.comment_threshold(), 0);
    assert_eq!(config.date_after(), NaiveDate::from_ymd_opt(1000, 1, 1).unwrap());
    assert_eq!(config.date_before(), NaiveDate::from_ymd_opt(9999, 12, 31).unwrap());
    assert!(!config.dedupe());
    assert!(!config.strict());
    assert!(!config.best_effort());
}

#[test]
fn test_builder_sets_every_field() {
    let (after, before) = parse_date_range("20230101", "20231231").unwrap();
    let config = FetchConfig::builder()
        .base_url("http://localhost:9000/v3")
        .concurrency(8)
        .retries(2)
        .request_timeout(Duration::from_millis(750))
        .rate_limit(2.5)
        .min_interval(Duration::from_millis(100))
        .max_pages(4)
        .max_items(50)
        .comment_threshold(-1)
        .date_range(after, before)
        .dedupe(true)
        .strict(true)
        .best_effort(true)
        .build()
        .unwrap();

    assert_eq!(config.base_url(), "http://localhost:9000/v3");
    assert_eq!(config.concurrency(), 8);
    assert_eq!(config.retries(), 2);
    assert_eq!(config.request_timeout(), Duration::from_millis(750));
    assert_eq!(config.rate_limit(), 2.5);
    assert_eq!(config.min_interval(), Duration::from_millis(100));
    assert_eq!(config.max_pages(), 4);
    assert_eq!(config.max_items(), 50);
    assert_eq!(config.comment_threshold(), -1);
    assert_eq!(config.date_after(), after);
    assert_eq!(config.date_before(), before);
    assert!(config.dedupe() && config.strict() && config.best_effort());
}

#[test]
fn test_builder_rejects_inverted_range_and_bad_url() {
    let after = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let before = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let err = FetchConfig::builder().date_range(after, before).build().unwrap_err();
    assert_eq!(err, ConfigError::DateRange);
    assert_eq!(err.to_string(), "dateafter must be on or before datebefore");

    let err = FetchConfig::builder().base_url("ftp://example.com").build().unwrap_err();
    assert!(matches!(err, ConfigError::BaseUrl(_)));
}

#[test]
fn test_single_day_range_is_valid() {
    let (after, before) = parse_date_range("20240229", "20240229").unwrap();
    assert_eq!(after, before);
    assert!(parse_date_range("20230229", "20230301").is_err());
}

#[test]
fn test_config_serializes() {
    let config = FetchConfig::builder().dedupe(true).build().unwrap();
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["dedupe"], true);
    assert_eq!(json["concurrency"], 3);
}
