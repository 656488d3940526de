//! Command-line surface of the `nico-list` binary
//!
//! Flags are parsed with clap, then folded into a validated `FetchConfig`.
//! Range checks live in the config builder so the messages stay the same
//! for library callers.

pub mod logging;
pub mod progress;

pub use logging::init_logging;
pub use progress::CounterProgress;

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{ConfigError, FetchConfig, builder::parse_date_range};
use crate::utils::{DEFAULT_BASE_URL, parse_duration};

/// Flags of the `nico-list` binary
#[derive(Parser, Debug, Clone)]
#[command(name = "nico-list", version)]
#[command(about = "Collect video ids from niconico user listings, filtered by comments and upload date")]
pub struct Cli {
    /// User ids or profile URLs (e.g. https://www.nicovideo.jp/user/12345/video)
    pub inputs: Vec<String>,

    /// Lower comment limit: videos need strictly more comments than this
    #[arg(short = 'c', long = "comment", value_name = "NUMBER", default_value_t = 0, allow_negative_numbers = true)]
    pub comment: i64,

    /// First upload date included
    #[arg(short = 'a', long = "dateafter", value_name = "YYYYMMDD", default_value = "10000101")]
    pub date_after: String,

    /// Last upload date included
    #[arg(short = 'b', long = "datebefore", value_name = "YYYYMMDD", default_value = "99991231")]
    pub date_before: String,

    /// Prefix each output id with tab characters
    #[arg(short = 't', long = "tab")]
    pub tab: bool,

    /// Prefix each output id with the watch URL
    #[arg(short = 'u', long = "url")]
    pub url: bool,

    /// Number of accounts fetched concurrently
    #[arg(short = 'n', long = "concurrency", default_value_t = 3, allow_negative_numbers = true)]
    pub concurrency: i64,

    /// Per-request timeout (e.g. 10s, 500ms)
    #[arg(long = "timeout", value_name = "DURATION", default_value = "10s", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Attempts per page request
    #[arg(long = "retries", default_value_t = 10, allow_negative_numbers = true)]
    pub retries: i64,

    /// Maximum requests per second across all workers (0 disables)
    #[arg(long = "rate-limit", value_name = "RPS", default_value_t = 0.0, allow_negative_numbers = true)]
    pub rate_limit: f64,

    /// Minimum interval between requests (0 disables)
    #[arg(long = "min-interval", value_name = "DURATION", default_value = "0", value_parser = parse_min_interval, allow_hyphen_values = true)]
    pub min_interval: Duration,

    /// Maximum pages fetched per account (0 disables)
    #[arg(long = "max-pages", default_value_t = 0, allow_negative_numbers = true)]
    pub max_pages: i64,

    /// Maximum matched ids collected per account (0 disables)
    #[arg(long = "max-videos", default_value_t = 0, allow_negative_numbers = true)]
    pub max_videos: i64,

    /// Read newline-separated inputs from a file
    #[arg(long = "input-file", value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    /// Read newline-separated inputs from stdin
    #[arg(long = "stdin")]
    pub stdin: bool,

    /// Append log lines to this file instead of stderr
    #[arg(long = "logfile", value_name = "PATH")]
    pub logfile: Option<PathBuf>,

    /// Force progress output even when stderr is not a terminal
    #[arg(long = "progress")]
    pub progress: bool,

    /// Disable progress output
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Exit non-zero if any input is invalid
    #[arg(long = "strict")]
    pub strict: bool,

    /// Exit 0 even if fetches failed (errors are still logged)
    #[arg(long = "best-effort")]
    pub best_effort: bool,

    /// Remove duplicate output ids before sorting
    #[arg(long = "dedupe")]
    pub dedupe: bool,

    /// Emit JSON to stdout
    #[arg(long = "json")]
    pub json: bool,

    /// Listing API root
    #[arg(long = "base-url", value_name = "URL", default_value = DEFAULT_BASE_URL, hide = true)]
    pub base_url: String,
}

impl Cli {
    /// Fold the flags into a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the first flag that is out of range or malformed.
    pub fn fetch_config(&self) -> Result<FetchConfig, ConfigError> {
        let (after, before) = parse_date_range(&self.date_after, &self.date_before)?;
        FetchConfig::builder()
            .base_url(self.base_url.as_str())
            .concurrency(usize::try_from(self.concurrency.max(0)).unwrap_or(usize::MAX))
            .retries(u32::try_from(self.retries.max(0)).unwrap_or(u32::MAX))
            .request_timeout(self.timeout)
            .rate_limit(self.rate_limit)
            .min_interval(self.min_interval)
            .max_pages(self.max_pages)
            .max_items(self.max_videos)
            .comment_threshold(self.comment)
            .date_range(after, before)
            .dedupe(self.dedupe)
            .strict(self.strict)
            .best_effort(self.best_effort)
            .build()
    }

    /// Whether to render progress, given whether stderr is a terminal.
    #[must_use]
    pub fn progress_visible(&self, stderr_is_terminal: bool) -> bool {
        if self.no_progress {
            return false;
        }
        self.progress || stderr_is_terminal
    }
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    match parse_duration(value) {
        Ok(d) if d.is_zero() => Err(ConfigError::Timeout.to_string()),
        Ok(d) => Ok(d),
        Err(_) if value.trim_start().starts_with('-') => Err(ConfigError::Timeout.to_string()),
        Err(e) => Err(e),
    }
}

fn parse_min_interval(value: &str) -> Result<Duration, String> {
    if value.trim_start().starts_with('-') {
        return Err("min-interval must be at least 0".to_string());
    }
    parse_duration(value)
}
