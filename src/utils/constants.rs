//! Shared configuration constants for nico-list
//!
//! Default values and fixed protocol constants used throughout the codebase
//! so the CLI, the config builder and the fetch engine agree on them.

use std::time::Duration;

/// Default listing API root.
pub const DEFAULT_BASE_URL: &str = "https://nvapi.nicovideo.jp/v3";

/// Default per-attempt request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of attempts per page request.
pub const DEFAULT_RETRIES: u32 = 10;

/// Default number of accounts fetched at the same time.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Entries requested per listing page. The API caps this at 100.
pub const PAGE_SIZE: u32 = 100;

/// First backoff step; doubled after every failed attempt.
pub const BASE_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Upper bound for the exponential part of the backoff schedule.
///
/// A server-provided `Retry-After` may exceed this.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Value of the client identification header the listing API expects.
pub const FRONTEND_ID: &str = "6";

/// Header name carrying [`FRONTEND_ID`].
pub const FRONTEND_ID_HEADER: &str = "X-Frontend-Id";

/// Longest accepted input line (1 MiB).
pub const MAX_INPUT_LINE_BYTES: usize = 1024 * 1024;

/// Prefix used by `--tab` output: nine tab characters.
pub const TAB_OUTPUT_PREFIX: &str = "\t\t\t\t\t\t\t\t\t";

/// Prefix used by `--url` output.
pub const WATCH_URL_PREFIX: &str = "https://www.nicovideo.jp/watch/";

/// Length of the alphabetic part of a video id (`sm`, `so`, `nm`).
pub const VIDEO_ID_ALPHA_PREFIX_LEN: usize = 2;

/// Width the numeric tail of a video id is zero-padded to before comparing.
pub const VIDEO_ID_SORT_WIDTH: usize = 8;
