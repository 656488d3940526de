//! Fetch Engine Module
//!
//! This module contains the concurrent fetch-and-filter engine: request
//! spacing shared by all workers, retrying page requests, the per-account
//! page walker, and the orchestrator that fans out across accounts.

// Sub-modules
pub mod fetch_types;
pub mod listing;
pub mod listing_data;
pub mod orchestrator;
pub mod progress;
pub mod rate_limiter;
pub mod retrier;

// Re-export orchestration and progress types
pub use orchestrator::FetchOrchestrator;
pub use progress::{NoOpProgress, ProgressReporter};

// Re-export the building blocks for callers driving single accounts
pub use listing::{ListingFetcher, ListingFilter};
pub use listing_data::ListingPage;
pub use rate_limiter::{RequestRateLimiter, pace};
pub use retrier::{ListingResponse, RequestRetrier, backoff_delay, build_http_client, parse_retry_after};

// Re-export fetch types
pub use fetch_types::{FetchError, FetchOutcome, FetchResult, RunError, RunReport, RunSummary};
