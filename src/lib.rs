pub mod cli;
pub mod config;
pub mod fetch_engine;
pub mod finisher;
pub mod input;
pub mod output;
pub mod utils;

pub use config::{ConfigError, FetchConfig, FetchConfigBuilder};
pub use fetch_engine::{
    FetchError, FetchOrchestrator, FetchOutcome, ListingFetcher, NoOpProgress, ProgressReporter,
    RequestRateLimiter, RequestRetrier, RunError, RunReport, RunSummary, build_http_client,
};
pub use finisher::{dedupe_ids, finish_ids, sort_video_ids};
pub use input::{InputError, InputStream, UserId, collect_inputs, extract_user_id};

use std::sync::Arc;

/// Fetch every account named in `candidates` with default HTTP settings
///
/// Convenience entry for callers that have their candidates in memory and
/// need no progress rendering.
///
/// # Errors
///
/// Fails only if the HTTP client cannot be built; run-level failures come
/// back in the second element together with the full report.
pub async fn fetch_video_ids<I>(
    config: FetchConfig,
    candidates: I,
) -> reqwest::Result<(RunReport, Result<(), RunError>)>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let orchestrator = FetchOrchestrator::new(config, build_http_client()?);
    let input = InputStream::from_candidates(candidates);
    Ok(orchestrator
        .run(input, extract_user_id, Arc::new(NoOpProgress), None)
        .await)
}
