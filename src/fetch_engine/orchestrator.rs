//! Fan-out over many accounts
//!
//! Coordinates one run with:
//! - Candidate consumption in arrival order, validated by an extractor
//! - At most `concurrency` listing fetches in flight (semaphore permits)
//! - One aggregation lock for ids, outcomes and counters
//! - One cancellation token shared by every worker
//! - Run-level verdict: input error > strict validation > best effort > first fetch error

use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::fetch_types::{FetchError, FetchOutcome, RunError, RunReport, RunSummary};
use super::listing::ListingFetcher;
use super::progress::ProgressReporter;
use super::rate_limiter::RequestRateLimiter;
use super::retrier::RequestRetrier;
use crate::config::FetchConfig;
use crate::finisher::finish_ids;
use crate::input::{InputError, InputStream, UserId};

/// Shared state written by workers
#[derive(Debug, Default)]
struct Aggregate {
    summary: RunSummary,
    ids: Vec<String>,
    outcomes: Vec<FetchOutcome>,
    invalid_inputs: Vec<String>,
    errors: Vec<String>,
    first_error: Option<FetchError>,
}

impl Aggregate {
    fn record(&mut self, outcome: FetchOutcome) {
        self.ids.extend(outcome.items.iter().cloned());
        match &outcome.error {
            Some(e) => {
                self.summary.fetch_err += 1;
                self.errors.push(e.to_string());
                if self.first_error.is_none() {
                    self.first_error = Some(e.clone());
                }
            }
            None => self.summary.fetch_ok += 1,
        }
        self.outcomes.push(outcome);
    }
}

/// Drives listing fetches across a stream of candidates
#[derive(Debug, Clone)]
pub struct FetchOrchestrator {
    config: FetchConfig,
    fetcher: ListingFetcher,
}

impl FetchOrchestrator {
    /// Build an orchestrator with its own rate limiter over `client`.
    #[must_use]
    pub fn new(config: FetchConfig, client: reqwest::Client) -> Self {
        let limiter = RequestRateLimiter::new(config.rate_limit(), config.min_interval()).map(Arc::new);
        if let Some(limiter) = &limiter {
            debug!("request spacing {:?}", limiter.interval());
        }
        let retrier = RequestRetrier::new(client, limiter, config.request_timeout(), config.retries());
        let fetcher = ListingFetcher::new(retrier, &config);
        Self { config, fetcher }
    }

    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Consume `input`, fetch every valid account, and decide the verdict
    ///
    /// The report is complete on every path, so callers can render partial
    /// results even when the verdict is an error. Cancelling `parent` stops
    /// the run like an input failure does, minus the error.
    pub async fn run<E, P>(
        &self,
        input: InputStream,
        extract: E,
        progress: Arc<P>,
        parent: Option<&CancellationToken>,
    ) -> (RunReport, Result<(), RunError>)
    where
        E: Fn(&str) -> Option<UserId>,
        P: ProgressReporter + ?Sized + 'static,
    {
        let InputStream {
            mut inputs,
            error: input_error,
            total_known,
            total,
        } = input;

        let parent = parent.cloned().unwrap_or_default();
        let cancel = parent.child_token();
        let aggregate = Arc::new(Mutex::new(Aggregate::default()));
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency()));
        let tracker = TaskTracker::new();

        progress.report_started(total_known.then_some(total));

        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let err = input_error.await.ok()?;
                error!("input collection failed: {err}");
                cancel.cancel();
                Some(err)
            })
        };

        loop {
            let candidate = tokio::select! {
                biased;
                () = parent.cancelled() => {
                    warn!("run interrupted, no further inputs consumed");
                    break;
                }
                candidate = inputs.recv() => match candidate {
                    Some(candidate) => candidate,
                    None => break,
                },
            };

            aggregate.lock().summary.total_inputs += 1;

            let Some(user_id) = extract(&candidate) else {
                warn!("invalid user ID: {candidate}");
                {
                    let mut agg = aggregate.lock();
                    agg.summary.invalid_inputs += 1;
                    agg.invalid_inputs.push(candidate);
                }
                progress.report_advanced();
                continue;
            };
            aggregate.lock().summary.valid_inputs += 1;

            if cancel.is_cancelled() {
                debug!("skipping user {user_id}: run cancelled");
                progress.report_advanced();
                continue;
            }

            let permit = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                permit = Arc::clone(&semaphore).acquire_owned() => permit.ok(),
            };
            let Some(permit) = permit else {
                debug!("skipping user {user_id}: run cancelled");
                progress.report_advanced();
                continue;
            };

            let fetcher = self.fetcher.clone();
            let cancel = cancel.clone();
            let aggregate = Arc::clone(&aggregate);
            let progress = Arc::clone(&progress);

            tracker.spawn(async move {
                let _permit = permit; // Hold until the fetch completes

                let (items, error) = fetcher.fetch_user_videos(user_id.as_str(), &cancel).await;
                if let Some(e) = &error {
                    error!("failed to get video list: user {user_id}: {e}");
                }
                aggregate.lock().record(FetchOutcome {
                    user_id: user_id.to_string(),
                    items,
                    error,
                });
                progress.report_advanced();
            });
        }

        tracker.close();
        tracker.wait().await;
        progress.report_finished();

        // The producer has finished unless the parent cut the run short.
        if parent.is_cancelled() {
            watcher.abort();
        }
        let input_error = watcher.await.ok().flatten();

        let aggregate = match Arc::try_unwrap(aggregate) {
            Ok(aggregate) => aggregate.into_inner(),
            Err(shared) => std::mem::take(&mut *shared.lock()),
        };
        info!("video list count={}", aggregate.ids.len());

        let verdict = self.verdict(input_error, &aggregate);
        let report = RunReport {
            summary: aggregate.summary,
            ids: finish_ids(aggregate.ids, self.config.dedupe()),
            outcomes: aggregate.outcomes,
            invalid_inputs: aggregate.invalid_inputs,
            errors: aggregate.errors,
        };
        (report, verdict)
    }

    fn verdict(&self, input_error: Option<InputError>, aggregate: &Aggregate) -> Result<(), RunError> {
        if let Some(e) = input_error {
            return Err(RunError::Input(e));
        }
        if self.config.strict() && aggregate.summary.invalid_inputs > 0 {
            return Err(RunError::InvalidInput);
        }
        if self.config.best_effort() {
            return Ok(());
        }
        match &aggregate.first_error {
            Some(e) => Err(RunError::Fetch(e.clone())),
            None => Ok(()),
        }
    }
}
