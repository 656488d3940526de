//! Progress reporting abstraction for fetch runs
//!
//! Defines the `ProgressReporter` trait the orchestrator calls once per
//! candidate, and a no-op implementation for library callers that render
//! nothing.

/// Trait for reporting run progress
///
/// Called concurrently from every worker task, so implementations must be
/// cheap and must not block (an atomic counter, a channel send).
pub trait ProgressReporter: Send + Sync {
    /// Report that the run is about to consume candidates.
    ///
    /// `total` is `Some` only when the candidate count is known ahead of time.
    fn report_started(&self, total: Option<u64>);

    /// Report that one candidate was fully handled (skipped, invalid, or fetched).
    fn report_advanced(&self);

    /// Report that every worker has joined.
    fn report_finished(&self);
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_started(&self, _total: Option<u64>) {}

    #[inline(always)]
    fn report_advanced(&self) {}

    #[inline(always)]
    fn report_finished(&self) {}
}
