//! Request spacing shared by every fetch worker
//!
//! The limiter hands out time slots: each caller reserves the earliest slot
//! that is at least `interval` after the previously reserved one (and not
//! before its own requested extra delay), then sleeps until that slot.
//! Reservation happens under a short lock; the sleep happens outside it.
//!
//! Key properties:
//! - N simultaneous callers wait `0, interval, 2*interval, ...`
//! - The sleep is cancellable through the run's `CancellationToken`
//! - A cancelled caller keeps its reserved slot; later callers queue behind it
//! - Uses `tokio::time` so tests can run against a paused clock

use log::debug;
use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use super::fetch_types::{FetchError, FetchResult};

/// Slot-based limiter enforcing a minimum spacing between requests
#[derive(Debug)]
pub struct RequestRateLimiter {
    interval: Duration,
    /// Earliest instant the next caller may be scheduled at.
    next_slot: Mutex<Option<Instant>>,
}

impl RequestRateLimiter {
    /// Build a limiter from a request rate and a minimum interval
    ///
    /// The effective interval is `max(1 / rate, min_interval)`, where a zero
    /// rate or zero interval contributes nothing. Returns `None` when the
    /// effective interval is zero: callers treat a missing limiter as "no
    /// spacing".
    #[must_use]
    pub fn new(rate_rps: f64, min_interval: Duration) -> Option<Self> {
        let from_rate = if rate_rps > 0.0 && rate_rps.is_finite() {
            Duration::from_secs_f64(1.0 / rate_rps)
        } else {
            Duration::ZERO
        };
        let interval = from_rate.max(min_interval);
        if interval.is_zero() {
            return None;
        }
        Some(Self::with_interval(interval))
    }

    /// Build a limiter with an explicit spacing.
    #[must_use]
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Reserve the next slot and sleep until it
    ///
    /// `extra_delay` pushes this caller's slot to at least `now + extra_delay`
    /// (used for backoff and `Retry-After`).
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Cancelled` as soon as `cancel` fires while
    /// waiting. The reserved slot is not returned.
    pub async fn wait(&self, extra_delay: Duration, cancel: &CancellationToken) -> FetchResult<()> {
        let slot = self.reserve(extra_delay);
        sleep_until_or_cancel(slot, cancel).await
    }

    fn reserve(&self, extra_delay: Duration) -> Instant {
        let earliest = Instant::now() + extra_delay;
        let mut next_slot = self.next_slot.lock();
        let slot = match *next_slot {
            Some(next) if next > earliest => next,
            _ => earliest,
        };
        *next_slot = Some(slot + self.interval);
        slot
    }
}

/// Wait for the limiter if there is one, otherwise only for `extra_delay`.
///
/// `extra_delay` delays the shared slot as well, so it is reserved for
/// server-requested waits. Per-worker backoff is slept off before calling this.
///
/// # Errors
///
/// Returns `FetchError::Cancelled` when `cancel` fires first.
pub async fn pace(
    limiter: Option<&RequestRateLimiter>,
    extra_delay: Duration,
    cancel: &CancellationToken,
) -> FetchResult<()> {
    match limiter {
        Some(limiter) => limiter.wait(extra_delay, cancel).await,
        None if extra_delay.is_zero() => {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }
            Ok(())
        }
        None => sleep_until_or_cancel(Instant::now() + extra_delay, cancel).await,
    }
}

/// Sleep until `deadline`, bailing out early on cancellation.
pub(crate) async fn sleep_until_or_cancel(
    deadline: Instant,
    cancel: &CancellationToken,
) -> FetchResult<()> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            debug!("sleep interrupted by cancellation");
            Err(FetchError::Cancelled)
        }
        () = sleep_until(deadline) => Ok(()),
    }
}
