// Shared request spacing across concurrent callers
use nico_list::{FetchError, RequestRateLimiter};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[tokio::test(start_paused = true)]
async fn test_simultaneous_callers_are_staggered() {
    let limiter = Arc::new(RequestRateLimiter::with_interval(Duration::from_millis(100)));
    let cancel = CancellationToken::new();
    let start = Instant::now();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let limiter = Arc::clone(&limiter);
        let cancel = cancel.clone();
        handles.push(tokio::spawn(async move {
            limiter.wait(Duration::ZERO, &cancel).await.unwrap();
            start.elapsed()
        }));
    }

    let mut waited = Vec::new();
    for handle in handles {
        waited.push(handle.await.unwrap());
    }
    waited.sort();

    assert_eq!(
        waited,
        vec![
            Duration::ZERO,
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(300),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_rate_and_interval_combine() {
    // 20 rps alone would allow 50ms; the minimum interval wins.
    let limiter = RequestRateLimiter::new(20.0, Duration::from_millis(80)).unwrap();
    let cancel = CancellationToken::new();
    let start = Instant::now();

    for _ in 0..3 {
        limiter.wait(Duration::ZERO, &cancel).await.unwrap();
    }

    assert_eq!(start.elapsed(), Duration::from_millis(160));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_interrupts_queued_caller() {
    let limiter = Arc::new(RequestRateLimiter::with_interval(Duration::from_secs(60)));
    let cancel = CancellationToken::new();
    limiter.wait(Duration::ZERO, &cancel).await.unwrap();

    let queued = {
        let limiter = Arc::clone(&limiter);
        let cancel = cancel.clone();
        tokio::spawn(async move { limiter.wait(Duration::ZERO, &cancel).await })
    };

    tokio::time::sleep(Duration::from_secs(1)).await;
    cancel.cancel();

    assert_eq!(queued.await.unwrap(), Err(FetchError::Cancelled));
}
