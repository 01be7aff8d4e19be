//! Pacing policies: a fixed-interval ticker and a sliding-window bucket.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};
use tokio::time::{interval_at, sleep_until, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Serializes requests at one permit per `period`.
///
/// The first permit is granted one period after construction, so any half-open
/// span of `quota * period` contains at most `quota` permits. Missed ticks
/// (e.g. during a cool-down) are not replayed as a burst.
pub(crate) struct TickerPacer {
    interval: Interval,
}

impl TickerPacer {
    pub(crate) fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        TickerPacer { interval }
    }

    pub(crate) fn period(&self) -> Duration {
        self.interval.period()
    }

    pub(crate) async fn acquire(&mut self) {
        self.interval.tick().await;
    }
}

/// Grants at most `quota` permits in any span of `window`.
///
/// Starts full. Every granted permit is handed back to the bucket exactly
/// `window` after it was taken, so the budget slides with the requests instead
/// of resetting at fixed boundaries. Callers that find it empty wait on the
/// semaphore until the oldest grant expires instead of polling.
pub(crate) struct BucketPacer {
    permits: Arc<Semaphore>,
    grants: mpsc::UnboundedSender<Instant>,
    quota: usize,
    shutdown: CancellationToken,
}

impl BucketPacer {
    /// Creates the bucket and spawns its refill task. Must be called inside a
    /// Tokio runtime.
    pub(crate) fn start(quota: usize, window: Duration) -> Self {
        let permits = Arc::new(Semaphore::new(quota));
        let shutdown = CancellationToken::new();
        let (grants, mut granted_at) = mpsc::unbounded_channel::<Instant>();

        let refill_permits = Arc::clone(&permits);
        let refill_shutdown = shutdown.clone();
        tokio::spawn(async move {
            // Grants arrive in order and share one window, so returning them
            // FIFO keeps every permit out of the bucket for exactly `window`.
            loop {
                let granted = tokio::select! {
                    granted = granted_at.recv() => granted,
                    _ = refill_shutdown.cancelled() => None,
                };
                let Some(granted) = granted else { break };
                tokio::select! {
                    _ = sleep_until(granted + window) => refill_permits.add_permits(1),
                    _ = refill_shutdown.cancelled() => break,
                }
            }
            log::debug!("Rate budget refill task shutting down");
        });

        BucketPacer {
            permits,
            grants,
            quota,
            shutdown,
        }
    }

    pub(crate) fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub(crate) async fn acquire(&self) {
        if self.permits.available_permits() == 0 {
            log::debug!(
                "Rate budget of {} requests spent; waiting for the oldest to expire",
                self.quota
            );
        }
        match self.permits.acquire().await {
            // Consumed permits come back only through the refill task
            Ok(permit) => {
                permit.forget();
                if self.grants.send(Instant::now()).is_err() {
                    log::debug!("Rate budget refill task has stopped; permit not returned");
                }
            }
            Err(_) => log::warn!("Rate budget closed; request proceeds unpaced"),
        }
    }

    pub(crate) fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for BucketPacer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn test_ticker_first_permit_after_one_period() {
        let mut ticker = TickerPacer::new(Duration::from_secs(3));
        let start = Instant::now();
        ticker.acquire().await;
        assert_eq!(Instant::now() - start, Duration::from_secs(3));
        ticker.acquire().await;
        assert_eq!(Instant::now() - start, Duration::from_secs(6));
        assert_eq!(ticker.period(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_does_not_burst_after_idle() {
        let mut ticker = TickerPacer::new(Duration::from_secs(1));
        ticker.acquire().await;
        tokio::time::advance(Duration::from_secs(10)).await;

        // One overdue tick fires immediately, the next waits a full period
        ticker.acquire().await;
        let after_missed = Instant::now();
        ticker.acquire().await;
        assert_eq!(Instant::now() - after_missed, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bucket_starts_full_then_blocks() {
        let bucket = BucketPacer::start(3, Duration::from_secs(60));
        for _ in 0..3 {
            timeout(Duration::from_millis(1), bucket.acquire())
                .await
                .expect("initial budget is available immediately");
        }
        assert_eq!(bucket.available(), 0);
        assert!(
            timeout(Duration::from_secs(59), bucket.acquire())
                .await
                .is_err(),
            "exhausted bucket must wait for the refill"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_bucket_returns_each_permit_one_window_after_grant() {
        let bucket = BucketPacer::start(2, Duration::from_secs(60));
        bucket.acquire().await;
        tokio::time::sleep(Duration::from_secs(20)).await;
        bucket.acquire().await;
        assert_eq!(bucket.available(), 0);

        // First grant expires at 60s, the second only at 80s
        tokio::time::sleep(Duration::from_secs(41)).await;
        assert_eq!(bucket.available(), 1);
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(bucket.available(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bucket_refills_to_quota_only() {
        let bucket = BucketPacer::start(4, Duration::from_secs(60));
        bucket.acquire().await;
        assert_eq!(bucket.available(), 3);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(bucket.available(), 4);

        // Unused windows never accumulate beyond the quota
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(bucket.available(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bucket_shutdown_stops_refill() {
        let bucket = BucketPacer::start(1, Duration::from_secs(10));
        bucket.acquire().await;
        bucket.shutdown();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(bucket.available(), 0);
    }
}
