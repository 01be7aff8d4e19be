//! Fixed cool-down after a server-side rate-limit signal.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// A fixed-length pause entered when the remote site answers 429.
///
/// Non-adaptive: every signal pushes the deadline to `now + duration`, with no
/// growth between consecutive signals and no jitter. The deadline never moves
/// earlier.
#[derive(Debug)]
pub(crate) struct Cooldown {
    duration: Duration,
    until: Option<Instant>,
}

impl Cooldown {
    pub(crate) fn new(duration: Duration) -> Self {
        Cooldown {
            duration,
            until: None,
        }
    }

    pub(crate) fn duration(&self) -> Duration {
        self.duration
    }

    /// Starts (or extends) the cool-down and returns its deadline.
    pub(crate) fn start(&mut self) -> Instant {
        let deadline = Instant::now() + self.duration;
        let deadline = match self.until {
            Some(current) if current > deadline => current,
            _ => deadline,
        };
        self.until = Some(deadline);
        deadline
    }

    /// Time left before requests may resume, if a cool-down is active.
    pub(crate) fn remaining(&self) -> Option<Duration> {
        let until = self.until?;
        let now = Instant::now();
        (until > now).then(|| until - now)
    }

    /// Waits out an active cool-down; returns immediately otherwise.
    pub(crate) async fn wait(&mut self) {
        if let Some(until) = self.until {
            if until > Instant::now() {
                log::info!(
                    "Cooling off for {:.1}s before the next request",
                    (until - Instant::now()).as_secs_f64()
                );
                sleep_until(until).await;
            }
            self.until = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_inactive_cooldown_does_not_wait() {
        let mut cooldown = Cooldown::new(Duration::from_secs(60));
        let start = Instant::now();
        cooldown.wait().await;
        assert_eq!(Instant::now(), start);
        assert_eq!(cooldown.remaining(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_lasts_full_duration() {
        let mut cooldown = Cooldown::new(Duration::from_secs(60));
        let start = Instant::now();
        let deadline = cooldown.start();
        assert_eq!(deadline, start + Duration::from_secs(60));
        assert_eq!(cooldown.remaining(), Some(Duration::from_secs(60)));

        cooldown.wait().await;
        assert!(Instant::now() - start >= Duration::from_secs(60));
        assert_eq!(cooldown.remaining(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_extends_but_never_grows() {
        let mut cooldown = Cooldown::new(Duration::from_secs(60));
        let start = Instant::now();
        cooldown.start();
        tokio::time::advance(Duration::from_secs(10)).await;
        let deadline = cooldown.start();
        // Second signal re-arms from "now", it does not double the pause
        assert_eq!(deadline, start + Duration::from_secs(70));
        assert_eq!(cooldown.remaining(), Some(Duration::from_secs(60)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_cooldown_reports_none() {
        let mut cooldown = Cooldown::new(Duration::from_secs(5));
        cooldown.start();
        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(cooldown.remaining(), None);
        let before = Instant::now();
        cooldown.wait().await;
        assert_eq!(Instant::now(), before);
    }
}
