//! Minimum spacing between outbound routing requests.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default spacing between consecutive dispatches.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(500);

/// Gate that spaces out request dispatches across all concurrent callers.
///
/// The lock is held while waiting, so callers queue behind each other and
/// every dispatch is at least `min_interval` after the previous one.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: Mutex::new(None),
        }
    }

    /// Wait until a request may be dispatched, then claim the slot.
    pub async fn acquire_slot(&self) {
        let mut last = self.last_dispatch.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;

    #[tokio::test(start_paused = true)]
    async fn first_slot_is_immediate() {
        let limiter = RateLimiter::default();
        let start = Instant::now();
        limiter.acquire_slot().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_slots_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();

        for _ in 0..3 {
            limiter.acquire_slot().await;
        }

        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert!(start.elapsed() < Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_never_under_wait() {
        let limiter = RateLimiter::new(Duration::from_millis(500));

        let mut dispatches = join_all((0..5).map(|_| async {
            limiter.acquire_slot().await;
            Instant::now()
        }))
        .await;

        dispatches.sort();
        for pair in dispatches.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(500));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn no_wait_after_interval_has_passed() {
        let limiter = RateLimiter::new(Duration::from_millis(500));
        limiter.acquire_slot().await;

        tokio::time::sleep(Duration::from_millis(800)).await;

        let before = Instant::now();
        limiter.acquire_slot().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}
