//! Minimum-interval rate limiter for outbound catalog calls.
//!
//! The provider budget is expressed as a single shared timestamp: a call
//! may only proceed once the configured interval has elapsed since the
//! previous permitted call, regardless of which worker makes it.

use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};

/// Serializes outbound calls to the provider's request budget.
///
/// The lock is held across the wait so the check-then-update sequence is
/// atomic with respect to concurrent workers; releasing it earlier would
/// let two callers observe the same timestamp and under-throttle.
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter enforcing the given minimum interval between calls.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Block until a call is permitted, then record it.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_acquire_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_second_acquire_waits() {
        let limiter = RateLimiter::new(Duration::from_millis(50));
        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(45));
    }

    #[tokio::test]
    async fn test_concurrent_acquires_serialize() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(20)));
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.acquire().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // 4 calls through a 20ms interval need at least 3 waits
        assert!(start.elapsed() >= Duration::from_millis(55));
    }

    #[tokio::test]
    async fn test_interval_elapsed_no_wait() {
        let limiter = RateLimiter::new(Duration::from_millis(10));
        limiter.acquire().await;
        sleep(Duration::from_millis(20)).await;
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(10));
    }
}
