//! Rate limiter for the Amadeus API.
//!
//! The test environment allows 10 transactions per second.

use governor::{Quota, RateLimiter as GovLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Single-bucket limiter shared by token and search calls.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limiter: Arc<GovLimiter<governor::state::NotKeyed, governor::state::InMemoryState, governor::clock::DefaultClock>>,
}

impl RateLimiter {
    /// Create with a per-second limit (0 is treated as 1).
    pub fn with_limit(requests_per_sec: u32) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(requests_per_sec).unwrap_or(NonZeroU32::MIN));

        Self {
            limiter: Arc::new(GovLimiter::direct(quota)),
        }
    }

    /// Wait until a request slot is available.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_burst_then_wait_for_refill() {
        let limiter = RateLimiter::with_limit(2);
        let began = Instant::now();

        limiter.wait().await;
        limiter.wait().await;
        assert!(began.elapsed() < Duration::from_millis(200), "burst should be immediate");

        // Third slot refills after 1/2 s.
        limiter.wait().await;
        assert!(began.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_zero_limit_still_admits_one() {
        let limiter = RateLimiter::with_limit(0);
        let began = Instant::now();
        limiter.wait().await;
        assert!(began.elapsed() < Duration::from_millis(200));
    }
}
