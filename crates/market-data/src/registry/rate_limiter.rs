//! Token bucket rate limiter for a market data provider.
//!
//! One bucket per provider: `capacity` requests may go out back to back,
//! after which requests are paced at the provider's per-minute allowance.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use tokio::time::Instant;

use crate::provider::RateLimit;

/// Token bucket state.
#[derive(Debug)]
struct TokenBucket {
    /// Current number of available tokens.
    tokens: f64,
    /// Last time the bucket was refilled.
    last_update: Instant,
    /// Token refill rate (tokens per second).
    rate: f64,
    /// Maximum bucket capacity.
    capacity: f64,
}

impl TokenBucket {
    fn new(requests_per_minute: u32, capacity: u32) -> Self {
        let capacity = f64::from(capacity.max(1));
        Self {
            tokens: capacity,
            last_update: Instant::now(),
            rate: f64::from(requests_per_minute.max(1)) / 60.0,
            capacity,
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_update = now;
    }

    /// Take a token, or report how long until one is available.
    fn take(&mut self) -> Result<(), Duration> {
        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let seconds_needed = (1.0 - self.tokens) / self.rate;
            Err(Duration::from_secs_f64(seconds_needed))
        }
    }
}

/// Thread-safe token bucket limiter for a single provider.
pub struct RateLimiter {
    name: &'static str,
    bucket: Mutex<TokenBucket>,
}

impl RateLimiter {
    /// Create a limiter sized from the provider's declared limits.
    pub fn new(name: &'static str, limit: &RateLimit) -> Self {
        Self {
            name,
            bucket: Mutex::new(TokenBucket::new(limit.requests_per_minute, limit.burst)),
        }
    }

    /// Lock the bucket, recovering from poison if necessary.
    ///
    /// A poisoned bucket only means slightly wrong pacing.
    fn lock_bucket(&self) -> MutexGuard<'_, TokenBucket> {
        self.bucket.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter mutex for '{}' was poisoned, recovering", self.name);
            poisoned.into_inner()
        })
    }

    /// Wait (asynchronously) until a request may be sent.
    pub async fn acquire(&self) {
        loop {
            let wait_time = match self.lock_bucket().take() {
                Ok(()) => return,
                Err(wait) => wait,
            };

            debug!("Rate limiter: waiting {:?} for provider '{}'", wait_time, self.name);
            tokio::time::sleep(wait_time).await;
        }
    }
}
