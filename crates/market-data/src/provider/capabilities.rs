//! Rate limiting configuration for providers.

use std::time::Duration;

/// Rate limiting configuration for a provider.
///
/// Controls how aggressively we can call a provider to avoid
/// hitting their rate limits and getting blocked.
#[derive(Clone, Debug)]
pub struct RateLimit {
    /// Maximum requests allowed per minute.
    pub requests_per_minute: u32,

    /// Requests that may be issued back to back before throttling kicks in.
    pub burst: u32,

    /// Upper bound on a single request, after which it counts as a timeout.
    pub request_timeout: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            burst: 10,
            request_timeout: Duration::from_secs(10),
        }
    }
}
