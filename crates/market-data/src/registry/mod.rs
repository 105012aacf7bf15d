//! Provider orchestration: rate limiting, timeouts and failure isolation.

mod price_source;
mod rate_limiter;

pub use price_source::{PriceSource, USD};
pub use rate_limiter::RateLimiter;
