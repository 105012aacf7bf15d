//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Rate limiting configuration
//! - The CoinGecko provider
//!
//! Providers answer with typed errors. The registry's `PriceSource` is the
//! layer that decides those errors never reach the valuation pipeline.

mod capabilities;
mod traits;

pub mod coingecko;

// Re-exports
pub use capabilities::RateLimit;
pub use traits::MarketDataProvider;
