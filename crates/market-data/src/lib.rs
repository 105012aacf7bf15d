//! mNAV Market Data Crate
//!
//! Provider-agnostic fetching of token and NFT collection facts for the
//! mNAV tracker.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |  Valuation core  |  (asks for AssetKey facts)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   PriceSource    |  (rate limit, timeout, error -> absence)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |    Provider      |  (CoinGecko)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   AssetFacts     |  (optional floor, price, market cap, FDV)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`AssetKey`] - Coin or NFT collection identifier
//! - [`AssetFacts`] - Raw facts reported for one asset
//! - [`SpotPrices`] - USD prices of reference coins
//! - [`PriceSource`] - The never-failing façade used by the pipeline

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use errors::MarketDataError;
pub use models::{AssetFacts, AssetKey, SpotPrices};
pub use provider::coingecko::{CoinGeckoProvider, CoinGeckoTier};
pub use provider::{MarketDataProvider, RateLimit};
pub use registry::{PriceSource, RateLimiter};
