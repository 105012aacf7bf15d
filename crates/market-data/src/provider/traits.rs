//! Market data provider trait definitions.
//!
//! This module defines the core `MarketDataProvider` trait that all
//! market data providers must implement.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{AssetFacts, AssetKey, SpotPrices};

use super::capabilities::RateLimit;

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
/// Providers report failures as typed errors; turning those into absent
/// facts is the job of [`PriceSource`](crate::registry::PriceSource).
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use mnav_market_data::provider::{MarketDataProvider, RateLimit};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn rate_limit(&self) -> RateLimit {
///         RateLimit::default()
///     }
///
///     // ... implement fetch methods
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "COINGECKO".
    /// Used for logging and rate limiter configuration.
    fn id(&self) -> &'static str;

    /// Rate limiting configuration.
    ///
    /// Returns the rate limits that should be applied when
    /// calling this provider.
    fn rate_limit(&self) -> RateLimit;

    /// Fetch the current facts for a coin or an NFT collection.
    ///
    /// # Arguments
    ///
    /// * `asset` - The asset to look up
    ///
    /// # Returns
    ///
    /// The facts on success. Fields the provider did not report are `None`;
    /// an error means the asset could not be looked up at all.
    async fn fetch_asset_facts(&self, asset: &AssetKey) -> Result<AssetFacts, MarketDataError>;

    /// Fetch spot prices for several coins in a single request.
    ///
    /// # Arguments
    ///
    /// * `coin_ids` - Provider coin ids (e.g. "ethereum", "bitcoin")
    /// * `vs_currency` - Quote currency (e.g. "usd")
    ///
    /// Coins the provider does not know are simply missing from the result.
    async fn fetch_spot_prices(
        &self,
        coin_ids: &[String],
        vs_currency: &str,
    ) -> Result<SpotPrices, MarketDataError>;
}
