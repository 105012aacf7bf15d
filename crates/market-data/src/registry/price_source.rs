//! Failure-isolating façade over a market data provider.
//!
//! `PriceSource` is what the valuation pipeline talks to. Every call is
//! rate limited, bounded by a timeout, and never fails: provider errors and
//! timeouts are logged and come back as absent facts, so one asset's failure
//! cannot abort the valuation of another.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use super::RateLimiter;
use crate::errors::MarketDataError;
use crate::models::{AssetFacts, AssetKey, SpotPrices};
use crate::provider::MarketDataProvider;

/// Quote currency used for every USD figure on the dashboard.
pub const USD: &str = "usd";

pub struct PriceSource {
    provider: Arc<dyn MarketDataProvider>,
    rate_limiter: RateLimiter,
    timeout: Duration,
}

impl PriceSource {
    /// Wrap a provider, sizing the rate limiter and per-fetch timeout from
    /// the provider's declared limits.
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        let limit = provider.rate_limit();
        Self {
            rate_limiter: RateLimiter::new(provider.id(), &limit),
            timeout: limit.request_timeout,
            provider,
        }
    }

    /// Override the per-fetch timeout. The timeout covers the rate limiter
    /// wait as well as the request itself.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_id(&self) -> &'static str {
        self.provider.id()
    }

    /// Current facts for an asset, or `None` if they could not be obtained.
    pub async fn fetch_asset_facts(&self, asset: &AssetKey) -> Option<AssetFacts> {
        let fetch = async {
            self.rate_limiter.acquire().await;
            self.provider.fetch_asset_facts(asset).await
        };

        match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(facts)) => {
                debug!("Fetched facts for {} from {}", asset, self.provider.id());
                Some(facts)
            }
            Ok(Err(e)) => {
                self.log_failure(&asset.to_string(), &e);
                None
            }
            Err(_) => {
                warn!(
                    "Fetch for {} from {} timed out after {:?}",
                    asset,
                    self.provider.id(),
                    self.timeout
                );
                None
            }
        }
    }

    /// USD spot prices for the given coins. Coins that could not be priced
    /// are missing from the result; a failed request yields an empty set.
    pub async fn fetch_spot_prices(&self, coin_ids: &[String]) -> SpotPrices {
        let fetch = async {
            self.rate_limiter.acquire().await;
            self.provider.fetch_spot_prices(coin_ids, USD).await
        };

        let spot = match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(spot)) => spot,
            Ok(Err(e)) => {
                self.log_failure(&format!("spot prices {:?}", coin_ids), &e);
                SpotPrices::new()
            }
            Err(_) => {
                warn!(
                    "Spot price fetch from {} timed out after {:?}",
                    self.provider.id(),
                    self.timeout
                );
                SpotPrices::new()
            }
        };

        for coin_id in coin_ids {
            if spot.get(coin_id).is_none() {
                warn!("No {} spot price available for '{}'", USD, coin_id);
            }
        }
        spot
    }

    fn log_failure(&self, what: &str, error: &MarketDataError) {
        if error.is_data_incomplete() || matches!(error, MarketDataError::NotSupported { .. }) {
            info!("{} unavailable from {}: {}", what, self.provider.id(), error);
        } else {
            warn!("Failed to fetch {} from {}: {}", what, self.provider.id(), error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::RateLimit;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    /// Provider that fails for one collection and hangs for another.
    struct ScriptedProvider;

    #[async_trait]
    impl MarketDataProvider for ScriptedProvider {
        fn id(&self) -> &'static str {
            "SCRIPTED"
        }

        fn rate_limit(&self) -> RateLimit {
            RateLimit {
                requests_per_minute: 600,
                burst: 100,
                request_timeout: Duration::from_secs(5),
            }
        }

        async fn fetch_asset_facts(&self, asset: &AssetKey) -> Result<AssetFacts, MarketDataError> {
            match asset.id() {
                "broken" => Err(MarketDataError::UpstreamUnavailable {
                    provider: "SCRIPTED".to_string(),
                    message: "HTTP 500".to_string(),
                }),
                "slow" => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(AssetFacts::empty("slow", Utc::now()))
                }
                id => {
                    let mut facts = AssetFacts::empty(id, Utc::now());
                    facts.floor_price_native = Some(dec!(2));
                    Ok(facts)
                }
            }
        }

        async fn fetch_spot_prices(
            &self,
            coin_ids: &[String],
            _vs_currency: &str,
        ) -> Result<SpotPrices, MarketDataError> {
            if coin_ids.iter().any(|c| c == "broken") {
                return Err(MarketDataError::RateLimited {
                    provider: "SCRIPTED".to_string(),
                });
            }
            Ok([("ethereum".to_string(), dec!(3000))].into_iter().collect())
        }
    }

    fn source() -> PriceSource {
        PriceSource::new(Arc::new(ScriptedProvider))
    }

    #[tokio::test]
    async fn test_success_passes_facts_through() {
        let facts = source().fetch_asset_facts(&AssetKey::nft("azuki")).await.unwrap();
        assert_eq!(facts.floor_price_native, Some(dec!(2)));
    }

    #[tokio::test]
    async fn test_provider_error_becomes_absent() {
        assert!(source().fetch_asset_facts(&AssetKey::nft("broken")).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_absent() {
        let source = source().with_timeout(Duration::from_secs(1));
        assert!(source.fetch_asset_facts(&AssetKey::nft("slow")).await.is_none());
    }

    #[tokio::test]
    async fn test_spot_prices_missing_coin_is_absent() {
        let spot = source()
            .fetch_spot_prices(&["ethereum".to_string(), "bitcoin".to_string()])
            .await;
        assert_eq!(spot.get("ethereum"), Some(dec!(3000)));
        assert_eq!(spot.get("bitcoin"), None);
    }

    #[tokio::test]
    async fn test_spot_price_failure_yields_empty_set() {
        let spot = source().fetch_spot_prices(&["broken".to_string()]).await;
        assert!(spot.is_empty());
    }
}
