use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw snapshot of one priced thing, as reported by a provider.
///
/// Every numeric field is optional: providers routinely omit fields, and a
/// missing value must stay missing rather than becoming zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFacts {
    /// Provider id of the asset
    pub id: String,

    /// Floor price in the collection's native unit (NFT collections only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_price_native: Option<Decimal>,

    /// Floor price in USD (NFT collections only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_price_usd: Option<Decimal>,

    /// Current unit price in USD (coins only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<Decimal>,

    /// Market capitalization in USD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap_usd: Option<Decimal>,

    /// Fully diluted valuation in USD (coins only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_diluted_valuation_usd: Option<Decimal>,

    /// 24h traded volume in USD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_24h_usd: Option<Decimal>,

    /// 24h change of the USD floor price, in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_price_change_24h_pct: Option<Decimal>,

    /// Coin id of the native pricing unit (e.g. "ethereum")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_currency: Option<String>,

    /// When the provider answered
    pub fetched_at: DateTime<Utc>,
}

impl AssetFacts {
    /// Create facts with every optional field absent.
    pub fn empty(id: impl Into<String>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            floor_price_native: None,
            floor_price_usd: None,
            price_usd: None,
            market_cap_usd: None,
            fully_diluted_valuation_usd: None,
            volume_24h_usd: None,
            floor_price_change_24h_pct: None,
            native_currency: None,
            fetched_at,
        }
    }

    /// Market capitalization the dashboard uses for a token: the fully
    /// diluted valuation when reported, otherwise the circulating market cap.
    /// The provider reports unknown valuations as zero, so zero is absent.
    pub fn diluted_market_cap_usd(&self) -> Option<Decimal> {
        self.fully_diluted_valuation_usd
            .filter(|v| !v.is_zero())
            .or(self.market_cap_usd.filter(|v| !v.is_zero()))
    }
}

/// USD spot prices for reference coins, keyed by coin id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotPrices {
    prices: HashMap<String, Decimal>,
}

impl SpotPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, coin_id: impl Into<String>, price_usd: Decimal) {
        self.prices.insert(coin_id.into(), price_usd);
    }

    /// USD price of a coin, absent when the provider did not report it.
    pub fn get(&self, coin_id: &str) -> Option<Decimal> {
        self.prices.get(coin_id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for SpotPrices {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}
