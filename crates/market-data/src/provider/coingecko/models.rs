//! CoinGecko API response structures.
//!
//! Only the fields the dashboard reads are modelled; serde ignores the rest.

use std::collections::HashMap;

use serde::Deserialize;

/// Error code CoinGecko returns when an endpoint needs a paid plan.
pub(super) const PLAN_RESTRICTED_ERROR_CODE: i64 = 10005;

/// Amount quoted in several currencies (`{"native_currency": 48.2, "usd": 151000}`).
#[derive(Debug, Default, Deserialize)]
pub(super) struct CurrencyAmounts {
    pub native_currency: Option<f64>,
    pub usd: Option<f64>,
}

/// Response from /nfts/{id}
#[derive(Debug, Deserialize)]
pub(super) struct NftResponse {
    pub id: Option<String>,
    /// Coin id of the pricing unit, e.g. "ethereum"
    pub native_currency: Option<String>,
    pub floor_price: Option<CurrencyAmounts>,
    pub market_cap: Option<CurrencyAmounts>,
    pub volume_24h: Option<CurrencyAmounts>,
    pub floor_price_in_usd_24h_percentage_change: Option<f64>,
}

/// Response from /coins/{id}
#[derive(Debug, Deserialize)]
pub(super) struct CoinResponse {
    pub id: Option<String>,
    pub market_data: Option<CoinMarketData>,
}

/// `market_data` section of /coins/{id}
#[derive(Debug, Deserialize)]
pub(super) struct CoinMarketData {
    #[serde(default)]
    pub current_price: CurrencyAmounts,
    #[serde(default)]
    pub market_cap: CurrencyAmounts,
    #[serde(default)]
    pub fully_diluted_valuation: CurrencyAmounts,
    #[serde(default)]
    pub total_volume: CurrencyAmounts,
}

/// Response from /simple/price: `{"ethereum": {"usd": 3200.1}}`
pub(super) type SimplePriceResponse = HashMap<String, HashMap<String, Option<f64>>>;

/// Error envelope used by the v3 API.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelope {
    pub status: Option<ErrorStatus>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorStatus {
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}

impl ErrorEnvelope {
    /// True when the body reports a paid-plan-only endpoint.
    pub fn is_plan_restricted(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.error_code)
            .is_some_and(|code| code == PLAN_RESTRICTED_ERROR_CODE)
    }

    pub fn message(&self) -> Option<String> {
        self.status
            .as_ref()
            .and_then(|s| s.error_message.clone())
            .or_else(|| self.error.clone())
    }
}
