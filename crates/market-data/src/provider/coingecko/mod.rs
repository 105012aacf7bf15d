//! CoinGecko market data provider implementation.
//!
//! This module provides market data from the CoinGecko v3 API:
//! - Token market data via /coins/{id}
//! - NFT collection floor prices via /nfts/{id}
//! - Reference spot prices via /simple/price
//!
//! The demo tier is served from the public host and rejects some endpoints
//! (error code 10005); those refusals surface as `NotSupported`.
//! API documentation: https://docs.coingecko.com/reference/introduction

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use urlencoding::encode;

use crate::errors::MarketDataError;
use crate::models::{AssetFacts, AssetKey, SpotPrices};
use crate::provider::{MarketDataProvider, RateLimit};

use models::{CoinResponse, ErrorEnvelope, NftResponse, SimplePriceResponse};

const PUBLIC_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PRO_BASE_URL: &str = "https://pro-api.coingecko.com/api/v3";
const PROVIDER_ID: &str = "COINGECKO";

/// CoinGecko subscription tier, which selects host and auth header.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CoinGeckoTier {
    /// Public host, `x-cg-demo-api-key` header (key optional)
    #[default]
    Demo,
    /// Pro host, `x-cg-pro-api-key` header
    Pro,
}

impl CoinGeckoTier {
    fn base_url(self) -> &'static str {
        match self {
            Self::Demo => PUBLIC_BASE_URL,
            Self::Pro => PRO_BASE_URL,
        }
    }

    fn key_header(self) -> &'static str {
        match self {
            Self::Demo => "x-cg-demo-api-key",
            Self::Pro => "x-cg-pro-api-key",
        }
    }
}

impl std::str::FromStr for CoinGeckoTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" | "public" => Ok(Self::Demo),
            "pro" => Ok(Self::Pro),
            other => Err(format!("unknown CoinGecko tier '{}'", other)),
        }
    }
}

// ============================================================================
// CoinGeckoProvider
// ============================================================================

/// CoinGecko market data provider.
///
/// The public tier allows roughly 30 calls per minute.
pub struct CoinGeckoProvider {
    client: Client,
    api_key: Option<String>,
    tier: CoinGeckoTier,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Create a provider for the given tier. Without a key the public
    /// endpoints are used anonymously.
    pub fn new(api_key: Option<String>, tier: CoinGeckoTier) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            tier,
            base_url: tier.base_url().to_string(),
        }
    }

    /// Point the provider at another host (used for local mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Make a GET request to the CoinGecko API and return the raw body.
    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(key) = &self.api_key {
            request = request.header(self.tier.key_header(), key);
        }

        if !params.is_empty() {
            request = request.query(params);
        }

        debug!("CoinGecko request: {} with {} params", endpoint, params.len());

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::UpstreamUnavailable {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Request failed: {}", e),
                }
            }
        })?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error_body(endpoint, status, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MarketDataError::UpstreamUnavailable {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read response: {}", e),
            })?;

        // Plan restrictions are sometimes reported with a 200 and an error envelope
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
            if envelope.is_plan_restricted() {
                return Err(not_supported(endpoint));
            }
        }

        Ok(body)
    }

    async fn fetch_nft_facts(&self, collection_id: &str) -> Result<AssetFacts, MarketDataError> {
        let endpoint = format!("/nfts/{}", encode(collection_id));
        let body = self.fetch(&endpoint, &[]).await?;
        parse_nft_facts(collection_id, &body, Utc::now())
    }

    async fn fetch_coin_facts(&self, coin_id: &str) -> Result<AssetFacts, MarketDataError> {
        let endpoint = format!("/coins/{}", encode(coin_id));
        let params = [
            ("localization", "false"),
            ("tickers", "false"),
            ("community_data", "false"),
            ("developer_data", "false"),
            ("sparkline", "false"),
        ];
        let body = self.fetch(&endpoint, &params).await?;
        parse_coin_facts(coin_id, &body, Utc::now())
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        match self.tier {
            CoinGeckoTier::Demo => RateLimit {
                requests_per_minute: 30,
                burst: 10,
                request_timeout: Duration::from_secs(10),
            },
            CoinGeckoTier::Pro => RateLimit {
                requests_per_minute: 500,
                burst: 20,
                request_timeout: Duration::from_secs(10),
            },
        }
    }

    async fn fetch_asset_facts(&self, asset: &AssetKey) -> Result<AssetFacts, MarketDataError> {
        match asset {
            AssetKey::Coin(id) => self.fetch_coin_facts(id).await,
            AssetKey::NftCollection(id) => self.fetch_nft_facts(id).await,
        }
    }

    async fn fetch_spot_prices(
        &self,
        coin_ids: &[String],
        vs_currency: &str,
    ) -> Result<SpotPrices, MarketDataError> {
        if coin_ids.is_empty() {
            return Ok(SpotPrices::new());
        }

        let ids = coin_ids.join(",");
        let params = [("ids", ids.as_str()), ("vs_currencies", vs_currency)];
        let body = self.fetch("/simple/price", &params).await?;
        parse_spot_prices(&body, vs_currency)
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn not_supported(endpoint: &str) -> MarketDataError {
    MarketDataError::NotSupported {
        operation: endpoint.to_string(),
        provider: PROVIDER_ID.to_string(),
    }
}

/// Map a non-success response to an error, recognising plan restrictions.
fn classify_error_body(endpoint: &str, status: StatusCode, body: &str) -> MarketDataError {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if envelope.is_plan_restricted() {
            return not_supported(endpoint);
        }
        if let Some(message) = envelope.message() {
            return MarketDataError::UpstreamUnavailable {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, message),
            };
        }
    }

    MarketDataError::UpstreamUnavailable {
        provider: PROVIDER_ID.to_string(),
        message: format!("HTTP {} - {}", status, body),
    }
}

fn parse_body<T: DeserializeOwned>(asset: &str, body: &str) -> Result<T, MarketDataError> {
    serde_json::from_str(body).map_err(|e| MarketDataError::DataIncomplete {
        asset: asset.to_string(),
        message: format!("Failed to parse response: {}", e),
    })
}

/// Convert a provider float, dropping values a Decimal cannot hold.
fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    let value = value?;
    match Decimal::try_from(value) {
        Ok(d) => Some(d),
        Err(_) => {
            warn!("Ignoring unrepresentable CoinGecko value: {}", value);
            None
        }
    }
}

fn parse_nft_facts(
    collection_id: &str,
    body: &str,
    fetched_at: DateTime<Utc>,
) -> Result<AssetFacts, MarketDataError> {
    let asset = AssetKey::nft(collection_id).to_string();
    let response: NftResponse = parse_body(&asset, body)?;

    let floor = response.floor_price.ok_or_else(|| MarketDataError::DataIncomplete {
        asset: asset.clone(),
        message: "missing floor_price".to_string(),
    })?;

    let mut facts = AssetFacts::empty(
        response.id.unwrap_or_else(|| collection_id.to_string()),
        fetched_at,
    );
    facts.floor_price_native = to_decimal(floor.native_currency);
    facts.floor_price_usd = to_decimal(floor.usd);
    facts.market_cap_usd = response.market_cap.and_then(|m| to_decimal(m.usd));
    facts.volume_24h_usd = response.volume_24h.and_then(|v| to_decimal(v.usd));
    facts.floor_price_change_24h_pct =
        to_decimal(response.floor_price_in_usd_24h_percentage_change);
    facts.native_currency = response.native_currency;
    Ok(facts)
}

fn parse_coin_facts(
    coin_id: &str,
    body: &str,
    fetched_at: DateTime<Utc>,
) -> Result<AssetFacts, MarketDataError> {
    let asset = AssetKey::coin(coin_id).to_string();
    let response: CoinResponse = parse_body(&asset, body)?;

    let market_data = response.market_data.ok_or_else(|| MarketDataError::DataIncomplete {
        asset: asset.clone(),
        message: "missing market_data".to_string(),
    })?;

    let mut facts = AssetFacts::empty(
        response.id.unwrap_or_else(|| coin_id.to_string()),
        fetched_at,
    );
    facts.price_usd = to_decimal(market_data.current_price.usd);
    facts.market_cap_usd = to_decimal(market_data.market_cap.usd);
    facts.fully_diluted_valuation_usd = to_decimal(market_data.fully_diluted_valuation.usd);
    facts.volume_24h_usd = to_decimal(market_data.total_volume.usd);
    Ok(facts)
}

fn parse_spot_prices(body: &str, vs_currency: &str) -> Result<SpotPrices, MarketDataError> {
    let response: SimplePriceResponse = parse_body("simple/price", body)?;

    Ok(response
        .into_iter()
        .filter_map(|(coin_id, quotes)| {
            let price = to_decimal(quotes.get(vs_currency).copied().flatten())?;
            Some((coin_id, price))
        })
        .collect())
}
