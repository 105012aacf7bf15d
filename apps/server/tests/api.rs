use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use mnav_core::DashboardConfig;
use mnav_market_data::{
    AssetFacts, AssetKey, MarketDataError, MarketDataProvider, RateLimit, SpotPrices,
};
use mnav_server::{api::app_router, config::Config, state_with_provider};
use rust_decimal_macros::dec;
use serde_json::Value;
use tower::ServiceExt;

const DASHBOARD: &str = r#"{
    "entities": [
        {
            "id": "alpha",
            "name": "AlphaStrategy",
            "symbol": "ALPHA",
            "entityClass": "nftBacked",
            "holdings": 10,
            "priceSourceKey": "alpha-nft",
            "tokenId": "alpha"
        },
        {
            "id": "beta",
            "name": "BetaStrategy",
            "symbol": "BETA",
            "entityClass": "nftBacked",
            "holdings": 1,
            "priceSourceKey": "beta-nft",
            "tokenId": "beta"
        },
        {
            "id": "strategy",
            "name": "Strategy",
            "symbol": "MSTR",
            "entityClass": "btcBacked",
            "holdings": 10,
            "priceSourceKey": "bitcoin",
            "marketCapUsd": 2000000
        }
    ]
}"#;

/// Serves fixed facts, or fails every request when `healthy` is false.
struct FixtureProvider {
    healthy: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl MarketDataProvider for FixtureProvider {
    fn id(&self) -> &'static str {
        "FIXTURE"
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            requests_per_minute: 6000,
            burst: 100,
            ..RateLimit::default()
        }
    }

    async fn fetch_asset_facts(&self, asset: &AssetKey) -> Result<AssetFacts, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.healthy {
            return Err(MarketDataError::RateLimited {
                provider: "FIXTURE".to_string(),
            });
        }
        let mut facts = AssetFacts::empty(asset.id(), Utc::now());
        match asset {
            AssetKey::NftCollection(id) if id == "alpha-nft" => facts.floor_price_native = Some(dec!(2)),
            AssetKey::NftCollection(_) => facts.floor_price_native = Some(dec!(1)),
            AssetKey::Coin(id) if id == "alpha" => facts.fully_diluted_valuation_usd = Some(dec!(50000)),
            AssetKey::Coin(_) => facts.fully_diluted_valuation_usd = Some(dec!(100000)),
        }
        facts.native_currency = Some("ethereum".to_string());
        Ok(facts)
    }

    async fn fetch_spot_prices(
        &self,
        _coin_ids: &[String],
        _vs_currency: &str,
    ) -> Result<SpotPrices, MarketDataError> {
        if !self.healthy {
            return Err(MarketDataError::Timeout {
                provider: "FIXTURE".to_string(),
            });
        }
        Ok([
            ("ethereum".to_string(), dec!(3000)),
            ("bitcoin".to_string(), dec!(100000)),
        ]
        .into_iter()
        .collect())
    }
}

fn app(healthy: bool) -> (Router, Arc<FixtureProvider>) {
    let provider = Arc::new(FixtureProvider {
        healthy,
        calls: AtomicUsize::new(0),
    });
    let config = Config::from_lookup(|_| None).unwrap();
    let dashboard = DashboardConfig::from_json(DASHBOARD).unwrap();
    let state = state_with_provider(dashboard, provider.clone());
    (app_router(state, &config), provider)
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn healthz_works() {
    let (app, _) = app(true);
    let response = app
        .oneshot(Request::builder().uri("/api/v1/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn strategies_sorted_with_signals() {
    let (app, _) = app(true);
    let (status, body) = send(&app, "GET", "/api/v1/strategies").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);

    // beta: cap 100000 over 1 * 1 ETH * 3000 USD
    assert_eq!(rows[0]["id"], "beta");
    assert_eq!(rows[0]["signal"], "SELL");
    assert_eq!(rows[0]["stance"], "premium");

    // alpha: cap 50000 over 10 * 2 ETH * 3000 USD
    assert_eq!(rows[1]["id"], "alpha");
    assert_eq!(rows[1]["marketValue"].as_f64(), Some(60000.0));
    assert_eq!(rows[1]["signal"], "BUY");
    assert_eq!(rows[1]["stance"], "discount");

    assert_eq!(body["summary"]["count"], 2);
    assert_eq!(body["summary"]["totalMarketCap"].as_f64(), Some(150000.0));
}

#[tokio::test]
async fn treasuries_use_btc_thresholds() {
    let (app, _) = app(true);
    let (status, body) = send(&app, "GET", "/api/v1/treasuries").await;

    assert_eq!(status, StatusCode::OK);
    let row = &body["rows"][0];
    assert_eq!(row["symbol"], "MSTR");
    assert_eq!(row["mNav"].as_f64(), Some(2.0));
    assert_eq!(row["signal"], "HOLD");
    assert_eq!(body["summary"]["categoryMnav"].as_f64(), Some(2.0));
}

#[tokio::test]
async fn dashboard_is_served_from_cache_within_ttl() {
    let (app, provider) = app(true);

    let (status, before) = send(&app, "GET", "/api/v1/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["state"], "empty");
    assert_eq!(before["status"]["state"], "idle");

    let (status, dashboard) = send(&app, "GET", "/api/v1/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["spotPrices"]["ethereum"].as_f64(), Some(3000.0));
    assert_eq!(dashboard["strategies"]["rows"].as_array().unwrap().len(), 2);
    let calls = provider.calls.load(Ordering::SeqCst);
    assert!(calls > 0);

    let (status, refreshed) = send(&app, "POST", "/api/v1/refresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed["state"], "fresh");
    assert_eq!(refreshed["ttlSeconds"], 30);
    assert_eq!(provider.calls.load(Ordering::SeqCst), calls);
}

#[tokio::test]
async fn upstream_outage_yields_absent_figures() {
    let (app, _) = app(false);
    let (status, body) = send(&app, "GET", "/api/v1/strategies").await;

    assert_eq!(status, StatusCode::OK);
    for row in body["rows"].as_array().unwrap() {
        assert!(row["mNav"].is_null());
        assert!(row["marketValue"].is_null());
        assert_eq!(row["signal"], "UNKNOWN");
        assert!(row["stance"].is_null());
    }
    assert!(body["summary"]["categoryMnav"].is_null());
}

#[tokio::test]
async fn single_entity_lookup() {
    let (app, _) = app(true);

    let (status, row) = send(&app, "GET", "/api/v1/entities/alpha").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row["name"], "AlphaStrategy");

    let (status, body) = send(&app, "GET", "/api/v1/entities/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}
