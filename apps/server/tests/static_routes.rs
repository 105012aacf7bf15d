use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::to_bytes, body::Body, http::Request};
use mnav_core::DashboardConfig;
use mnav_market_data::{AssetFacts, AssetKey, MarketDataError, MarketDataProvider, RateLimit, SpotPrices};
use mnav_server::{api::app_router, config::Config, state_with_provider};
use tempfile::tempdir;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

/// Provider that is never reached by static routes.
struct OfflineProvider;

#[async_trait]
impl MarketDataProvider for OfflineProvider {
    fn id(&self) -> &'static str {
        "OFFLINE"
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    async fn fetch_asset_facts(&self, _asset: &AssetKey) -> Result<AssetFacts, MarketDataError> {
        Err(MarketDataError::NotSupported {
            operation: "fetch_asset_facts".to_string(),
            provider: "OFFLINE".to_string(),
        })
    }

    async fn fetch_spot_prices(
        &self,
        _coin_ids: &[String],
        _vs_currency: &str,
    ) -> Result<SpotPrices, MarketDataError> {
        Ok(SpotPrices::new())
    }
}

#[tokio::test]
async fn serves_index_html_for_unknown_route() {
    let static_dir = tempdir().unwrap();
    let index_path = static_dir.path().join("index.html");
    std::fs::write(&index_path, "<html>mNAV</html>").unwrap();

    let config = Config::from_lookup(|_| None).unwrap();
    let state = state_with_provider(DashboardConfig::default(), Arc::new(OfflineProvider));
    let static_service =
        ServeDir::new(static_dir.path()).fallback(ServeFile::new(index_path.clone()));
    let app = app_router(state, &config).fallback_service(static_service);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/tables")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body, "<html>mNAV</html>".as_bytes());
}
