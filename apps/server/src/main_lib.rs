use std::sync::Arc;

use crate::config::Config;
use mnav_core::{DashboardConfig, RefreshCache, ValuationPipeline};
use mnav_market_data::{CoinGeckoProvider, MarketDataProvider, PriceSource};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub cache: RefreshCache,
    pub dashboard: Arc<DashboardConfig>,
}

pub fn init_tracing() {
    let log_format = std::env::var("MNAV_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let mut dashboard = DashboardConfig::load(config.config_path.as_deref())?;
    if let Some(ttl_secs) = config.ttl_secs {
        dashboard.ttl_seconds = ttl_secs;
        dashboard.validate()?;
    }

    let mut provider =
        CoinGeckoProvider::new(config.coingecko_api_key.clone(), config.coingecko_tier);
    if let Some(base_url) = &config.coingecko_base_url {
        provider = provider.with_base_url(base_url.as_str());
    }
    tracing::info!(
        "Tracking {} entities via CoinGecko ({:?}, api key {}), ttl {}s",
        dashboard.entities.len(),
        config.coingecko_tier,
        if config.coingecko_api_key.is_some() { "set" } else { "not set" },
        dashboard.ttl_seconds
    );

    Ok(state_with_provider(dashboard, Arc::new(provider)))
}

/// Wires the refresh cache over an arbitrary provider.
pub fn state_with_provider(
    dashboard: DashboardConfig,
    provider: Arc<dyn MarketDataProvider>,
) -> Arc<AppState> {
    let dashboard = Arc::new(dashboard);
    let source = Arc::new(PriceSource::new(provider).with_timeout(dashboard.fetch_timeout()));
    let pipeline = ValuationPipeline::new(source, Arc::clone(&dashboard));
    let cache = RefreshCache::new(Arc::new(pipeline), dashboard.ttl());
    Arc::new(AppState { cache, dashboard })
}
