use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use mnav_market_data::CoinGeckoTier;

pub struct Config {
    pub listen_addr: SocketAddr,
    /// Dashboard configuration file; the built-in entity list when unset.
    pub config_path: Option<PathBuf>,
    /// Overrides `ttlSeconds` from the dashboard configuration.
    pub ttl_secs: Option<u64>,
    pub coingecko_api_key: Option<String>,
    pub coingecko_tier: CoinGeckoTier,
    pub coingecko_base_url: Option<String>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let listen_addr: SocketAddr = var("MNAV_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8050".to_string())
            .parse()
            .context("Invalid MNAV_LISTEN_ADDR")?;
        let config_path = non_empty("MNAV_CONFIG_PATH").map(PathBuf::from);
        let ttl_secs = non_empty("MNAV_TTL_SECS")
            .map(|v| v.trim().parse::<u64>())
            .transpose()
            .context("Invalid MNAV_TTL_SECS")?;
        let coingecko_tier = non_empty("MNAV_COINGECKO_TIER")
            .map(|v| v.parse::<CoinGeckoTier>())
            .transpose()
            .map_err(anyhow::Error::msg)
            .context("Invalid MNAV_COINGECKO_TIER")?
            .unwrap_or_default();
        let cors_allow = var("MNAV_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms = non_empty("MNAV_REQUEST_TIMEOUT_MS")
            .map(|v| v.trim().parse::<u64>())
            .transpose()
            .context("Invalid MNAV_REQUEST_TIMEOUT_MS")?
            .unwrap_or(30000);
        let static_dir = var("MNAV_STATIC_DIR").unwrap_or_else(|| "dist".into());

        Ok(Self {
            listen_addr,
            config_path,
            ttl_secs,
            coingecko_api_key: non_empty("MNAV_COINGECKO_API_KEY"),
            coingecko_tier,
            coingecko_base_url: non_empty("MNAV_COINGECKO_BASE_URL"),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            static_dir,
        })
    }
}
