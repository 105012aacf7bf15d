//! Dashboard configuration: which entities to track and how.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use log::{debug, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::defaults::default_entities;
use crate::constants::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_NATIVE_COIN_ID, DEFAULT_TTL_SECS};
use crate::entities::{Entity, EntityClass};
use crate::errors::ConfigError;
use crate::signals::ThresholdConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Tracked entities, in display order.
    pub entities: Vec<Entity>,
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    #[serde(default = "default_fetch_timeout_seconds")]
    pub fetch_timeout_seconds: u64,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    /// Coin NFT floors are priced in when the provider omits it.
    #[serde(default = "default_native_coin_id")]
    pub native_coin_id: String,
}

fn default_ttl_seconds() -> u64 {
    DEFAULT_TTL_SECS
}

fn default_fetch_timeout_seconds() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_native_coin_id() -> String {
    DEFAULT_NATIVE_COIN_ID.to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            entities: default_entities(),
            ttl_seconds: DEFAULT_TTL_SECS,
            fetch_timeout_seconds: DEFAULT_FETCH_TIMEOUT_SECS,
            thresholds: ThresholdConfig::default(),
            native_coin_id: default_native_coin_id(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file, or the built-in entity list when no
    /// path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("No configuration file given, using built-in entities");
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        };

        debug!("Loading configuration from {}", path.display());
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_json(&json)?;
        info!(
            "Loaded {} entities from {}",
            config.entities.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entities.is_empty() {
            return Err(ConfigError::NoEntities);
        }

        let mut seen = HashSet::new();
        for entity in &self.entities {
            if !seen.insert(entity.id.as_str()) {
                return Err(ConfigError::DuplicateEntity(entity.id.clone()));
            }
            validate_entity(entity)?;
        }

        if self.ttl_seconds == 0 {
            return Err(ConfigError::NonPositive("ttlSeconds"));
        }
        if self.fetch_timeout_seconds == 0 {
            return Err(ConfigError::NonPositive("fetchTimeoutSeconds"));
        }

        for class in [EntityClass::NftBacked, EntityClass::BtcBacked] {
            let thresholds = self.thresholds.for_class(class);
            if !thresholds.is_ordered() {
                return Err(ConfigError::InvalidThresholds {
                    class: class.as_str(),
                    buy_below: thresholds.buy_below,
                    sell_above: thresholds.sell_above,
                });
            }
        }

        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    pub fn entities_of(&self, class: EntityClass) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.entity_class == class)
    }
}

fn validate_entity(entity: &Entity) -> Result<(), ConfigError> {
    let invalid = |message: &str| ConfigError::InvalidEntity {
        id: entity.id.clone(),
        message: message.to_string(),
    };

    if entity.id.trim().is_empty() {
        return Err(invalid("id must not be empty"));
    }
    if entity.price_source_key.trim().is_empty() {
        return Err(invalid("priceSourceKey must not be empty"));
    }
    if entity.holdings < Decimal::ZERO {
        return Err(invalid("holdings must not be negative"));
    }
    if entity.token_id.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(invalid("tokenId must not be empty when present"));
    }
    if entity.market_cap_usd.is_some_and(|cap| cap < Decimal::ZERO) {
        return Err(invalid("marketCapUsd must not be negative"));
    }
    Ok(())
}
