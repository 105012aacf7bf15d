//! One refresh cycle: fetch every asset concurrently, value each entity,
//! aggregate per class.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use log::{debug, info};
use mnav_market_data::{AssetFacts, PriceSource};

use super::refresh_model::Snapshot;
use super::refresh_traits::SnapshotSource;
use crate::config::DashboardConfig;
use crate::entities::{Entity, EntityClass};
use crate::errors::Result;
use crate::valuation::{resolve_market_cap, resolve_unit_price, valuate, ValuedEntity};

/// Facts fetched for one entity. Either side may be missing.
#[derive(Debug)]
struct EntityFacts {
    collection: Option<AssetFacts>,
    token: Option<AssetFacts>,
}

pub struct ValuationPipeline {
    source: Arc<PriceSource>,
    config: Arc<DashboardConfig>,
}

impl ValuationPipeline {
    pub fn new(source: Arc<PriceSource>, config: Arc<DashboardConfig>) -> Self {
        Self { source, config }
    }

    /// Coins whose spot price the cycle needs, without duplicates.
    fn spot_coin_ids(&self) -> Vec<String> {
        let mut ids = vec![self.config.native_coin_id.clone()];
        for entity in self.config.entities_of(EntityClass::BtcBacked) {
            if !ids.contains(&entity.price_source_key) {
                ids.push(entity.price_source_key.clone());
            }
        }
        ids
    }

    async fn fetch_entity_facts(&self, entity: &Entity) -> EntityFacts {
        let collection = async {
            match entity.backing_asset() {
                Some(asset) => self.source.fetch_asset_facts(&asset).await,
                None => None,
            }
        };
        let token = async {
            match entity.token_asset() {
                Some(asset) => self.source.fetch_asset_facts(&asset).await,
                None => None,
            }
        };

        let (collection, token) = futures::join!(collection, token);
        EntityFacts { collection, token }
    }

    /// Runs a full cycle. Never fails: assets that could not be fetched leave
    /// the affected figures absent.
    pub async fn run(&self) -> Snapshot {
        let started = std::time::Instant::now();
        let spot_ids = self.spot_coin_ids();
        debug!(
            "Refreshing {} entities via {}",
            self.config.entities.len(),
            self.source.provider_id()
        );

        let (spot, facts) = futures::join!(
            self.source.fetch_spot_prices(&spot_ids),
            join_all(self.config.entities.iter().map(|e| self.fetch_entity_facts(e)))
        );

        let entities: Vec<ValuedEntity> = self
            .config
            .entities
            .iter()
            .zip(facts)
            .map(|(entity, facts)| {
                let unit_price = resolve_unit_price(
                    entity,
                    facts.collection.as_ref(),
                    &spot,
                    &self.config.native_coin_id,
                );
                let market_cap = resolve_market_cap(entity, facts.token.as_ref());
                valuate(entity, market_cap, unit_price)
            })
            .collect();

        let with_mnav = entities.iter().filter(|e| e.m_nav.is_some()).count();
        info!(
            "Valued {} entities ({} with mNAV) in {:?}",
            entities.len(),
            with_mnav,
            started.elapsed()
        );

        Snapshot::new(spot, entities, Utc::now())
    }
}

#[async_trait]
impl SnapshotSource for ValuationPipeline {
    async fn load_snapshot(&self) -> Result<Snapshot> {
        Ok(self.run().await)
    }
}
