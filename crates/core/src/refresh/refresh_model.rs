use chrono::{DateTime, Utc};
use mnav_market_data::SpotPrices;
use serde::{Deserialize, Serialize};

use crate::entities::EntityClass;
use crate::portfolio::{aggregate, PortfolioSummary};
use crate::valuation::ValuedEntity;

/// Everything one refresh cycle produced. Replaced wholesale, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub spot_prices: SpotPrices,
    /// Valued entities in configuration order.
    pub entities: Vec<ValuedEntity>,
    /// Summary over NFT-backed entities.
    pub strategies: PortfolioSummary,
    /// Summary over BTC-backed entities.
    pub treasuries: PortfolioSummary,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Builds a snapshot, aggregating each entity class separately.
    pub fn new(spot_prices: SpotPrices, entities: Vec<ValuedEntity>, fetched_at: DateTime<Utc>) -> Self {
        let strategies = aggregate(&of_class(&entities, EntityClass::NftBacked));
        let treasuries = aggregate(&of_class(&entities, EntityClass::BtcBacked));
        Self {
            spot_prices,
            entities,
            strategies,
            treasuries,
            fetched_at,
        }
    }

    pub fn entities_of(&self, class: EntityClass) -> Vec<ValuedEntity> {
        of_class(&self.entities, class)
    }

    pub fn summary_for(&self, class: EntityClass) -> &PortfolioSummary {
        match class {
            EntityClass::NftBacked => &self.strategies,
            EntityClass::BtcBacked => &self.treasuries,
        }
    }
}

fn of_class(entities: &[ValuedEntity], class: EntityClass) -> Vec<ValuedEntity> {
    entities
        .iter()
        .filter(|e| e.entity.entity_class == class)
        .cloned()
        .collect()
}

/// Outcome of the most recent refresh, as shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "camelCase")]
pub enum RefreshStatus {
    Idle,
    Fetching,
    Error(String),
}

/// Lifecycle of the cached snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotState {
    /// Nothing fetched yet.
    Empty,
    /// Younger than the TTL.
    Fresh,
    /// At least TTL old; the next read refreshes.
    Stale,
    /// A refresh is in flight.
    Refreshing,
}
