//! Response bodies for the dashboard API.

use chrono::{DateTime, Utc};
use mnav_core::{
    classify, sort_by_market_cap, stance, EntityClass, MnavStance, PortfolioSummary,
    RefreshStatus, Signal, SignalThresholds, SlotState, Snapshot, ThresholdConfig, ValuedEntity,
};
use mnav_market_data::SpotPrices;
use serde::Serialize;

/// One table row: the valued entity plus its signal and premium/discount
/// stance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRow {
    #[serde(flatten)]
    pub valued: ValuedEntity,
    pub signal: Signal,
    pub stance: Option<MnavStance>,
}

impl EntityRow {
    pub fn new(valued: ValuedEntity, thresholds: &SignalThresholds) -> Self {
        Self {
            signal: classify(valued.m_nav, thresholds),
            stance: stance(valued.m_nav),
            valued,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    /// Sorted by market cap, largest first.
    pub rows: Vec<EntityRow>,
    pub summary: PortfolioSummary,
    pub fetched_at: DateTime<Utc>,
}

impl TableView {
    pub fn from_snapshot(
        snapshot: &Snapshot,
        class: EntityClass,
        thresholds: &ThresholdConfig,
    ) -> Self {
        let mut entities = snapshot.entities_of(class);
        sort_by_market_cap(&mut entities);
        let thresholds = thresholds.for_class(class);
        Self {
            rows: entities
                .into_iter()
                .map(|e| EntityRow::new(e, thresholds))
                .collect(),
            summary: snapshot.summary_for(class).clone(),
            fetched_at: snapshot.fetched_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub spot_prices: SpotPrices,
    pub strategies: PortfolioSummary,
    pub treasuries: PortfolioSummary,
    pub fetched_at: DateTime<Utc>,
}

impl From<&Snapshot> for SummaryView {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            spot_prices: snapshot.spot_prices.clone(),
            strategies: snapshot.strategies.clone(),
            treasuries: snapshot.treasuries.clone(),
            fetched_at: snapshot.fetched_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub status: RefreshStatus,
    pub state: SlotState,
    pub last_fetched_at: Option<DateTime<Utc>>,
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub spot_prices: SpotPrices,
    pub strategies: TableView,
    pub treasuries: TableView,
    pub fetched_at: DateTime<Utc>,
    pub status: RefreshStatus,
}
