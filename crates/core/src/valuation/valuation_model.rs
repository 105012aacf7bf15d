//! Valuation domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::Entity;

/// Price of one unit of an entity's holdings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitPrice {
    /// In the holdings' native currency (ETH for NFT floors).
    pub native: Option<Decimal>,
    pub usd: Option<Decimal>,
}

/// One entity joined with its resolved market figures. Every figure is
/// absent rather than zero when an input was unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuedEntity {
    #[serde(flatten)]
    pub entity: Entity,
    pub unit_price_native: Option<Decimal>,
    pub unit_price_usd: Option<Decimal>,
    /// `holdings * unit_price_usd`.
    pub market_value: Option<Decimal>,
    /// Market cap of the entity itself, USD.
    pub market_cap: Option<Decimal>,
    /// `market_cap / market_value`, only when `market_value > 0`.
    pub m_nav: Option<Decimal>,
}

impl ValuedEntity {
    pub fn id(&self) -> &str {
        &self.entity.id
    }
}
