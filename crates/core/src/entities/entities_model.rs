//! Tracked entities: strategy tokens and treasury companies.

use mnav_market_data::AssetKey;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What an entity holds, which decides how its unit price is resolved and
/// which signal thresholds apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityClass {
    /// A token treasury holding NFTs from one collection.
    NftBacked,
    /// A company holding bitcoin on its balance sheet.
    BtcBacked,
}

impl EntityClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityClass::NftBacked => "nftBacked",
            EntityClass::BtcBacked => "btcBacked",
        }
    }
}

/// A configured entity. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Unique key.
    pub id: String,
    pub name: String,
    /// Ticker shown in the table.
    pub symbol: String,
    pub entity_class: EntityClass,
    /// Units of the backing asset held.
    pub holdings: Decimal,
    /// NFT collection id (nftBacked) or coin id (btcBacked) at the price source.
    pub price_source_key: String,
    /// Coin id of the entity's own token, used for its market cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    /// Fixed market cap in USD for entities without a tradable token feed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap_usd: Option<Decimal>,
}

impl Entity {
    /// Asset whose facts give the unit price of the holdings, if the unit
    /// price does not come straight from spot prices.
    pub fn backing_asset(&self) -> Option<AssetKey> {
        match self.entity_class {
            EntityClass::NftBacked => Some(AssetKey::nft(&self.price_source_key)),
            EntityClass::BtcBacked => None,
        }
    }

    /// Asset whose facts give the entity's market cap.
    pub fn token_asset(&self) -> Option<AssetKey> {
        self.token_id.as_deref().map(AssetKey::coin)
    }
}
