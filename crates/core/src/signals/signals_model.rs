use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::entities::EntityClass;

/// Trading signal derived from an entity's mNAV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Hold,
    Sell,
    Unknown,
}

/// Whether the market prices an entity above or below its holdings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MnavStance {
    Premium,
    Discount,
}

/// Signal cut-offs for one entity class. Requires `buy_below <= sell_above`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalThresholds {
    pub buy_below: Decimal,
    pub sell_above: Decimal,
}

impl SignalThresholds {
    pub const NFT_BACKED: SignalThresholds = SignalThresholds {
        buy_below: dec!(1.0),
        sell_above: dec!(5.0),
    };

    pub const BTC_BACKED: SignalThresholds = SignalThresholds {
        buy_below: dec!(1.2),
        sell_above: dec!(3.0),
    };

    pub fn is_ordered(&self) -> bool {
        self.buy_below <= self.sell_above
    }
}

/// Thresholds keyed by entity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdConfig {
    #[serde(default = "nft_backed_default")]
    pub nft_backed: SignalThresholds,
    #[serde(default = "btc_backed_default")]
    pub btc_backed: SignalThresholds,
}

fn nft_backed_default() -> SignalThresholds {
    SignalThresholds::NFT_BACKED
}

fn btc_backed_default() -> SignalThresholds {
    SignalThresholds::BTC_BACKED
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            nft_backed: SignalThresholds::NFT_BACKED,
            btc_backed: SignalThresholds::BTC_BACKED,
        }
    }
}

impl ThresholdConfig {
    pub fn for_class(&self, class: EntityClass) -> &SignalThresholds {
        match class {
            EntityClass::NftBacked => &self.nft_backed,
            EntityClass::BtcBacked => &self.btc_backed,
        }
    }
}
