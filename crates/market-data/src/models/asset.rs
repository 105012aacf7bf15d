use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider-agnostic key for something that has a price.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum AssetKey {
    /// Fungible token, keyed by the provider's coin id (e.g. `punkstrategy`, `bitcoin`).
    Coin(String),

    /// NFT collection, keyed by the provider's collection id (e.g. `cryptopunks`).
    NftCollection(String),
}

impl AssetKey {
    pub fn coin(id: impl Into<String>) -> Self {
        Self::Coin(id.into())
    }

    pub fn nft(id: impl Into<String>) -> Self {
        Self::NftCollection(id.into())
    }

    /// The bare provider id, without the kind prefix.
    pub fn id(&self) -> &str {
        match self {
            Self::Coin(id) | Self::NftCollection(id) => id,
        }
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coin(id) => write!(f, "coin:{}", id),
            Self::NftCollection(id) => write!(f, "nft:{}", id),
        }
    }
}
