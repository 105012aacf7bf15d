//! Market data models
//!
//! This module contains the data types exchanged with providers:
//! - `asset` - What to price (AssetKey)
//! - `facts` - What came back (AssetFacts, SpotPrices)

mod asset;
mod facts;

pub use asset::AssetKey;
pub use facts::{AssetFacts, SpotPrices};
