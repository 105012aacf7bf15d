use log::debug;
use mnav_market_data::{AssetFacts, SpotPrices};
use rust_decimal::Decimal;

use super::valuation_model::{UnitPrice, ValuedEntity};
use crate::entities::{Entity, EntityClass};

/// Resolves the price of one unit of an entity's holdings.
///
/// NFT-backed entities use the collection floor in its native currency,
/// converted with the native coin's spot price. When that spot price is
/// missing the provider's own USD floor is used instead. BTC-backed entities
/// take the spot price of their `price_source_key` directly.
///
/// # Arguments
///
/// * `entity` - The entity being valued.
/// * `collection` - Facts for the backing NFT collection, if fetched.
/// * `spot` - USD spot prices fetched for this cycle.
/// * `default_native_coin` - Coin to convert floors from when the provider
///   does not report one.
pub fn resolve_unit_price(
    entity: &Entity,
    collection: Option<&AssetFacts>,
    spot: &SpotPrices,
    default_native_coin: &str,
) -> UnitPrice {
    match entity.entity_class {
        EntityClass::NftBacked => {
            let Some(facts) = collection else {
                return UnitPrice::default();
            };
            let native = facts.floor_price_native;
            let coin = facts
                .native_currency
                .as_deref()
                .unwrap_or(default_native_coin);

            let converted = native
                .zip(spot.get(coin))
                .and_then(|(floor, rate)| floor.checked_mul(rate));
            let usd = converted.or(facts.floor_price_usd);
            if converted.is_none() && usd.is_some() {
                debug!(
                    "No {} spot price for {}, using provider USD floor",
                    coin, entity.id
                );
            }

            UnitPrice { native, usd }
        }
        EntityClass::BtcBacked => UnitPrice {
            native: None,
            usd: spot.get(&entity.price_source_key),
        },
    }
}

/// Resolves an entity's market cap: the configured fixed value if set, else
/// the token's fully diluted valuation, else its circulating market cap.
pub fn resolve_market_cap(entity: &Entity, token: Option<&AssetFacts>) -> Option<Decimal> {
    entity
        .market_cap_usd
        .or_else(|| token.and_then(AssetFacts::diluted_market_cap_usd))
}

/// `holdings * unit_price_usd`, absent when the price is.
pub fn market_value(holdings: Decimal, unit_price_usd: Option<Decimal>) -> Option<Decimal> {
    unit_price_usd.and_then(|price| holdings.checked_mul(price))
}

/// `market_cap / market_value`, absent unless both are present and the
/// market value is positive.
pub fn mnav(market_cap: Option<Decimal>, market_value: Option<Decimal>) -> Option<Decimal> {
    match (market_cap, market_value) {
        (Some(cap), Some(value)) if value > Decimal::ZERO => cap.checked_div(value),
        _ => None,
    }
}

/// Joins an entity with its resolved market cap and unit price.
pub fn valuate(entity: &Entity, market_cap: Option<Decimal>, unit_price: UnitPrice) -> ValuedEntity {
    let market_value = market_value(entity.holdings, unit_price.usd);
    ValuedEntity {
        entity: entity.clone(),
        unit_price_native: unit_price.native,
        unit_price_usd: unit_price.usd,
        market_value,
        market_cap,
        m_nav: mnav(market_cap, market_value),
    }
}
