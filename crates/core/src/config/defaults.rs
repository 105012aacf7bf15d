//! Built-in entity list used when no configuration file is supplied.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::BITCOIN_COIN_ID;
use crate::entities::{Entity, EntityClass};

fn nft_strategy(
    id: &str,
    name: &str,
    symbol: &str,
    collection: &str,
    holdings: Decimal,
    token_id: Option<&str>,
) -> Entity {
    Entity {
        id: id.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        entity_class: EntityClass::NftBacked,
        holdings,
        price_source_key: collection.to_string(),
        token_id: token_id.map(str::to_string),
        market_cap_usd: None,
    }
}

pub fn default_entities() -> Vec<Entity> {
    vec![
        nft_strategy(
            "punkstrategy",
            "PunkStrategy",
            "PNKSTR",
            "cryptopunks",
            dec!(37),
            Some("punkstrategy"),
        ),
        nft_strategy(
            "baycstrategy",
            "BAYCStrategy",
            "BAYSTR",
            "bored-ape-yacht-club",
            dec!(12),
            None,
        ),
        nft_strategy("azukistrategy", "AzukiStrategy", "AZUKISTR", "azuki", dec!(8), None),
        nft_strategy(
            "moonbirdsstrategy",
            "MoonbirdsStrategy",
            "MOONSTR",
            "moonbirds",
            dec!(5),
            None,
        ),
        nft_strategy(
            "puddystrategy",
            "PudgyStrategy",
            "PUDGSTR",
            "pudgy-penguins",
            dec!(15),
            None,
        ),
        nft_strategy(
            "chimpersstrategy",
            "ChimpersStrategy",
            "CHMPSTR",
            "chimpers",
            dec!(22),
            None,
        ),
        nft_strategy("vibestrategy", "VibesStrategy", "VIBESTR", "vibes", dec!(18), None),
        nft_strategy("meebitsstrategy", "MeebitsStrategy", "MEEBSTR", "meebits", dec!(10), None),
        Entity {
            id: "strategy".to_string(),
            name: "Strategy".to_string(),
            symbol: "MSTR".to_string(),
            entity_class: EntityClass::BtcBacked,
            holdings: dec!(450000),
            price_source_key: BITCOIN_COIN_ID.to_string(),
            token_id: None,
            // No token feed for an equity; refreshed by hand.
            market_cap_usd: Some(dec!(80000000000)),
        },
    ]
}
