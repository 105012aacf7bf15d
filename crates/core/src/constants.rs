/// Seconds a snapshot stays fresh before the next read triggers a refresh.
pub const DEFAULT_TTL_SECS: u64 = 30;

/// Upper bound on a single upstream fetch, rate limiter wait included.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Coin that NFT floor prices are quoted in unless the provider says otherwise.
pub const DEFAULT_NATIVE_COIN_ID: &str = "ethereum";

/// Coin id of bitcoin at the price source.
pub const BITCOIN_COIN_ID: &str = "bitcoin";
