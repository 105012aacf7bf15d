//! mNAV Core - Valuation, signals, aggregation and refresh caching.
//!
//! This crate turns market facts from `mnav-market-data` into per-entity
//! mNAV figures and portfolio summaries, and owns the TTL cache that decides
//! when upstream data is fetched again. It knows nothing about HTTP.

pub mod config;
pub mod constants;
pub mod entities;
pub mod errors;
pub mod portfolio;
pub mod refresh;
pub mod signals;
pub mod valuation;

pub use config::DashboardConfig;
pub use entities::{Entity, EntityClass};
pub use portfolio::{aggregate, sort_by_market_cap, PortfolioSummary};
pub use refresh::{RefreshCache, RefreshStatus, SlotState, Snapshot, SnapshotSource, ValuationPipeline};
pub use signals::{classify, stance, MnavStance, Signal, SignalThresholds, ThresholdConfig};
pub use valuation::{valuate, ValuedEntity};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
