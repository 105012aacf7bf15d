pub mod aggregator;
pub mod summary_model;

pub use aggregator::{aggregate, sort_by_market_cap};
pub use summary_model::PortfolioSummary;
