use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Totals and ratios over a set of valued entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    /// Every entity counts, whatever its data completeness.
    pub count: usize,
    /// Sum of present market caps.
    pub total_market_cap: Decimal,
    /// Sum of present market values.
    pub total_market_value: Decimal,
    /// `total_market_cap / total_market_value`.
    pub category_mnav: Option<Decimal>,
    /// The same ratio restricted to entities with both figures present.
    pub matched_category_mnav: Option<Decimal>,
    /// Mean of the present per-entity mNAVs.
    pub average_mnav: Option<Decimal>,
}
