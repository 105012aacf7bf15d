//! Portfolio-level totals over valued entities.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use super::summary_model::PortfolioSummary;
use crate::valuation::ValuedEntity;

/// Combines valued entities into totals, category mNAV and average mNAV.
///
/// Only present values are summed. Ratios are absent whenever their
/// denominator would not be strictly positive.
pub fn aggregate(entities: &[ValuedEntity]) -> PortfolioSummary {
    let total_market_cap: Decimal = entities.iter().filter_map(|e| e.market_cap).sum();
    let total_market_value: Decimal = entities.iter().filter_map(|e| e.market_value).sum();

    let category_mnav = if total_market_cap > Decimal::ZERO {
        ratio(total_market_cap, total_market_value)
    } else {
        None
    };

    let (matched_cap, matched_value) = entities
        .iter()
        .filter_map(|e| e.market_cap.zip(e.market_value))
        .fold((Decimal::ZERO, Decimal::ZERO), |(cap, value), (c, v)| {
            (cap + c, value + v)
        });
    let matched_category_mnav = if matched_cap > Decimal::ZERO {
        ratio(matched_cap, matched_value)
    } else {
        None
    };

    let present: Vec<Decimal> = entities.iter().filter_map(|e| e.m_nav).collect();
    let average_mnav = if present.is_empty() {
        None
    } else {
        let sum: Decimal = present.iter().sum();
        sum.checked_div(Decimal::from(present.len()))
    };

    PortfolioSummary {
        count: entities.len(),
        total_market_cap,
        total_market_value,
        category_mnav,
        matched_category_mnav,
        average_mnav,
    }
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator > Decimal::ZERO {
        numerator.checked_div(denominator)
    } else {
        None
    }
}

/// Orders rows by market cap, largest first. Rows without a market cap go
/// last and keep their relative order.
pub fn sort_by_market_cap(entities: &mut [ValuedEntity]) {
    entities.sort_by(|a, b| match (a.market_cap, b.market_cap) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
