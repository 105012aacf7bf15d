//! Maps an mNAV ratio to a trading signal and a premium/discount stance.

use rust_decimal::Decimal;

use super::signals_model::{MnavStance, Signal, SignalThresholds};

/// `Buy` strictly below `buy_below`, `Sell` strictly above `sell_above`,
/// `Hold` in between with both bounds inclusive. An absent mNAV is `Unknown`.
pub fn classify(m_nav: Option<Decimal>, thresholds: &SignalThresholds) -> Signal {
    match m_nav {
        None => Signal::Unknown,
        Some(v) if v < thresholds.buy_below => Signal::Buy,
        Some(v) if v > thresholds.sell_above => Signal::Sell,
        Some(_) => Signal::Hold,
    }
}

/// Premium at or above 1.0, discount below it.
pub fn stance(m_nav: Option<Decimal>) -> Option<MnavStance> {
    m_nav.map(|v| {
        if v >= Decimal::ONE {
            MnavStance::Premium
        } else {
            MnavStance::Discount
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const NFT: SignalThresholds = SignalThresholds::NFT_BACKED;
    const BTC: SignalThresholds = SignalThresholds::BTC_BACKED;

    #[test]
    fn test_absent_mnav_is_unknown() {
        assert_eq!(classify(None, &NFT), Signal::Unknown);
        assert_eq!(stance(None), None);
    }

    #[test]
    fn test_nft_boundaries_are_hold() {
        assert_eq!(classify(Some(dec!(1.0)), &NFT), Signal::Hold);
        assert_eq!(classify(Some(dec!(5.0)), &NFT), Signal::Hold);
        assert_eq!(classify(Some(dec!(5.000001)), &NFT), Signal::Sell);
        assert_eq!(classify(Some(dec!(0.999999)), &NFT), Signal::Buy);
    }

    #[test]
    fn test_btc_thresholds() {
        assert_eq!(classify(Some(dec!(1.1)), &BTC), Signal::Buy);
        assert_eq!(classify(Some(dec!(1.2)), &BTC), Signal::Hold);
        assert_eq!(classify(Some(dec!(2.5)), &BTC), Signal::Hold);
        assert_eq!(classify(Some(dec!(3.01)), &BTC), Signal::Sell);
    }

    #[test]
    fn test_same_mnav_differs_by_class() {
        let m_nav = Some(dec!(1.1));
        assert_eq!(classify(m_nav, &NFT), Signal::Hold);
        assert_eq!(classify(m_nav, &BTC), Signal::Buy);
    }

    #[test]
    fn test_stance_at_parity_is_premium() {
        assert_eq!(stance(Some(dec!(1))), Some(MnavStance::Premium));
        assert_eq!(stance(Some(dec!(0.83))), Some(MnavStance::Discount));
    }

    #[test]
    fn test_signal_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Signal::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&Signal::Unknown).unwrap(), "\"UNKNOWN\"");
    }
}
