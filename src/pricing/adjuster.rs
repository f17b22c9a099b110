use rust_decimal_macros::dec;

use crate::decimal::{Money, Rate};

/// amount-tier adjustment applied on top of the base rate
pub struct RateAdjuster;

impl RateAdjuster {
    /// principal above this earns the discount
    pub const LARGE_LOAN_THRESHOLD: Money = Money::from_units(50_000);
    /// principal below this pays the premium
    pub const SMALL_LOAN_THRESHOLD: Money = Money::from_units(10_000);

    /// both thresholds are strict; an amount equal to either is left unchanged
    pub fn adjust(base_rate: Rate, principal: Money) -> Rate {
        if principal > Self::LARGE_LOAN_THRESHOLD {
            base_rate - Rate::from_decimal(dec!(0.005))
        } else if principal < Self::SMALL_LOAN_THRESHOLD {
            base_rate + Rate::from_decimal(dec!(0.01))
        } else {
            base_rate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Rate {
        Rate::from_decimal(dec!(0.12))
    }

    #[test]
    fn test_boundaries_are_unchanged() {
        assert_eq!(RateAdjuster::adjust(base(), Money::from_major(50_000)), base());
        assert_eq!(RateAdjuster::adjust(base(), Money::from_major(10_000)), base());
        assert_eq!(RateAdjuster::adjust(base(), Money::from_major(25_000)), base());
    }

    #[test]
    fn test_large_loan_discount() {
        assert_eq!(
            RateAdjuster::adjust(base(), Money::from_major(50_001)),
            Rate::from_decimal(dec!(0.115))
        );
        // one cent over still qualifies
        assert_eq!(
            RateAdjuster::adjust(base(), Money::from_minor(5_000_001)),
            Rate::from_decimal(dec!(0.115))
        );
    }

    #[test]
    fn test_small_loan_premium() {
        assert_eq!(
            RateAdjuster::adjust(base(), Money::from_major(9_999)),
            Rate::from_decimal(dec!(0.13))
        );
        assert_eq!(
            RateAdjuster::adjust(Rate::ZERO, Money::from_minor(1)),
            Rate::from_decimal(dec!(0.01))
        );
    }
}
