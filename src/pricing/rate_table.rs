use rust_decimal_macros::dec;

use crate::decimal::Rate;
use crate::types::LoanType;

/// base annual rate per loan category
pub struct RateTable;

impl RateTable {
    pub fn base_rate(loan_type: LoanType) -> Rate {
        let rate = match loan_type {
            LoanType::Personal => dec!(0.12),
            LoanType::Auto => dec!(0.08),
            LoanType::Home => dec!(0.06),
            LoanType::Student => dec!(0.05),
            LoanType::Business => dec!(0.10),
        };
        Rate::from_decimal(rate)
    }
}
