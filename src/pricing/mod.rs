pub mod adjuster;
pub mod rate_table;

pub use adjuster::RateAdjuster;
pub use rate_table::RateTable;

use crate::decimal::{Money, Rate};
use crate::types::LoanType;

/// submission-time rate: base rate for the category, adjusted for the amount tier
pub fn quote_rate(loan_type: LoanType, principal: Money) -> Rate {
    RateAdjuster::adjust(RateTable::base_rate(loan_type), principal)
}
