/// quick start - price a loan and compute its monthly payment
use loan_lifecycle_rs::{AmortizationCalculator, LoanType, Money, RateAdjuster, RateTable, Result};

fn main() -> Result<()> {
    let amount = Money::from_major(12_000);

    for loan_type in LoanType::ALL {
        let base = RateTable::base_rate(loan_type);
        let rate = RateAdjuster::adjust(base, amount);
        let payment = AmortizationCalculator::monthly_payment(amount, rate, 36)?;
        println!("{loan_type:<9} base {base} quoted {rate} payment ${payment}/month");
    }
    Ok(())
}
