use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};

/// level monthly payment for a fully amortizing loan
pub struct AmortizationCalculator;

impl AmortizationCalculator {
    /// M = P * r * (1 + r)^n / ((1 + r)^n - 1), with r the monthly rate.
    ///
    /// `r` is taken to 8 places before use and the payment is rounded
    /// half-up to cents. A zero rate amortizes uniformly (`P / n`).
    /// Terms whose payment leaves the decimal range are a validation error.
    pub fn monthly_payment(principal: Money, annual_rate: Rate, term_months: u32) -> Result<Money> {
        if term_months == 0 {
            return Err(LoanError::validation("loan term must be at least one month"));
        }
        let n = Decimal::from(term_months);
        let r = annual_rate.monthly_rate();

        if r.is_zero() {
            return Ok(Money::from_decimal(principal.as_decimal() / n));
        }

        let out_of_range = || {
            LoanError::validation(format!(
                "monthly payment for {principal} at {annual_rate} over {term_months} months is out of range"
            ))
        };

        let compound = compound_factor(Decimal::ONE + r, term_months).ok_or_else(out_of_range)?;
        let numerator = principal
            .as_decimal()
            .checked_mul(r)
            .and_then(|v| v.checked_mul(compound))
            .ok_or_else(out_of_range)?;
        let denominator = compound - Decimal::ONE;

        numerator
            .checked_div(denominator)
            .map(Money::from_decimal)
            .ok_or_else(out_of_range)
    }

    /// total paid over the term at the level payment
    pub fn total_repayment(principal: Money, annual_rate: Rate, term_months: u32) -> Result<Money> {
        let payment = Self::monthly_payment(principal, annual_rate, term_months)?;
        payment
            .as_decimal()
            .checked_mul(Decimal::from(term_months))
            .map(Money::from_decimal)
            .ok_or_else(|| {
                LoanError::validation(format!(
                    "total repayment over {term_months} months is out of range"
                ))
            })
    }

    /// interest portion of the total repayment
    pub fn total_interest(principal: Money, annual_rate: Rate, term_months: u32) -> Result<Money> {
        Ok(Self::total_repayment(principal, annual_rate, term_months)? - principal)
    }
}

/// `base^exponent` by repeated squaring; `None` once it leaves the decimal range
fn compound_factor(base: Decimal, mut exponent: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    let mut square = base;
    loop {
        if exponent & 1 == 1 {
            result = result.checked_mul(square)?;
        }
        exponent >>= 1;
        if exponent == 0 {
            return Some(result);
        }
        square = square.checked_mul(square)?;
    }
}
