use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub};
use std::str::FromStr;

/// fractional digits kept for money amounts
pub const MONEY_SCALE: u32 = 2;

/// fractional digits kept for the periodic (monthly) rate
pub const PERIODIC_RATE_SCALE: u32 = 8;

/// round half-up (away from zero) to `dp` places and pin the scale
fn round_half_up(d: Decimal, dp: u32) -> Decimal {
    let mut rounded = d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// money amount, always held at cent precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal, rounding half-up to cents
    pub fn from_decimal(d: Decimal) -> Self {
        Money(round_half_up(d, MONEY_SCALE))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money::from_decimal(Decimal::from_str(s)?))
    }

    /// create from integer amount (dollars, euros, etc)
    pub fn from_major(amount: i64) -> Self {
        Money::from_decimal(Decimal::from(amount))
    }

    /// const constructor for whole units
    pub const fn from_units(units: u32) -> Self {
        let cents = units as u64 * 100;
        Money(Decimal::from_parts(cents as u32, (cents >> 32) as u32, 0, false, MONEY_SCALE))
    }

    /// create from minor amount (cents)
    pub fn from_minor(cents: i64) -> Self {
        Money(Decimal::new(cents, MONEY_SCALE))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<Money> for Decimal {
    fn from(m: Money) -> Self {
        m.0
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::from_decimal(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::from_decimal(self.0 - other.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money::from_decimal(self.0 * other)
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money::from_decimal(self.0 / other)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

/// annual interest rate as a fraction (0.12 for 12%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::from(100))
    }

    /// create from basis points (e.g., 50 for 0.5%)
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::new(bps as i64, 4))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// monthly rate, rounded half-up to 8 places
    pub fn monthly_rate(&self) -> Decimal {
        round_half_up(self.0 / Decimal::from(12), PERIODIC_RATE_SCALE)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

impl Add for Rate {
    type Output = Rate;

    fn add(self, other: Rate) -> Rate {
        Rate(self.0 + other.0)
    }
}

impl Sub for Rate {
    type Output = Rate;

    fn sub(self, other: Rate) -> Rate {
        Rate(self.0 - other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_rounds_half_up_to_cents() {
        assert_eq!(Money::from_decimal(dec!(10.005)).to_string(), "10.01");
        assert_eq!(Money::from_decimal(dec!(10.004)).to_string(), "10.00");
        // banker's rounding would give 0.02 here
        assert_eq!(Money::from_decimal(dec!(0.025)).to_string(), "0.03");
    }

    #[test]
    fn test_money_keeps_two_places() {
        assert_eq!(Money::from_major(12_000).to_string(), "12000.00");
        assert_eq!(Money::from_minor(39_857).to_string(), "398.57");
        assert_eq!(Money::from_str_exact("1.5").unwrap().to_string(), "1.50");
        assert_eq!(Money::from_units(50_000), Money::from_major(50_000));
        assert_eq!(Money::from_units(50_000_000).to_string(), "50000000.00");
    }

    #[test]
    fn test_money_serializes_as_string() {
        let json = serde_json::to_string(&Money::from_major(5)).unwrap();
        assert_eq!(json, "\"5.00\"");

        let back: Money = serde_json::from_str("\"19.999\"").unwrap();
        assert_eq!(back, Money::from_minor(2_000));
    }

    #[test]
    fn test_monthly_rate_precision() {
        assert_eq!(Rate::from_percentage(12).monthly_rate(), dec!(0.01000000));
        assert_eq!(Rate::from_decimal(dec!(0.055)).monthly_rate(), dec!(0.00458333));
        assert_eq!(Rate::from_decimal(dec!(0.08)).monthly_rate(), dec!(0.00666667));
    }

    #[test]
    fn test_rate_constructors() {
        assert_eq!(Rate::from_bps(50), Rate::from_decimal(dec!(0.005)));
        assert_eq!(Rate::from_percentage(1), Rate::from_decimal(dec!(0.01)));
        assert_eq!(Rate::from_decimal(dec!(0.115)).to_string(), "11.5%");
    }
}
