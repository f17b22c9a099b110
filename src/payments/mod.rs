pub mod amortization;

pub use amortization::AmortizationCalculator;
