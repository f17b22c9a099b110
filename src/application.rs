use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::payments::AmortizationCalculator;
use crate::types::{ApplicationId, ApplicationStatus, CustomerId, LoanType};

/// parameters for a new application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub customer_id: CustomerId,
    pub loan_amount: Money,
    pub loan_type: LoanType,
    pub loan_term_months: u32,
    pub purpose: String,
}

impl NewApplication {
    pub fn new(
        customer_id: CustomerId,
        loan_amount: Money,
        loan_type: LoanType,
        loan_term_months: u32,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            customer_id,
            loan_amount,
            loan_type,
            loan_term_months,
            purpose: purpose.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_terms(self.loan_amount, self.loan_term_months)
    }
}

/// rejects non-positive amounts and terms before anything is mutated
pub(crate) fn validate_terms(amount: Money, term_months: u32) -> Result<()> {
    if !amount.is_positive() {
        return Err(LoanError::validation(format!(
            "loan amount must be positive, got {amount}"
        )));
    }
    if term_months == 0 {
        return Err(LoanError::validation("loan term must be at least one month"));
    }
    Ok(())
}

/// loan application record
///
/// `monthly_payment` is derived from `loan_amount`, `interest_rate` and
/// `loan_term_months`; the fields are private and every setter recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    pub(crate) id: Option<ApplicationId>,
    pub(crate) customer_id: CustomerId,
    pub(crate) loan_amount: Money,
    pub(crate) loan_type: LoanType,
    pub(crate) loan_term_months: u32,
    pub(crate) purpose: String,
    pub(crate) status: ApplicationStatus,
    pub(crate) interest_rate: Rate,
    pub(crate) monthly_payment: Money,
    pub(crate) approval_date: Option<DateTime<Utc>>,
    pub(crate) rejection_reason: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    /// optimistic concurrency token, owned by the store
    #[serde(default)]
    pub(crate) version: u64,
}

impl LoanApplication {
    /// build an unpersisted record in SUBMITTED with payment derived from the terms
    pub(crate) fn submitted(
        request: NewApplication,
        interest_rate: Rate,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let monthly_payment = AmortizationCalculator::monthly_payment(
            request.loan_amount,
            interest_rate,
            request.loan_term_months,
        )?;

        Ok(Self {
            id: None,
            customer_id: request.customer_id,
            loan_amount: request.loan_amount,
            loan_type: request.loan_type,
            loan_term_months: request.loan_term_months,
            purpose: request.purpose,
            status: ApplicationStatus::Submitted,
            interest_rate,
            monthly_payment,
            approval_date: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    pub fn id(&self) -> Option<ApplicationId> {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn loan_amount(&self) -> Money {
        self.loan_amount
    }

    pub fn loan_type(&self) -> LoanType {
        self.loan_type
    }

    pub fn loan_term_months(&self) -> u32 {
        self.loan_term_months
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    pub fn interest_rate(&self) -> Rate {
        self.interest_rate
    }

    pub fn monthly_payment(&self) -> Money {
        self.monthly_payment
    }

    pub fn approval_date(&self) -> Option<DateTime<Utc>> {
        self.approval_date
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// replace amount and rate together, keeping the payment in sync.
    /// the record is left untouched when the payment cannot be computed.
    pub(crate) fn set_terms(&mut self, loan_amount: Money, interest_rate: Rate) -> Result<()> {
        self.monthly_payment =
            AmortizationCalculator::monthly_payment(loan_amount, interest_rate, self.loan_term_months)?;
        self.loan_amount = loan_amount;
        self.interest_rate = interest_rate;
        Ok(())
    }

    /// payment matches the (amount, rate, term) triple
    pub fn is_payment_consistent(&self) -> bool {
        matches!(
            AmortizationCalculator::monthly_payment(
                self.loan_amount,
                self.interest_rate,
                self.loan_term_months,
            ),
            Ok(payment) if payment == self.monthly_payment
        )
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// parse a stored record, refusing one whose payment drifted from its terms
    pub fn from_json(json: &str) -> Result<Self> {
        let application: LoanApplication =
            serde_json::from_str(json).map_err(|e| LoanError::validation(e.to_string()))?;
        validate_terms(application.loan_amount, application.loan_term_months)?;
        if !application.is_payment_consistent() {
            return Err(LoanError::validation(format!(
                "monthly payment {} does not match the loan terms",
                application.monthly_payment
            )));
        }
        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn request() -> NewApplication {
        NewApplication::new(
            Uuid::new_v4(),
            Money::from_major(12_000),
            LoanType::Personal,
            36,
            "kitchen remodel",
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_validation() {
        assert!(request().validate().is_ok());

        let mut bad = request();
        bad.loan_amount = Money::ZERO;
        assert!(matches!(bad.validate(), Err(LoanError::Validation { .. })));

        let mut bad = request();
        bad.loan_amount = Money::from_major(-5);
        assert!(bad.validate().is_err());

        let mut bad = request();
        bad.loan_term_months = 0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_submitted_record() {
        let app = LoanApplication::submitted(request(), Rate::from_percentage(12), now()).unwrap();

        assert_eq!(app.id(), None);
        assert_eq!(app.status(), ApplicationStatus::Submitted);
        assert_eq!(app.monthly_payment().to_string(), "398.57");
        assert_eq!(app.created_at(), now());
        assert_eq!(app.updated_at(), now());
        assert!(app.approval_date().is_none());
        assert!(app.rejection_reason().is_none());
        assert!(app.is_payment_consistent());
    }

    #[test]
    fn test_set_terms_recomputes_payment() {
        let mut app = LoanApplication::submitted(request(), Rate::from_percentage(12), now()).unwrap();
        app.set_terms(Money::from_major(30_000), Rate::from_percentage(12)).unwrap();

        assert_eq!(app.loan_amount(), Money::from_major(30_000));
        assert_eq!(app.monthly_payment().to_string(), "996.43");
        assert!(app.is_payment_consistent());
    }

    #[test]
    fn test_terms_out_of_range() {
        let mut long = request();
        long.loan_term_months = 7_000;
        let err = LoanApplication::submitted(long, Rate::from_percentage(12), now()).unwrap_err();
        assert!(matches!(err, LoanError::Validation { .. }));

        let mut app = LoanApplication::submitted(request(), Rate::from_percentage(12), now()).unwrap();
        let before = app.clone();
        let huge = Money::from_str_exact("70000000000000000000000000").unwrap();
        assert!(app.set_terms(huge, Rate::from_percentage(12_000)).is_err());
        assert_eq!(app, before);
    }

    #[test]
    fn test_json_field_names() {
        let app = LoanApplication::submitted(request(), Rate::from_decimal(dec!(0.12)), now()).unwrap();
        let json = serde_json::to_value(&app).unwrap();

        assert_eq!(json["loanAmount"], "12000.00");
        assert_eq!(json["loanType"], "PERSONAL");
        assert_eq!(json["loanTermMonths"], 36);
        assert_eq!(json["status"], "SUBMITTED");
        assert_eq!(json["monthlyPayment"], "398.57");
        assert_eq!(json["interestRate"], "0.12");
        assert!(json["approvalDate"].is_null());
        assert!(json["rejectionReason"].is_null());
    }

    #[test]
    fn test_from_json_rejects_stale_payment() {
        let app = LoanApplication::submitted(request(), Rate::from_percentage(12), now()).unwrap();
        let json = app.to_json_pretty().unwrap();
        assert_eq!(LoanApplication::from_json(&json).unwrap(), app);

        let tampered = json.replace("398.57", "100.00");
        let err = LoanApplication::from_json(&tampered).unwrap_err();
        assert!(matches!(err, LoanError::Validation { .. }));
    }
}
