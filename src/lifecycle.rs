//! Loan application state machine.
//!
//! ```text
//! SUBMITTED -> UNDER_REVIEW -> APPROVED -> DISBURSED
//!                          \-> REJECTED
//! ```
//!
//! Every operation takes the current record by reference and returns a new
//! one, so a refused transition leaves the caller's record untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::application::{validate_terms, LoanApplication, NewApplication};
use crate::clock::Clock;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::events::ApplicationEvent;
use crate::pricing;
use crate::types::ApplicationStatus;

/// externally triggered operation on an existing application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Review,
    Approve,
    Reject,
    Disburse,
}

impl Operation {
    /// status the record must be in for the operation to apply
    pub fn required_status(self) -> ApplicationStatus {
        match self {
            Operation::Review => ApplicationStatus::Submitted,
            Operation::Approve | Operation::Reject => ApplicationStatus::UnderReview,
            Operation::Disburse => ApplicationStatus::Approved,
        }
    }

    /// status the record ends in
    pub fn target_status(self) -> ApplicationStatus {
        match self {
            Operation::Review => ApplicationStatus::UnderReview,
            Operation::Approve => ApplicationStatus::Approved,
            Operation::Reject => ApplicationStatus::Rejected,
            Operation::Disburse => ApplicationStatus::Disbursed,
        }
    }

    /// operations legal from `status`
    pub fn available_from(status: ApplicationStatus) -> Vec<Operation> {
        [
            Operation::Review,
            Operation::Approve,
            Operation::Reject,
            Operation::Disburse,
        ]
        .into_iter()
        .filter(|op| op.required_status() == status)
        .collect()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Review => "review",
            Operation::Approve => "approve",
            Operation::Reject => "reject",
            Operation::Disburse => "disburse",
        };
        f.write_str(name)
    }
}

/// an operation together with its arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    Review,
    Approve {
        amount: Money,
        rate: Rate,
    },
    Reject {
        reason: String,
    },
    Disburse,
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Command::Review => Operation::Review,
            Command::Approve { .. } => Operation::Approve,
            Command::Reject { .. } => Operation::Reject,
            Command::Disburse => Operation::Disburse,
        }
    }
}

/// outcome of an accepted operation
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: Option<ApplicationStatus>,
    pub application: LoanApplication,
    pub event: ApplicationEvent,
}

/// validates and applies lifecycle operations
pub struct LifecycleStateMachine<'c> {
    clock: &'c dyn Clock,
}

impl<'c> LifecycleStateMachine<'c> {
    pub fn new(clock: &'c dyn Clock) -> Self {
        Self { clock }
    }

    /// price a new application and create it in SUBMITTED.
    ///
    /// customer existence and the active-application ceiling need the store
    /// and are checked by the caller around this.
    pub fn submit(&self, request: NewApplication) -> Result<Transition> {
        request.validate()?;

        let rate = pricing::quote_rate(request.loan_type, request.loan_amount);
        let application = LoanApplication::submitted(request, rate, self.clock.now())?;
        let event = ApplicationEvent::Submitted {
            customer_id: application.customer_id(),
            loan_type: application.loan_type(),
            loan_amount: application.loan_amount(),
            interest_rate: application.interest_rate(),
            monthly_payment: application.monthly_payment(),
        };

        Ok(Transition {
            from: None,
            application,
            event,
        })
    }

    pub fn review(&self, current: &LoanApplication) -> Result<Transition> {
        self.apply(current, Command::Review)
    }

    pub fn approve(&self, current: &LoanApplication, amount: Money, rate: Rate) -> Result<Transition> {
        self.apply(current, Command::Approve { amount, rate })
    }

    pub fn reject(&self, current: &LoanApplication, reason: impl Into<String>) -> Result<Transition> {
        self.apply(
            current,
            Command::Reject {
                reason: reason.into(),
            },
        )
    }

    pub fn disburse(&self, current: &LoanApplication) -> Result<Transition> {
        self.apply(current, Command::Disburse)
    }

    /// guard on the current status, validate arguments, then produce the next record
    pub fn apply(&self, current: &LoanApplication, command: Command) -> Result<Transition> {
        let operation = command.operation();
        if current.status() != operation.required_status() {
            return Err(LoanError::InvalidTransition {
                current: current.status(),
                operation,
            });
        }

        let now = self.clock.now();
        let mut next = current.clone();

        let event = match command {
            Command::Review => ApplicationEvent::ReviewStarted,
            Command::Approve { amount, rate } => {
                validate_terms(amount, next.loan_term_months())?;
                if rate.is_negative() {
                    return Err(LoanError::validation(format!(
                        "interest rate must not be negative, got {rate}"
                    )));
                }
                next.set_terms(amount, rate)?;
                next.approval_date = Some(now);
                ApplicationEvent::Approved {
                    loan_amount: next.loan_amount(),
                    interest_rate: next.interest_rate(),
                    monthly_payment: next.monthly_payment(),
                }
            }
            Command::Reject { reason } => {
                next.rejection_reason = Some(reason.clone());
                ApplicationEvent::Rejected { reason }
            }
            Command::Disburse => ApplicationEvent::Disbursed {
                loan_amount: next.loan_amount(),
            },
        };

        next.status = operation.target_status();
        next.updated_at = now;

        Ok(Transition {
            from: Some(current.status()),
            application: next,
            event,
        })
    }
}
