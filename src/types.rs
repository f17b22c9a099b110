use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a loan application, assigned by the store
pub type ApplicationId = Uuid;

/// reference to an externally owned customer record
pub type CustomerId = Uuid;

/// loan categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanType {
    Personal,
    Auto,
    Home,
    Student,
    Business,
}

impl LoanType {
    pub const ALL: [LoanType; 5] = [
        LoanType::Personal,
        LoanType::Auto,
        LoanType::Home,
        LoanType::Student,
        LoanType::Business,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::Personal => "PERSONAL",
            LoanType::Auto => "AUTO",
            LoanType::Home => "HOME",
            LoanType::Student => "STUDENT",
            LoanType::Business => "BUSINESS",
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for LoanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LoanType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown loan type: {s}"))
    }
}

/// application status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    /// received, waiting for an underwriter
    Submitted,
    /// picked up by an underwriter
    UnderReview,
    /// terms fixed, waiting for disbursement
    Approved,
    /// declined with a reason
    Rejected,
    /// funds released
    Disbursed,
    /// withdrawn; no transition leads here yet
    Cancelled,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
        ApplicationStatus::Disbursed,
        ApplicationStatus::Cancelled,
    ];

    /// counts toward the per-customer ceiling
    pub fn is_active(&self) -> bool {
        matches!(self, ApplicationStatus::Submitted | ApplicationStatus::UnderReview)
    }

    /// no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected | ApplicationStatus::Disbursed | ApplicationStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "SUBMITTED",
            ApplicationStatus::UnderReview => "UNDER_REVIEW",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Disbursed => "DISBURSED",
            ApplicationStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
