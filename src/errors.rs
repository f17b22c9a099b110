use thiserror::Error;

use crate::lifecycle::Operation;
use crate::store::StoreError;
use crate::types::{ApplicationId, ApplicationStatus, CustomerId};

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("loan application not found: {id}")]
    ApplicationNotFound {
        id: ApplicationId,
    },

    #[error("customer not found: {customer_id}")]
    CustomerNotFound {
        customer_id: CustomerId,
    },

    #[error("cannot {operation} an application in status {current}")]
    InvalidTransition {
        current: ApplicationStatus,
        operation: Operation,
    },

    #[error("customer {customer_id} has {active} active applications, limit is {limit}")]
    LimitExceeded {
        customer_id: CustomerId,
        active: usize,
        limit: u32,
    },

    #[error("validation failed: {message}")]
    Validation {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// coarse failure classes a boundary layer maps onto its own status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidTransition,
    LimitExceeded,
    Validation,
    Storage,
}

impl LoanError {
    pub fn validation(message: impl Into<String>) -> Self {
        LoanError::Validation {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LoanError::ApplicationNotFound { .. } | LoanError::CustomerNotFound { .. } => {
                ErrorKind::NotFound
            }
            LoanError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            LoanError::LimitExceeded { .. } => ErrorKind::LimitExceeded,
            LoanError::Validation { .. } | LoanError::InvalidConfiguration { .. } => {
                ErrorKind::Validation
            }
            LoanError::Store(StoreError::NotFound { .. }) => ErrorKind::NotFound,
            LoanError::Store(_) => ErrorKind::Storage,
        }
    }

    /// only a lost optimistic-concurrency race is worth retrying unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, LoanError::Store(StoreError::VersionConflict { .. }))
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
