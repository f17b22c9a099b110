//! Persistence ports.
//!
//! The engine is stateless between calls; these traits carry the two
//! atomicity guarantees it relies on: versioned read-modify-write per
//! application, and count-then-insert per customer.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::application::LoanApplication;
use crate::limiter::ApplicationLimiter;
use crate::types::{ApplicationId, ApplicationStatus, CustomerId};

pub use memory::{InMemoryApplicationStore, InMemoryCustomerDirectory};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("application {id} was modified concurrently: expected version {expected}, found {found}")]
    VersionConflict {
        id: ApplicationId,
        expected: u64,
        found: u64,
    },

    #[error("application not found in store: {id}")]
    NotFound {
        id: ApplicationId,
    },

    #[error("application has no id; insert it before updating")]
    Unpersisted,

    #[error("backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// result of a ceiling-guarded insert
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Admitted(LoanApplication),
    Refused { active: usize },
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn get(&self, id: ApplicationId) -> StoreResult<Option<LoanApplication>>;

    /// count the customer's active applications and, if the limiter admits one
    /// more, assign an id and version 1 and insert, all in one critical section
    async fn insert_within_limit(
        &self,
        application: LoanApplication,
        limiter: &ApplicationLimiter,
    ) -> StoreResult<Admission>;

    /// replace a stored record if its version still matches, bumping the version
    async fn update(&self, application: LoanApplication) -> StoreResult<LoanApplication>;

    async fn count_active(&self, customer_id: CustomerId) -> StoreResult<usize>;

    async fn find_by_customer(&self, customer_id: CustomerId) -> StoreResult<Vec<LoanApplication>>;

    async fn find_by_status(&self, status: ApplicationStatus) -> StoreResult<Vec<LoanApplication>>;

    async fn all(&self) -> StoreResult<Vec<LoanApplication>>;
}

#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn exists(&self, customer_id: CustomerId) -> StoreResult<bool>;
}

pub type ApplicationStoreBox = Box<dyn ApplicationStore>;
pub type CustomerDirectoryBox = Box<dyn CustomerDirectory>;
