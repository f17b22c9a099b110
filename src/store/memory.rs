use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{Admission, ApplicationStore, CustomerDirectory, StoreError, StoreResult};
use crate::application::LoanApplication;
use crate::limiter::ApplicationLimiter;
use crate::types::{ApplicationId, ApplicationStatus, CustomerId};

/// thread-safe in-memory application store.
///
/// Every write takes the map's write lock, which serializes version checks
/// and guarded inserts for all customers at once.
#[derive(Default, Clone)]
pub struct InMemoryApplicationStore {
    applications: Arc<RwLock<HashMap<ApplicationId, LoanApplication>>>,
}

impl InMemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut applications: Vec<LoanApplication>) -> Vec<LoanApplication> {
        applications.sort_by_key(|a| (a.created_at, a.id));
        applications
    }
}

fn active_for(applications: &HashMap<ApplicationId, LoanApplication>, customer_id: CustomerId) -> usize {
    applications
        .values()
        .filter(|a| a.customer_id == customer_id && a.is_active())
        .count()
}

#[async_trait]
impl ApplicationStore for InMemoryApplicationStore {
    async fn get(&self, id: ApplicationId) -> StoreResult<Option<LoanApplication>> {
        let applications = self.applications.read().await;
        Ok(applications.get(&id).cloned())
    }

    async fn insert_within_limit(
        &self,
        mut application: LoanApplication,
        limiter: &ApplicationLimiter,
    ) -> StoreResult<Admission> {
        let mut applications = self.applications.write().await;

        let active = active_for(&applications, application.customer_id);
        if !limiter.admits(active) {
            return Ok(Admission::Refused { active });
        }

        let id = Uuid::new_v4();
        application.id = Some(id);
        application.version = 1;
        applications.insert(id, application.clone());
        debug!(%id, customer_id = %application.customer_id, active = active + 1, "application inserted");

        Ok(Admission::Admitted(application))
    }

    async fn update(&self, mut application: LoanApplication) -> StoreResult<LoanApplication> {
        let id = application.id.ok_or(StoreError::Unpersisted)?;
        let mut applications = self.applications.write().await;

        let stored = applications.get(&id).ok_or(StoreError::NotFound { id })?;
        if stored.version != application.version {
            return Err(StoreError::VersionConflict {
                id,
                expected: application.version,
                found: stored.version,
            });
        }

        application.version += 1;
        applications.insert(id, application.clone());
        debug!(%id, version = application.version, status = %application.status, "application updated");

        Ok(application)
    }

    async fn count_active(&self, customer_id: CustomerId) -> StoreResult<usize> {
        let applications = self.applications.read().await;
        Ok(active_for(&applications, customer_id))
    }

    async fn find_by_customer(&self, customer_id: CustomerId) -> StoreResult<Vec<LoanApplication>> {
        let applications = self.applications.read().await;
        Ok(Self::sorted(
            applications
                .values()
                .filter(|a| a.customer_id == customer_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_status(&self, status: ApplicationStatus) -> StoreResult<Vec<LoanApplication>> {
        let applications = self.applications.read().await;
        Ok(Self::sorted(
            applications
                .values()
                .filter(|a| a.status == status)
                .cloned()
                .collect(),
        ))
    }

    async fn all(&self) -> StoreResult<Vec<LoanApplication>> {
        let applications = self.applications.read().await;
        Ok(Self::sorted(applications.values().cloned().collect()))
    }
}

/// in-memory set of known customer ids
#[derive(Default, Clone)]
pub struct InMemoryCustomerDirectory {
    customers: Arc<RwLock<HashSet<CustomerId>>>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, customer_id: CustomerId) {
        self.customers.write().await.insert(customer_id);
    }

    /// register a fresh customer and return its id
    pub async fn register_new(&self) -> CustomerId {
        let customer_id = Uuid::new_v4();
        self.register(customer_id).await;
        customer_id
    }

    pub async fn remove(&self, customer_id: CustomerId) -> bool {
        self.customers.write().await.remove(&customer_id)
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomerDirectory {
    async fn exists(&self, customer_id: CustomerId) -> StoreResult<bool> {
        Ok(self.customers.read().await.contains(&customer_id))
    }
}
