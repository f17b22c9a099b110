use crate::config::EngineConfig;
use crate::store::{ApplicationStore, StoreResult};
use crate::types::CustomerId;

/// caps how many SUBMITTED / UNDER_REVIEW applications a customer may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationLimiter {
    max_active: u32,
}

impl ApplicationLimiter {
    pub fn new(max_active: u32) -> Self {
        Self { max_active }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_active_applications)
    }

    pub fn max_active(&self) -> u32 {
        self.max_active
    }

    /// whether one more application fits next to `active_count` existing ones
    pub fn admits(&self, active_count: usize) -> bool {
        active_count < self.max_active as usize
    }

    /// point-in-time check against the store.
    ///
    /// advisory only: the answer can be stale by the time an insert happens.
    /// submissions go through `ApplicationStore::insert_within_limit`, which
    /// counts and inserts under one lock.
    pub async fn can_submit(&self, store: &dyn ApplicationStore, customer_id: CustomerId) -> StoreResult<bool> {
        let active = store.count_active(customer_id).await?;
        Ok(self.admits(active))
    }
}

impl Default for ApplicationLimiter {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceiling_is_inclusive() {
        let limiter = ApplicationLimiter::default();
        assert_eq!(limiter.max_active(), 3);
        assert!(limiter.admits(0));
        assert!(limiter.admits(2));
        assert!(!limiter.admits(3));
        assert!(!limiter.admits(4));
    }

    #[test]
    fn test_configured_ceiling() {
        let config = EngineConfig::default().with_max_active_applications(1);
        let limiter = ApplicationLimiter::from_config(&config);
        assert!(limiter.admits(0));
        assert!(!limiter.admits(1));
    }
}
