use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::decimal::{Money, Rate};
use crate::types::{ApplicationId, CustomerId, LoanType};

/// what happened to an application in one accepted operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationEvent {
    Submitted {
        customer_id: CustomerId,
        loan_type: LoanType,
        loan_amount: Money,
        interest_rate: Rate,
        monthly_payment: Money,
    },
    ReviewStarted,
    Approved {
        loan_amount: Money,
        interest_rate: Rate,
        monthly_payment: Money,
    },
    Rejected {
        reason: String,
    },
    Disbursed {
        loan_amount: Money,
    },
}

/// event tied to the application and the instant it was committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub application_id: ApplicationId,
    pub timestamp: DateTime<Utc>,
    pub event: ApplicationEvent,
}

/// append-only history of committed transitions
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    records: Arc<RwLock<Vec<EventRecord>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, application_id: ApplicationId, timestamp: DateTime<Utc>, event: ApplicationEvent) {
        let mut records = self.records.write().await;
        records.push(EventRecord {
            application_id,
            timestamp,
            event,
        });
    }

    /// events for one application in commit order
    pub async fn for_application(&self, application_id: ApplicationId) -> Vec<EventRecord> {
        let records = self.records.read().await;
        records
            .iter()
            .filter(|r| r.application_id == application_id)
            .cloned()
            .collect()
    }

    pub async fn all(&self) -> Vec<EventRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_history_is_per_application() {
        let log = EventLog::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        log.record(first, at, ApplicationEvent::ReviewStarted).await;
        log.record(second, at, ApplicationEvent::ReviewStarted).await;
        log.record(
            first,
            at,
            ApplicationEvent::Rejected {
                reason: "incomplete documents".to_string(),
            },
        )
        .await;

        let history = log.for_application(first).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].event, ApplicationEvent::ReviewStarted);
        assert!(matches!(history[1].event, ApplicationEvent::Rejected { .. }));
        assert_eq!(log.len().await, 3);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let json = serde_json::to_value(ApplicationEvent::Disbursed {
            loan_amount: Money::from_major(100),
        })
        .unwrap();
        assert_eq!(json["type"], "DISBURSED");
        assert_eq!(json["loan_amount"], "100.00");
    }
}
