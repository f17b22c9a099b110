use hourglass_rs::SafeTimeProvider;
use tracing::{debug, info, warn};

use crate::application::{LoanApplication, NewApplication};
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::events::{EventLog, EventRecord};
use crate::lifecycle::{Command, LifecycleStateMachine, Transition};
use crate::limiter::ApplicationLimiter;
use crate::store::{Admission, ApplicationStoreBox, CustomerDirectoryBox, StoreError};
use crate::types::{ApplicationId, ApplicationStatus, CustomerId};

/// Request-level entry point for loan applications.
///
/// Each call reads the current record, runs it through the
/// [`LifecycleStateMachine`] and writes the result back. Concurrent calls are
/// made safe by the store: submissions use a ceiling-guarded insert and
/// transitions use versioned updates. A transition that loses a write race is
/// re-validated against the fresh record, so of several racing approvals
/// exactly one succeeds and the rest fail with `InvalidTransition`.
pub struct LoanService<C = SafeTimeProvider> {
    applications: ApplicationStoreBox,
    customers: CustomerDirectoryBox,
    limiter: ApplicationLimiter,
    config: EngineConfig,
    clock: C,
    events: EventLog,
}

impl<C: Clock> LoanService<C> {
    pub fn new(
        applications: ApplicationStoreBox,
        customers: CustomerDirectoryBox,
        config: EngineConfig,
        clock: C,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            applications,
            customers,
            limiter: ApplicationLimiter::from_config(&config),
            config,
            clock,
            events: EventLog::new(),
        })
    }

    fn machine(&self) -> LifecycleStateMachine<'_> {
        LifecycleStateMachine::new(&self.clock)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn limiter(&self) -> &ApplicationLimiter {
        &self.limiter
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// accept a new application in SUBMITTED
    pub async fn submit(&self, request: NewApplication) -> Result<LoanApplication> {
        let customer_id = request.customer_id;
        info!(
            %customer_id,
            amount = %request.loan_amount,
            loan_type = %request.loan_type,
            term = request.loan_term_months,
            "submitting loan application"
        );

        // bad terms are reported before the customer lookup
        request.validate()?;

        if !self.customers.exists(customer_id).await? {
            warn!(%customer_id, "submission for unknown customer");
            return Err(LoanError::CustomerNotFound { customer_id });
        }

        let Transition { application, event, .. } = self.machine().submit(request)?;

        match self.applications.insert_within_limit(application, &self.limiter).await? {
            Admission::Admitted(saved) => {
                let id = saved.id().ok_or(StoreError::Unpersisted)?;
                self.events.record(id, saved.created_at(), event).await;
                info!(
                    %id,
                    %customer_id,
                    rate = %saved.interest_rate(),
                    monthly_payment = %saved.monthly_payment(),
                    "loan application submitted"
                );
                Ok(saved)
            }
            Admission::Refused { active } => {
                warn!(%customer_id, active, limit = self.limiter.max_active(), "active application limit reached");
                Err(LoanError::LimitExceeded {
                    customer_id,
                    active,
                    limit: self.limiter.max_active(),
                })
            }
        }
    }

    /// SUBMITTED -> UNDER_REVIEW
    pub async fn review(&self, id: ApplicationId) -> Result<LoanApplication> {
        self.apply(id, Command::Review).await
    }

    /// UNDER_REVIEW -> APPROVED with the approved amount and rate
    pub async fn approve(&self, id: ApplicationId, amount: Money, rate: Rate) -> Result<LoanApplication> {
        self.apply(id, Command::Approve { amount, rate }).await
    }

    /// UNDER_REVIEW -> REJECTED
    pub async fn reject(&self, id: ApplicationId, reason: impl Into<String>) -> Result<LoanApplication> {
        self.apply(
            id,
            Command::Reject {
                reason: reason.into(),
            },
        )
        .await
    }

    /// APPROVED -> DISBURSED
    pub async fn disburse(&self, id: ApplicationId) -> Result<LoanApplication> {
        self.apply(id, Command::Disburse).await
    }

    /// run `command` against the stored record, re-validating after lost races
    pub async fn apply(&self, id: ApplicationId, command: Command) -> Result<LoanApplication> {
        let operation = command.operation();
        let mut conflicts = 0;

        loop {
            let current = self
                .applications
                .get(id)
                .await?
                .ok_or(LoanError::ApplicationNotFound { id })?;

            let result = self.machine().apply(&current, command.clone());
            let transition = match result {
                Ok(transition) => transition,
                Err(e) => {
                    warn!(%id, %operation, status = %current.status(), error = %e, "operation refused");
                    return Err(e);
                }
            };

            let Transition { from, application, event } = transition;
            let timestamp = application.updated_at();

            match self.applications.update(application).await {
                Ok(saved) => {
                    self.events.record(id, timestamp, event).await;
                    info!(
                        %id,
                        %operation,
                        from = ?from,
                        to = %saved.status(),
                        "loan application transitioned"
                    );
                    return Ok(saved);
                }
                Err(StoreError::VersionConflict { expected, found, .. })
                    if conflicts < self.config.max_conflict_retries =>
                {
                    conflicts += 1;
                    debug!(%id, %operation, expected, found, attempt = conflicts, "write conflict, re-reading");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// advisory ceiling check; `submit` re-checks atomically
    pub async fn can_submit(&self, customer_id: CustomerId) -> Result<bool> {
        Ok(self.limiter.can_submit(self.applications.as_ref(), customer_id).await?)
    }

    pub async fn get(&self, id: ApplicationId) -> Result<LoanApplication> {
        self.applications
            .get(id)
            .await?
            .ok_or(LoanError::ApplicationNotFound { id })
    }

    pub async fn by_customer(&self, customer_id: CustomerId) -> Result<Vec<LoanApplication>> {
        Ok(self.applications.find_by_customer(customer_id).await?)
    }

    pub async fn by_status(&self, status: ApplicationStatus) -> Result<Vec<LoanApplication>> {
        Ok(self.applications.find_by_status(status).await?)
    }

    /// applications waiting on an underwriter, oldest first
    pub async fn pending(&self) -> Result<Vec<LoanApplication>> {
        let mut pending = self.applications.find_by_status(ApplicationStatus::UnderReview).await?;
        pending.sort_by_key(|a| a.created_at());
        Ok(pending)
    }

    pub async fn all(&self) -> Result<Vec<LoanApplication>> {
        Ok(self.applications.all().await?)
    }

    /// sum of loan amounts across every application
    pub async fn total_loan_value(&self) -> Result<Money> {
        Ok(self.applications.all().await?.iter().map(|a| a.loan_amount()).sum())
    }

    pub async fn total_loan_value_by_status(&self, status: ApplicationStatus) -> Result<Money> {
        Ok(self
            .applications
            .find_by_status(status)
            .await?
            .iter()
            .map(|a| a.loan_amount())
            .sum())
    }

    /// committed events for one application
    pub async fn history(&self, id: ApplicationId) -> Result<Vec<EventRecord>> {
        self.get(id).await?;
        Ok(self.events.for_application(id).await)
    }
}
