pub mod application;
pub mod clock;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod lifecycle;
pub mod limiter;
pub mod payments;
pub mod pricing;
pub mod service;
pub mod store;
pub mod types;

// re-export key types
pub use application::{LoanApplication, NewApplication};
pub use clock::{Clock, FixedClock};
pub use config::EngineConfig;
pub use decimal::{Money, Rate};
pub use errors::{ErrorKind, LoanError, Result};
pub use events::{ApplicationEvent, EventLog, EventRecord};
pub use lifecycle::{Command, LifecycleStateMachine, Operation, Transition};
pub use limiter::ApplicationLimiter;
pub use payments::AmortizationCalculator;
pub use pricing::{RateAdjuster, RateTable};
pub use service::LoanService;
pub use store::{
    Admission, ApplicationStore, CustomerDirectory, InMemoryApplicationStore,
    InMemoryCustomerDirectory, StoreError,
};
pub use types::{ApplicationId, ApplicationStatus, CustomerId, LoanType};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
