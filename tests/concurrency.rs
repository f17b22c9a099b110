use std::sync::Arc;

use chrono::{TimeZone, Utc};
use loan_lifecycle_rs::{
    ApplicationStatus, EngineConfig, FixedClock, InMemoryApplicationStore,
    InMemoryCustomerDirectory, LoanError, LoanService, LoanType, Money, NewApplication, Rate,
};
use tokio::task::JoinSet;

async fn service() -> (Arc<LoanService<FixedClock>>, loan_lifecycle_rs::CustomerId) {
    let directory = InMemoryCustomerDirectory::new();
    let customer = directory.register_new().await;
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());

    let service = LoanService::new(
        Box::new(InMemoryApplicationStore::new()),
        Box::new(directory),
        EngineConfig::default(),
        clock,
    )
    .unwrap();

    (Arc::new(service), customer)
}

fn request(customer: loan_lifecycle_rs::CustomerId) -> NewApplication {
    NewApplication::new(customer, Money::from_major(40_000), LoanType::Home, 120, "renovation")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_approvals_yield_exactly_one_winner() {
    let (service, customer) = service().await;
    let id = service.submit(request(customer)).await.unwrap().id().unwrap();
    service.review(id).await.unwrap();

    let mut tasks = JoinSet::new();
    for i in 0..16u32 {
        let service = Arc::clone(&service);
        tasks.spawn(async move {
            service
                .approve(id, Money::from_major(35_000 + i as i64), Rate::from_percentage(6))
                .await
        });
    }

    let mut approved = Vec::new();
    let mut refused = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(app) => approved.push(app),
            Err(LoanError::InvalidTransition { current, .. }) => {
                assert_eq!(current, ApplicationStatus::Approved);
                refused += 1;
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(approved.len(), 1);
    assert_eq!(refused, 15);

    // the stored record is the winner's, not a later overwrite
    let stored = service.get(id).await.unwrap();
    assert_eq!(stored, approved[0]);
    assert!(stored.is_payment_consistent());
    assert_eq!(service.history(id).await.unwrap().len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn approve_and_reject_race_has_one_outcome() {
    let (service, customer) = service().await;
    let id = service.submit(request(customer)).await.unwrap().id().unwrap();
    service.review(id).await.unwrap();

    let approver = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service.approve(id, Money::from_major(40_000), Rate::from_percentage(6)).await
        })
    };
    let rejecter = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.reject(id, "appraisal too low").await })
    };

    let approved = approver.await.unwrap();
    let rejected = rejecter.await.unwrap();
    assert!(approved.is_ok() != rejected.is_ok());

    let stored = service.get(id).await.unwrap();
    if approved.is_ok() {
        assert_eq!(stored.status(), ApplicationStatus::Approved);
        assert!(stored.rejection_reason().is_none());
    } else {
        assert_eq!(stored.status(), ApplicationStatus::Rejected);
        assert!(stored.approval_date().is_none());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_respect_the_ceiling() {
    let (service, customer) = service().await;

    let mut tasks = JoinSet::new();
    for _ in 0..20 {
        let service = Arc::clone(&service);
        tasks.spawn(async move { service.submit(request(customer)).await });
    }

    let mut accepted = 0;
    let mut limited = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(_) => accepted += 1,
            Err(LoanError::LimitExceeded { limit, .. }) => {
                assert_eq!(limit, 3);
                limited += 1;
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(accepted, 3);
    assert_eq!(limited, 17);
    assert_eq!(service.by_customer(customer).await.unwrap().len(), 3);
}
