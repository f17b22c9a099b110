/// lifecycle - submit, review, approve and disburse an application
use chrono::{Duration, TimeZone, Utc};
use loan_lifecycle_rs::{
    EngineConfig, InMemoryApplicationStore, InMemoryCustomerDirectory, LoanService, LoanType,
    Money, NewApplication, Rate, SafeTimeProvider, TimeSource,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let time = Arc::new(SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
    )));
    let controller = time.test_control().unwrap();

    let customers = InMemoryCustomerDirectory::new();
    let customer = customers.register_new().await;

    let service = LoanService::new(
        Box::new(InMemoryApplicationStore::new()),
        Box::new(customers),
        EngineConfig::default(),
        Arc::clone(&time),
    )?;

    let submitted = service
        .submit(NewApplication::new(
            customer,
            Money::from_major(25_000),
            LoanType::Auto,
            48,
            "family car",
        ))
        .await?;
    let id = submitted.id().ok_or("store did not assign an id")?;
    println!(
        "submitted {id}: rate {} payment ${}",
        submitted.interest_rate(),
        submitted.monthly_payment()
    );

    controller.advance(Duration::days(1));
    service.review(id).await?;

    controller.advance(Duration::days(2));
    let approved = service
        .approve(id, Money::from_major(22_000), Rate::from_percentage(7))
        .await?;
    println!(
        "approved on {}: ${} at {} -> ${}/month",
        approved.approval_date().map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
        approved.loan_amount(),
        approved.interest_rate(),
        approved.monthly_payment()
    );

    controller.advance(Duration::days(1));
    service.disburse(id).await?;

    // approving again is refused and changes nothing
    if let Err(e) = service.approve(id, Money::from_major(1), Rate::ZERO).await {
        println!("second approval refused: {e}");
    }

    println!("\n{}", service.get(id).await?.to_json_pretty()?);

    for record in service.history(id).await? {
        println!("{} {:?}", record.timestamp.format("%Y-%m-%d"), record.event);
    }

    Ok(())
}
