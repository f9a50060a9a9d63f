use super::common::*;
use crate::donations::domain::{DonationId, DonationStatus, DonationType, RecurringInterval};
use crate::donations::repository::{DonationRepository, RepositoryError};
use crate::donations::validation::CreateDonationDto;
use crate::donations::{DonationService, DonationServiceError};
use rust_decimal::Decimal;
use std::sync::Arc;

#[tokio::test]
async fn submit_stores_pending_donation() {
    let (service, repository) = memory_service();

    let donation = service.submit(submission()).await.expect("donation stored");

    assert_eq!(donation.id, DonationId(1));
    assert_eq!(donation.status, DonationStatus::Pending);
    assert_eq!(donation.amount, Decimal::new(10000, 2));
    assert_eq!(donation.transaction_id, None);
    assert_eq!(donation.created_at, donation.updated_at);

    let stored = repository
        .fetch(donation.id)
        .await
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored, donation);
}

#[tokio::test]
async fn submit_assigns_increasing_ids() {
    let (service, _) = memory_service();

    let first = service.submit(submission()).await.expect("first stored");
    let second = service
        .submit(recurring_submission())
        .await
        .expect("second stored");

    assert!(second.id.0 > first.id.0);
    assert_eq!(second.donation_type, DonationType::Recurring);
    assert_eq!(second.recurring_interval, Some(RecurringInterval::Monthly));
}

#[tokio::test]
async fn submit_rejects_invalid_payload_without_storing() {
    let (service, repository) = memory_service();

    let dto = CreateDonationDto {
        email: Some("invalid-email".to_string()),
        ..submission()
    };

    match service.submit(dto).await {
        Err(DonationServiceError::Validation(err)) => assert!(err.has_field("email")),
        other => panic!("expected validation error, got {other:?}"),
    }

    let stored = repository.list(10).await.expect("list succeeds");
    assert!(stored.is_empty(), "invalid submissions must not be stored");
}

#[tokio::test]
async fn get_returns_stored_donation() {
    let (service, _) = memory_service();
    let donation = service.submit(submission()).await.expect("donation stored");

    let fetched = service.get(donation.id).await.expect("donation present");
    assert_eq!(fetched, donation);
}

#[tokio::test]
async fn get_propagates_not_found() {
    let (service, _) = memory_service();

    match service.get(DonationId(42)).await {
        Err(DonationServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn list_returns_most_recent_first() {
    let (service, _) = memory_service();
    for _ in 0..3 {
        service.submit(submission()).await.expect("donation stored");
    }

    let listed = service.list(2).await.expect("list succeeds");
    let ids: Vec<i32> = listed.iter().map(|donation| donation.id.0).collect();
    assert_eq!(ids, vec![3, 2]);
}

#[tokio::test]
async fn repository_failures_propagate() {
    let service = DonationService::new(Arc::new(UnavailableRepository));

    match service.submit(submission()).await {
        Err(DonationServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected repository failure, got {other:?}"),
    }
    assert!(service.list(10).await.is_err());
    assert!(service.get(DonationId(1)).await.is_err());
}
