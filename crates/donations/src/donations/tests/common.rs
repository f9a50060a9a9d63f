use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::donations::domain::{
    CreateDonationRequest, Donation, DonationId, DonationStatus, DonationType,
};
use crate::donations::normalize::AmountInput;
use crate::donations::repository::{
    DonationRepository, InMemoryDonationRepository, RepositoryError,
};
use crate::donations::validation::CreateDonationDto;
use crate::donations::{donation_router, DonationService};

pub(super) fn donation() -> Donation {
    Donation {
        id: DonationId(123),
        first_name: "John".to_string(),
        last_name: "Smith".to_string(),
        email: "john.smith@example.com".to_string(),
        amount: Decimal::new(10000, 2),
        is_anonymous: false,
        donation_type: DonationType::OneTime,
        recurring_interval: None,
        dedication_message: Some("for the Fenway community".to_string()),
        show_dedication_publicly: true,
        status: DonationStatus::Completed,
        created_at: Utc
            .with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
            .single()
            .expect("valid timestamp"),
        updated_at: Utc
            .with_ymd_and_hms(2024, 1, 15, 10, 35, 0)
            .single()
            .expect("valid timestamp"),
        transaction_id: Some("txn_1234567890".to_string()),
    }
}

pub(super) fn submission() -> CreateDonationDto {
    CreateDonationDto {
        first_name: Some("John".to_string()),
        last_name: Some("Smith".to_string()),
        email: Some("john.smith@example.com".to_string()),
        amount: Some(AmountInput::Number(100.0)),
        is_anonymous: Some(false),
        donation_type: Some("one_time".to_string()),
        recurring_interval: None,
        dedication_message: Some("for the Fenway community".to_string()),
        show_dedication_publicly: Some(true),
        mistyped_fields: Vec::new(),
    }
}

pub(super) fn minimal_submission() -> CreateDonationDto {
    CreateDonationDto {
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        email: Some("jane.doe@example.com".to_string()),
        amount: Some(AmountInput::Number(50.0)),
        donation_type: Some("one_time".to_string()),
        ..CreateDonationDto::default()
    }
}

pub(super) fn anonymous_submission() -> CreateDonationDto {
    CreateDonationDto {
        is_anonymous: Some(true),
        ..minimal_submission()
    }
}

pub(super) fn recurring_submission() -> CreateDonationDto {
    CreateDonationDto {
        donation_type: Some("recurring".to_string()),
        recurring_interval: Some("monthly".to_string()),
        ..submission()
    }
}

pub(super) fn memory_service() -> (
    DonationService<InMemoryDonationRepository>,
    Arc<InMemoryDonationRepository>,
) {
    let repository = Arc::new(InMemoryDonationRepository::default());
    (DonationService::new(repository.clone()), repository)
}

pub(super) fn memory_router() -> axum::Router {
    let (service, _) = memory_service();
    donation_router(Arc::new(service))
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl DonationRepository for UnavailableRepository {
    async fn insert(&self, _request: CreateDonationRequest) -> Result<Donation, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn fetch(&self, _id: DonationId) -> Result<Option<Donation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn list(&self, _limit: usize) -> Result<Vec<Donation>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
