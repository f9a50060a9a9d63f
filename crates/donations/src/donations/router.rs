use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::DonationId;
use super::mappers::{
    to_donation_response, to_donation_responses, to_public_donation, to_public_donations,
};
use super::repository::{DonationRepository, RepositoryError};
use super::service::{DonationService, DonationServiceError};
use super::validation::CreateDonationDto;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    limit: Option<usize>,
}

impl ListQuery {
    fn page_size(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

/// Router builder exposing public and administrative donation endpoints.
pub fn donation_router<R>(service: Arc<DonationService<R>>) -> Router
where
    R: DonationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/donations",
            post(submit_handler::<R>).get(public_list_handler::<R>),
        )
        .route(
            "/api/v1/donations/:donation_id",
            get(public_detail_handler::<R>),
        )
        .route("/api/v1/admin/donations", get(admin_list_handler::<R>))
        .route(
            "/api/v1/admin/donations/:donation_id",
            get(admin_detail_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    payload: Result<Json<CreateDonationDto>, JsonRejection>,
) -> Response
where
    R: DonationRepository + 'static,
{
    let Json(dto) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let payload = json!({ "error": rejection.body_text() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.submit(dto).await {
        Ok(donation) => {
            (StatusCode::CREATED, Json(to_donation_response(&donation))).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn public_list_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: DonationRepository + 'static,
{
    match service.list(query.page_size()).await {
        Ok(donations) => (StatusCode::OK, Json(to_public_donations(&donations))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn public_detail_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Path(donation_id): Path<i32>,
) -> Response
where
    R: DonationRepository + 'static,
{
    match service.get(DonationId(donation_id)).await {
        Ok(donation) => (StatusCode::OK, Json(to_public_donation(&donation))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn admin_list_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: DonationRepository + 'static,
{
    match service.list(query.page_size()).await {
        Ok(donations) => {
            (StatusCode::OK, Json(to_donation_responses(&donations))).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn admin_detail_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Path(donation_id): Path<i32>,
) -> Response
where
    R: DonationRepository + 'static,
{
    match service.get(DonationId(donation_id)).await {
        Ok(donation) => (StatusCode::OK, Json(to_donation_response(&donation))).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: DonationServiceError) -> Response {
    match err {
        DonationServiceError::Validation(violations) => {
            let payload = json!({
                "error": violations.to_string(),
                "violations": violations.violations,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        DonationServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "donation not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        DonationServiceError::Repository(other) => {
            error!(error = %other, "donation repository failure");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
