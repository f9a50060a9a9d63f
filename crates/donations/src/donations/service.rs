use std::sync::Arc;

use tracing::info;

use super::domain::{Donation, DonationId};
use super::mappers::to_create_donation_request;
use super::repository::{DonationRepository, RepositoryError};
use super::validation::{CreateDonationDto, DonationValidationError};

/// Service composing validation, mapping, and the repository.
pub struct DonationService<R> {
    repository: Arc<R>,
}

impl<R> DonationService<R>
where
    R: DonationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate and persist a new donation. Nothing is stored when any field is invalid.
    #[tracing::instrument(skip_all, fields(donation_type = ?dto.donation_type))]
    pub async fn submit(&self, dto: CreateDonationDto) -> Result<Donation, DonationServiceError> {
        let submission = dto.into_submission()?;
        let request = to_create_donation_request(submission);
        let donation = self.repository.insert(request).await?;

        info!(
            donation_id = %donation.id,
            donation_type = donation.donation_type.label(),
            "donation accepted"
        );
        Ok(donation)
    }

    pub async fn get(&self, id: DonationId) -> Result<Donation, DonationServiceError> {
        let donation = self
            .repository
            .fetch(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        Ok(donation)
    }

    pub async fn list(&self, limit: usize) -> Result<Vec<Donation>, DonationServiceError> {
        Ok(self.repository.list(limit).await?)
    }
}

/// Error raised by the donation service.
#[derive(Debug, thiserror::Error)]
pub enum DonationServiceError {
    #[error(transparent)]
    Validation(#[from] DonationValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
