use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::domain::{CreateDonationRequest, Donation, DonationId};

/// Storage abstraction so the service can run against Postgres or memory.
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// Persist a new donation. The store assigns the id, timestamps, and `pending` status.
    async fn insert(&self, request: CreateDonationRequest) -> Result<Donation, RepositoryError>;
    async fn fetch(&self, id: DonationId) -> Result<Option<Donation>, RepositoryError>;
    /// Most recent donations first.
    async fn list(&self, limit: usize) -> Result<Vec<Donation>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("donation not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored donation is malformed: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Process-local store backing tests and `serve --in-memory`.
#[derive(Debug, Default)]
pub struct InMemoryDonationRepository {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i32,
    donations: Vec<Donation>,
}

impl InMemoryDonationRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("donation store lock poisoned".to_string()))
    }
}

#[async_trait]
impl DonationRepository for InMemoryDonationRepository {
    async fn insert(&self, request: CreateDonationRequest) -> Result<Donation, RepositoryError> {
        let mut state = self.lock()?;
        state.last_id += 1;

        let donation = request.into_donation(DonationId(state.last_id), Utc::now());
        state.donations.push(donation.clone());
        Ok(donation)
    }

    async fn fetch(&self, id: DonationId) -> Result<Option<Donation>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .donations
            .iter()
            .find(|donation| donation.id == id)
            .cloned())
    }

    async fn list(&self, limit: usize) -> Result<Vec<Donation>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.donations.iter().rev().take(limit).cloned().collect())
    }
}
