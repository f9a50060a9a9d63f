//! Donation intake, normalization, persistence, and public/administrative projections.

pub mod domain;
pub mod mappers;
pub mod normalize;
pub mod postgres;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    CreateDonationRequest, Donation, DonationId, DonationResponse, DonationStatus, DonationType,
    PublicDonation, RecurringInterval, UnknownToken,
};
pub use mappers::{
    to_create_donation_request, to_donation_response, to_donation_responses, to_public_donation,
    to_public_donations,
};
pub use normalize::{
    normalize_donation_amount, normalize_donor_name, normalize_interval, AmountInput,
};
pub use postgres::PgDonationRepository;
pub use repository::{DonationRepository, InMemoryDonationRepository, RepositoryError};
pub use router::donation_router;
pub use service::{DonationService, DonationServiceError};
pub use validation::{
    CreateDonationDto, DonationValidationError, FieldViolation, ValidDonationSubmission,
};
