//! Translations between the submission, the stored entity, and both response shapes.

use super::domain::{
    CreateDonationRequest, Donation, DonationResponse, DonationType, PublicDonation,
};
use super::normalize::{normalize_donation_amount, normalize_donor_name};
use super::validation::ValidDonationSubmission;

pub fn to_create_donation_request(submission: ValidDonationSubmission) -> CreateDonationRequest {
    let recurring_interval = match submission.donation_type {
        DonationType::Recurring => submission.recurring_interval,
        DonationType::OneTime => None,
    };

    CreateDonationRequest {
        first_name: submission.first_name,
        last_name: submission.last_name,
        email: submission.email,
        amount: submission.amount,
        is_anonymous: submission.is_anonymous.unwrap_or(false),
        donation_type: submission.donation_type,
        recurring_interval,
        dedication_message: submission.dedication_message,
        show_dedication_publicly: submission.show_dedication_publicly.unwrap_or(false),
    }
}

pub fn to_donation_response(donation: &Donation) -> DonationResponse {
    DonationResponse {
        id: donation.id,
        first_name: donation.first_name.clone(),
        last_name: donation.last_name.clone(),
        email: donation.email.clone(),
        amount: normalize_donation_amount(donation.amount),
        is_anonymous: donation.is_anonymous,
        donation_type: donation.donation_type,
        recurring_interval: donation.effective_interval(),
        dedication_message: donation.dedication_message.clone(),
        show_dedication_publicly: donation.show_dedication_publicly,
        status: donation.status,
        created_at: donation.created_at,
        updated_at: donation.updated_at,
        transaction_id: donation.transaction_id.clone(),
    }
}

pub fn to_public_donation(donation: &Donation) -> PublicDonation {
    let full_name = format!("{} {}", donation.first_name, donation.last_name);
    let dedication_message = donation
        .dedication_message
        .as_ref()
        .filter(|message| donation.show_dedication_publicly && !message.is_empty())
        .cloned();

    PublicDonation {
        id: donation.id,
        donor_name: normalize_donor_name(Some(full_name), donation.is_anonymous),
        amount: normalize_donation_amount(donation.amount),
        is_anonymous: donation.is_anonymous,
        donation_type: donation.donation_type,
        recurring_interval: donation.effective_interval(),
        dedication_message,
        status: donation.status,
        created_at: donation.created_at,
    }
}

pub fn to_donation_responses(donations: &[Donation]) -> Vec<DonationResponse> {
    donations.iter().map(to_donation_response).collect()
}

pub fn to_public_donations(donations: &[Donation]) -> Vec<PublicDonation> {
    donations.iter().map(to_public_donation).collect()
}
