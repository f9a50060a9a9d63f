use chrono::Utc;
use clap::Args;
use donations::donations::{
    to_create_donation_request, to_public_donation, CreateDonationDto, CreateDonationRequest,
    DonationId, DonationServiceError, PublicDonation,
};
use donations::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// JSON file holding a single donation submission
    pub(crate) file: PathBuf,
}

/// Outcome of checking a submission offline.
#[derive(Debug)]
pub(crate) struct SubmissionPreview {
    pub(crate) request: CreateDonationRequest,
    pub(crate) public: PublicDonation,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.file)?;

    match preview_submission(&raw) {
        Ok(preview) => {
            render_preview(&preview)?;
            Ok(())
        }
        Err(AppError::Donation(DonationServiceError::Validation(err))) => {
            println!("Submission rejected ({} violations)", err.violations.len());
            for violation in &err.violations {
                println!(
                    "  - {} [{}]: {}",
                    violation.field, violation.constraint, violation.message
                );
            }
            Err(DonationServiceError::Validation(err).into())
        }
        Err(other) => Err(other),
    }
}

pub(crate) fn preview_submission(raw: &str) -> Result<SubmissionPreview, AppError> {
    let dto: CreateDonationDto = serde_json::from_str(raw)?;
    let submission = dto
        .into_submission()
        .map_err(DonationServiceError::from)?;
    let request = to_create_donation_request(submission);

    let unsaved = request.clone().into_donation(DonationId(0), Utc::now());

    Ok(SubmissionPreview {
        public: to_public_donation(&unsaved),
        request,
    })
}

fn render_preview(preview: &SubmissionPreview) -> Result<(), AppError> {
    let request = &preview.request;
    println!("Submission accepted");
    println!("  Donor: {} {} <{}>", request.first_name, request.last_name, request.email);
    println!("  Amount: {}", request.amount);
    println!("  Type: {}", request.donation_type.label());
    if let Some(interval) = request.recurring_interval {
        println!("  Interval: {}", interval.label());
    }
    println!("  Anonymous: {}", request.is_anonymous);
    println!();
    println!("Public preview:");
    let rendered = serde_json::to_string_pretty(&preview.public)?;
    println!("{rendered}");
    Ok(())
}
