use std::borrow::Cow;
use std::fmt;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use super::domain::{DonationType, RecurringInterval};
use super::normalize::AmountInput;

pub const MINIMUM_AMOUNT: f64 = 0.01;
/// Largest value a `NUMERIC(10,2)` column holds.
pub const MAXIMUM_AMOUNT: f64 = 99_999_999.99;

/// Inbound donation payload before any business rule has run.
///
/// Every field is optional at the wire level so a missing value surfaces as a
/// field violation rather than a rejected body. A value of the wrong JSON type
/// is recorded in `mistyped_fields` and reported as a `type` violation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawDonationPayload")]
pub struct CreateDonationDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub amount: Option<AmountInput>,
    pub is_anonymous: Option<bool>,
    pub donation_type: Option<String>,
    pub recurring_interval: Option<String>,
    pub dedication_message: Option<String>,
    pub show_dedication_publicly: Option<bool>,
    #[serde(skip)]
    pub mistyped_fields: Vec<&'static str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDonationPayload {
    first_name: Option<Value>,
    last_name: Option<Value>,
    email: Option<Value>,
    amount: Option<Value>,
    is_anonymous: Option<Value>,
    donation_type: Option<Value>,
    recurring_interval: Option<Value>,
    dedication_message: Option<Value>,
    show_dedication_publicly: Option<Value>,
}

impl From<RawDonationPayload> for CreateDonationDto {
    fn from(raw: RawDonationPayload) -> Self {
        let mut mistyped = Vec::new();

        Self {
            first_name: wire_text("firstName", raw.first_name, &mut mistyped),
            last_name: wire_text("lastName", raw.last_name, &mut mistyped),
            email: wire_text("email", raw.email, &mut mistyped),
            amount: wire_amount(raw.amount, &mut mistyped),
            is_anonymous: wire_flag("isAnonymous", raw.is_anonymous, &mut mistyped),
            donation_type: wire_text("donationType", raw.donation_type, &mut mistyped),
            recurring_interval: wire_text(
                "recurringInterval",
                raw.recurring_interval,
                &mut mistyped,
            ),
            dedication_message: wire_text(
                "dedicationMessage",
                raw.dedication_message,
                &mut mistyped,
            ),
            show_dedication_publicly: wire_flag(
                "showDedicationPublicly",
                raw.show_dedication_publicly,
                &mut mistyped,
            ),
            mistyped_fields: mistyped,
        }
    }
}

fn wire_text(
    field: &'static str,
    value: Option<Value>,
    mistyped: &mut Vec<&'static str>,
) -> Option<String> {
    match value? {
        Value::String(text) => Some(text),
        _ => {
            mistyped.push(field);
            None
        }
    }
}

fn wire_flag(
    field: &'static str,
    value: Option<Value>,
    mistyped: &mut Vec<&'static str>,
) -> Option<bool> {
    match value? {
        Value::Bool(flag) => Some(flag),
        _ => {
            mistyped.push(field);
            None
        }
    }
}

fn wire_amount(value: Option<Value>, mistyped: &mut Vec<&'static str>) -> Option<AmountInput> {
    match value? {
        Value::Number(number) => number.as_f64().map(AmountInput::Number),
        Value::String(text) => Some(AmountInput::Text(text)),
        _ => {
            mistyped.push("amount");
            None
        }
    }
}

/// Typed submission produced once every constraint holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDonationSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Rounded to cents and within `MINIMUM_AMOUNT..=MAXIMUM_AMOUNT`.
    pub amount: Decimal,
    pub is_anonymous: Option<bool>,
    pub donation_type: DonationType,
    pub recurring_interval: Option<RecurringInterval>,
    pub dedication_message: Option<String>,
    pub show_dedication_publicly: Option<bool>,
}

/// A single failed constraint, keyed by the wire name of the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub constraint: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, constraint: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            constraint,
            message: message.into(),
        }
    }
}

/// Every violation found in a submission, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationValidationError {
    pub violations: Vec<FieldViolation>,
}

impl DonationValidationError {
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|violation| violation.field == field)
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|violation| violation.field).collect()
    }
}

impl fmt::Display for DonationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "donation failed validation:")?;
        for (index, violation) in self.violations.iter().enumerate() {
            let separator = if index == 0 { " " } else { ", " };
            write!(f, "{separator}{} ({})", violation.field, violation.constraint)?;
        }
        Ok(())
    }
}

impl std::error::Error for DonationValidationError {}

impl CreateDonationDto {
    /// Validate every field and produce the typed submission.
    pub fn into_submission(self) -> Result<ValidDonationSubmission, DonationValidationError> {
        self.check()
            .map_err(|violations| DonationValidationError { violations })
    }

    fn check(&self) -> Result<ValidDonationSubmission, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        let first_name = keep(
            &mut violations,
            self.typed("firstName")
                .and_then(|()| required_text("firstName", &self.first_name)),
        );
        let last_name = keep(
            &mut violations,
            self.typed("lastName")
                .and_then(|()| required_text("lastName", &self.last_name)),
        );
        let email = keep(
            &mut violations,
            self.typed("email").and_then(|()| email_address(&self.email)),
        );
        let amount = keep(
            &mut violations,
            self.typed("amount").and_then(|()| parse_amount(&self.amount)),
        );
        keep(&mut violations, self.typed("isAnonymous"));
        let donation_type = keep(
            &mut violations,
            self.typed("donationType")
                .and_then(|()| parse_donation_type(&self.donation_type)),
        );
        let recurring_interval = keep(
            &mut violations,
            self.typed("recurringInterval")
                .and_then(|()| parse_recurring_interval(&self.recurring_interval)),
        );
        keep(&mut violations, self.typed("dedicationMessage"));
        keep(&mut violations, self.typed("showDedicationPublicly"));

        if let (Some(DonationType::Recurring), Some(None)) = (donation_type, recurring_interval) {
            violations.push(FieldViolation::new(
                "recurringInterval",
                "required_for_recurring",
                "recurring donations must specify an interval",
            ));
        }

        match (
            first_name,
            last_name,
            email,
            amount,
            donation_type,
            recurring_interval,
        ) {
            (
                Some(first_name),
                Some(last_name),
                Some(email),
                Some(amount),
                Some(donation_type),
                Some(recurring_interval),
            ) if violations.is_empty() => Ok(ValidDonationSubmission {
                first_name,
                last_name,
                email,
                amount,
                is_anonymous: self.is_anonymous,
                donation_type,
                recurring_interval,
                dedication_message: self.dedication_message.clone(),
                show_dedication_publicly: self.show_dedication_publicly,
            }),
            _ => Err(violations),
        }
    }

    fn typed(&self, field: &'static str) -> Result<(), FieldViolation> {
        if self.mistyped_fields.contains(&field) {
            Err(FieldViolation::new(
                field,
                "type",
                format!("{field} has the wrong JSON type"),
            ))
        } else {
            Ok(())
        }
    }
}

impl Validate for CreateDonationDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let Err(violations) = self.check() else {
            return Ok(());
        };

        let mut errors = ValidationErrors::new();
        for violation in violations {
            let error = ValidationError::new(violation.constraint)
                .with_message(Cow::Owned(violation.message));
            errors.add(violation.field, error);
        }
        Err(errors)
    }
}

fn keep<T>(violations: &mut Vec<FieldViolation>, result: Result<T, FieldViolation>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(violation) => {
            violations.push(violation);
            None
        }
    }
}

fn required_text(field: &'static str, value: &Option<String>) -> Result<String, FieldViolation> {
    match value {
        None => Err(FieldViolation::new(field, "required", format!("{field} is required"))),
        Some(text) if text.is_empty() => Err(FieldViolation::new(
            field,
            "length",
            format!("{field} must not be empty"),
        )),
        Some(text) => Ok(text.clone()),
    }
}

fn email_address(value: &Option<String>) -> Result<String, FieldViolation> {
    let email = required_text("email", value)?;
    if email.validate_email() {
        Ok(email)
    } else {
        Err(FieldViolation::new(
            "email",
            "email",
            "email must be a valid email address",
        ))
    }
}

fn parse_amount(value: &Option<AmountInput>) -> Result<Decimal, FieldViolation> {
    let amount = match value {
        None => return Err(FieldViolation::new("amount", "required", "amount is required")),
        Some(AmountInput::Text(_)) => {
            return Err(FieldViolation::new(
                "amount",
                "number",
                "amount must be a number",
            ))
        }
        Some(AmountInput::Number(amount)) => *amount,
    };

    if !amount.is_finite() {
        return Err(FieldViolation::new(
            "amount",
            "number",
            "amount must be a finite number",
        ));
    }
    if !(MINIMUM_AMOUNT..=MAXIMUM_AMOUNT).contains(&amount) {
        return Err(FieldViolation::new(
            "amount",
            "range",
            format!("amount must be between {MINIMUM_AMOUNT} and {MAXIMUM_AMOUNT}"),
        ));
    }

    Decimal::from_f64(amount)
        .map(|amount| amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| {
            FieldViolation::new("amount", "number", "amount is not representable in cents")
        })
}

fn parse_donation_type(value: &Option<String>) -> Result<DonationType, FieldViolation> {
    let raw = value.as_deref().ok_or_else(|| {
        FieldViolation::new("donationType", "required", "donationType is required")
    })?;
    raw.parse().map_err(|_| {
        FieldViolation::new(
            "donationType",
            "enum",
            "donationType must be one of: one_time, recurring",
        )
    })
}

fn parse_recurring_interval(
    value: &Option<String>,
) -> Result<Option<RecurringInterval>, FieldViolation> {
    let Some(raw) = value.as_deref() else {
        return Ok(None);
    };
    raw.parse().map(Some).map_err(|_| {
        let allowed = RecurringInterval::ALL.map(RecurringInterval::label).join(", ");
        FieldViolation::new(
            "recurringInterval",
            "enum",
            format!("recurringInterval must be one of: {allowed}"),
        )
    })
}
