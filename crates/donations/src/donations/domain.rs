use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity assigned by the store when a donation is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DonationId(pub i32);

impl fmt::Display for DonationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a token does not belong to one of the closed vocabularies below.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownToken {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationType {
    OneTime,
    Recurring,
}

impl DonationType {
    pub const ALL: [DonationType; 2] = [DonationType::OneTime, DonationType::Recurring];

    pub const fn label(self) -> &'static str {
        match self {
            DonationType::OneTime => "one_time",
            DonationType::Recurring => "recurring",
        }
    }

    /// Integer encoding used by the `donations.donation_type` column.
    pub const fn code(self) -> i32 {
        match self {
            DonationType::OneTime => 0,
            DonationType::Recurring => 1,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

impl FromStr for DonationType {
    type Err = UnknownToken;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == value)
            .ok_or_else(|| UnknownToken {
                kind: "donation type",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurringInterval {
    Weekly,
    Monthly,
    Bimonthly,
    Quarterly,
    Annually,
}

impl RecurringInterval {
    pub const ALL: [RecurringInterval; 5] = [
        RecurringInterval::Weekly,
        RecurringInterval::Monthly,
        RecurringInterval::Bimonthly,
        RecurringInterval::Quarterly,
        RecurringInterval::Annually,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RecurringInterval::Weekly => "weekly",
            RecurringInterval::Monthly => "monthly",
            RecurringInterval::Bimonthly => "bimonthly",
            RecurringInterval::Quarterly => "quarterly",
            RecurringInterval::Annually => "annually",
        }
    }
}

impl FromStr for RecurringInterval {
    type Err = UnknownToken;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|interval| interval.label() == value)
            .ok_or_else(|| UnknownToken {
                kind: "recurring interval",
                value: value.to_string(),
            })
    }
}

/// Payment state; owned by the external payment collaborator after intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl DonationStatus {
    pub const ALL: [DonationStatus; 4] = [
        DonationStatus::Pending,
        DonationStatus::Completed,
        DonationStatus::Failed,
        DonationStatus::Cancelled,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Completed => "completed",
            DonationStatus::Failed => "failed",
            DonationStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for DonationStatus {
    type Err = UnknownToken;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == value)
            .ok_or_else(|| UnknownToken {
                kind: "donation status",
                value: value.to_string(),
            })
    }
}

/// Persisted donation record.
#[derive(Debug, Clone, PartialEq)]
pub struct Donation {
    pub id: DonationId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub amount: Decimal,
    pub is_anonymous: bool,
    pub donation_type: DonationType,
    pub recurring_interval: Option<RecurringInterval>,
    pub dedication_message: Option<String>,
    pub show_dedication_publicly: bool,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub transaction_id: Option<String>,
}

impl Donation {
    /// The interval only carries meaning for recurring donations.
    pub fn effective_interval(&self) -> Option<RecurringInterval> {
        match self.donation_type {
            DonationType::Recurring => self.recurring_interval,
            DonationType::OneTime => None,
        }
    }
}

/// Normalized values handed to a repository for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDonationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub amount: Decimal,
    pub is_anonymous: bool,
    pub donation_type: DonationType,
    pub recurring_interval: Option<RecurringInterval>,
    pub dedication_message: Option<String>,
    pub show_dedication_publicly: bool,
}

impl CreateDonationRequest {
    /// A freshly recorded donation: `pending`, no transaction, both timestamps at `recorded_at`.
    pub fn into_donation(self, id: DonationId, recorded_at: DateTime<Utc>) -> Donation {
        Donation {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            amount: self.amount,
            is_anonymous: self.is_anonymous,
            donation_type: self.donation_type,
            recurring_interval: self.recurring_interval,
            dedication_message: self.dedication_message,
            show_dedication_publicly: self.show_dedication_publicly,
            status: DonationStatus::Pending,
            created_at: recorded_at,
            updated_at: recorded_at,
            transaction_id: None,
        }
    }
}

/// Privileged view exposing every stored field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponse {
    pub id: DonationId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub amount: f64,
    pub is_anonymous: bool,
    pub donation_type: DonationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_interval: Option<RecurringInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedication_message: Option<String>,
    pub show_dedication_publicly: bool,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

/// Redacted projection safe for unauthenticated consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicDonation {
    pub id: DonationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_name: Option<String>,
    pub amount: f64,
    pub is_anonymous: bool,
    pub donation_type: DonationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_interval: Option<RecurringInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedication_message: Option<String>,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
}
