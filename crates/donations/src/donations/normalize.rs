//! Lenient canonicalization of loosely typed donation input.
//!
//! None of these functions fail: unrecognized input degrades to `None` or `0`.
//! Strict checks live in [`super::validation`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::RecurringInterval;

/// Amount as it may arrive from a form, a CSV cell, or a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

impl From<String> for AmountInput {
    fn from(value: String) -> Self {
        AmountInput::Text(value)
    }
}

impl From<Decimal> for AmountInput {
    fn from(value: Decimal) -> Self {
        AmountInput::Number(value.to_f64().unwrap_or(f64::NAN))
    }
}

pub fn normalize_interval(input: Option<&str>) -> Option<RecurringInterval> {
    let normalized = input?.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    normalized.parse().ok()
}

pub fn normalize_donor_name(input: Option<String>, anonymous: bool) -> Option<String> {
    if anonymous {
        None
    } else {
        input
    }
}

pub fn normalize_donation_amount(amount: impl Into<AmountInput>) -> f64 {
    let value = match amount.into() {
        AmountInput::Number(value) => value,
        AmountInput::Text(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
    };

    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn interval_is_trimmed_and_lowercased() {
        assert_eq!(
            normalize_interval(Some("MONTHLY ")),
            Some(RecurringInterval::Monthly)
        );
        assert_eq!(
            normalize_interval(Some("\tAnnually")),
            Some(RecurringInterval::Annually)
        );
    }

    #[test]
    fn interval_rejects_unknown_and_empty_input() {
        assert_eq!(normalize_interval(Some("not-a-day")), None);
        assert_eq!(normalize_interval(Some("   ")), None);
        assert_eq!(normalize_interval(Some("")), None);
        assert_eq!(normalize_interval(None), None);
    }

    #[test]
    fn donor_name_is_hidden_for_anonymous_donors() {
        assert_eq!(
            normalize_donor_name(Some("John Smith".to_string()), false),
            Some("John Smith".to_string())
        );
        assert_eq!(normalize_donor_name(Some("John Smith".to_string()), true), None);
        assert_eq!(normalize_donor_name(None, false), None);
    }

    #[test]
    fn amount_coerces_text_and_numbers() {
        assert_eq!(normalize_donation_amount("42.50"), 42.5);
        assert_eq!(normalize_donation_amount(" 10 "), 10.0);
        assert_eq!(normalize_donation_amount(17.25), 17.25);
        assert_eq!(normalize_donation_amount(-3.0), -3.0);
    }

    #[test]
    fn amount_falls_back_to_zero() {
        assert_eq!(normalize_donation_amount("abc"), 0.0);
        assert_eq!(normalize_donation_amount(""), 0.0);
        assert_eq!(normalize_donation_amount("inf"), 0.0);
        assert_eq!(normalize_donation_amount(f64::NAN), 0.0);
        assert_eq!(normalize_donation_amount(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn amount_accepts_stored_decimals() {
        let stored = Decimal::from_str("100.25").expect("valid decimal");
        assert_eq!(normalize_donation_amount(stored), 100.25);
    }

    #[test]
    fn amount_input_reads_either_json_shape() {
        let number: AmountInput = serde_json::from_str("12.5").expect("number");
        let text: AmountInput = serde_json::from_str("\"12.5\"").expect("text");
        assert_eq!(normalize_donation_amount(number), normalize_donation_amount(text));
    }
}
