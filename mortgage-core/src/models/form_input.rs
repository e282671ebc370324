use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::MortgageType;

/// Numeric values read from the mortgage form, before validation.
///
/// A `None` field was left empty or did not hold a number. The validator
/// reports both cases with the same "please enter a valid ..." message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub amount: Option<Decimal>,
    pub term: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub mortgage_type: MortgageType,
}

impl FormInput {
    /// Builds a [`FormInput`] from the raw text of each form field.
    pub fn from_raw(
        amount: &str,
        term: &str,
        rate: &str,
        mortgage_type: MortgageType,
    ) -> Self {
        Self {
            amount: parse_field(amount),
            term: parse_field(term),
            rate: parse_field(rate),
            mortgage_type,
        }
    }
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_field(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses the text of a single numeric field.
///
/// Handles comma as thousands separator (e.g. `"200,000"`). Returns `None`
/// for empty input, or when parsing fails (logs a warning on parse failure).
pub fn parse_field(s: &str) -> Option<Decimal> {
    let normalized = normalize_field(s);
    if normalized.is_empty() {
        return None;
    }
    normalized.parse().map_or_else(
        |e| {
            tracing::warn!(input = %s, "field is not a number: {}", e);
            None
        },
        Some,
    )
}
