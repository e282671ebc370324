//! Input validation for the mortgage form.
//!
//! Every field is checked independently and every failing field is reported,
//! so a single submit surfaces all problems at once. Within one field the
//! "missing or not positive" check takes precedence over the range check.
//!
//! | Field  | Rule                                  | Default limits |
//! |--------|---------------------------------------|----------------|
//! | amount | present, > 0, ≥ `min_amount`          | 1,000          |
//! | term   | present, > 0, in `[min_term, max_term]` | 1 – 50 years |
//! | rate   | present, > 0, ≤ `max_rate`            | 30%            |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use mortgage_core::{Field, FormInput, MortgageType, ValidationRules, validate};
//!
//! let input = FormInput {
//!     amount: Some(dec!(500)),
//!     term: Some(dec!(25)),
//!     rate: Some(dec!(5)),
//!     mortgage_type: MortgageType::Repayment,
//! };
//!
//! let errors = validate(&input, &ValidationRules::default());
//!
//! assert_eq!(errors.len(), 1);
//! assert_eq!(
//!     errors.message(Field::Amount).as_deref(),
//!     Some("Minimum mortgage amount is $1,000")
//! );
//! ```

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::decimal_to_f64;
use crate::format::format_amount;
use crate::models::{FormInput, MortgageType};

/// The user-editable numeric fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Amount,
    Term,
    Rate,
}

impl Field {
    pub fn all() -> &'static [Field] {
        &[Field::Amount, Field::Term, Field::Rate]
    }

    /// Field name as used in error mappings and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Term => "term",
            Self::Rate => "rate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "amount" => Some(Self::Amount),
            "term" => Some(Self::Term),
            "rate" => Some(Self::Rate),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Amount => "Mortgage amount",
            Self::Term => "Mortgage term",
            Self::Rate => "Interest rate",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field's validation failure. The `Display` output is the message
/// shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Please enter a valid mortgage amount")]
    InvalidAmount,

    #[error("Minimum mortgage amount is {}", format_amount(.0.normalize()))]
    AmountBelowMinimum(Decimal),

    #[error("Please enter a valid mortgage term")]
    InvalidTerm,

    #[error("Mortgage term must be between {} and {} years", .min.normalize(), .max.normalize())]
    TermOutOfRange { min: Decimal, max: Decimal },

    #[error("Please enter a valid interest rate")]
    InvalidRate,

    #[error("Interest rate cannot exceed {}%", .0.normalize())]
    RateAboveMaximum(Decimal),
}

impl FieldError {
    /// The field this error belongs to.
    pub fn field(&self) -> Field {
        match self {
            Self::InvalidAmount | Self::AmountBelowMinimum(_) => Field::Amount,
            Self::InvalidTerm | Self::TermOutOfRange { .. } => Field::Term,
            Self::InvalidRate | Self::RateAboveMaximum(_) => Field::Rate,
        }
    }
}

/// Errors for self-inconsistent [`ValidationRules`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("minimum amount must be positive, got {0}")]
    InvalidMinAmount(Decimal),

    #[error("minimum term must be positive, got {0}")]
    InvalidMinTerm(Decimal),

    #[error("maximum term {max} is below minimum term {min}")]
    InvalidTermRange { min: Decimal, max: Decimal },

    #[error("maximum rate must be positive, got {0}")]
    InvalidMaxRate(Decimal),
}

/// Limits applied by [`validate`].
///
/// The defaults are a $1,000 minimum loan, a 1 to 50 year term and a 30%
/// ceiling on the annual rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationRules {
    pub min_amount: Decimal,
    pub min_term: Decimal,
    pub max_term: Decimal,
    /// Maximum annual rate in percent.
    pub max_rate: Decimal,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_amount: dec!(1000),
            min_term: dec!(1),
            max_term: dec!(50),
            max_rate: dec!(30),
        }
    }
}

impl ValidationRules {
    /// Checks that the limits are usable.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError`] if:
    /// - `min_amount` is not positive
    /// - `min_term` is not positive
    /// - `max_term` is below `min_term`
    /// - `max_rate` is not positive
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.min_amount <= Decimal::ZERO {
            return Err(RulesError::InvalidMinAmount(self.min_amount));
        }
        if self.min_term <= Decimal::ZERO {
            return Err(RulesError::InvalidMinTerm(self.min_term));
        }
        if self.max_term < self.min_term {
            return Err(RulesError::InvalidTermRange {
                min: self.min_term,
                max: self.max_term,
            });
        }
        if self.max_rate <= Decimal::ZERO {
            return Err(RulesError::InvalidMaxRate(self.max_rate));
        }
        Ok(())
    }

    fn check_amount(
        &self,
        amount: Option<Decimal>,
    ) -> Option<FieldError> {
        match amount {
            None => Some(FieldError::InvalidAmount),
            Some(a) if a <= Decimal::ZERO => Some(FieldError::InvalidAmount),
            Some(a) if a < self.min_amount => Some(FieldError::AmountBelowMinimum(self.min_amount)),
            Some(_) => None,
        }
    }

    fn check_term(
        &self,
        term: Option<Decimal>,
    ) -> Option<FieldError> {
        match term {
            None => Some(FieldError::InvalidTerm),
            Some(t) if t <= Decimal::ZERO => Some(FieldError::InvalidTerm),
            Some(t) if t < self.min_term || t > self.max_term => Some(FieldError::TermOutOfRange {
                min: self.min_term,
                max: self.max_term,
            }),
            Some(_) => None,
        }
    }

    fn check_rate(
        &self,
        rate: Option<Decimal>,
    ) -> Option<FieldError> {
        match rate {
            None => Some(FieldError::InvalidRate),
            Some(r) if r <= Decimal::ZERO => Some(FieldError::InvalidRate),
            Some(r) if r > self.max_rate => Some(FieldError::RateAboveMaximum(self.max_rate)),
            Some(_) => None,
        }
    }
}

/// Mapping from field to error. Empty means the input was accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(
        &self,
        field: Field,
    ) -> Option<&FieldError> {
        self.0.get(&field)
    }

    /// The user-facing message for `field`, if it failed.
    pub fn message(
        &self,
        field: Field,
    ) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }

    pub fn contains(
        &self,
        field: Field,
    ) -> bool {
        self.0.contains_key(&field)
    }

    /// Fields that failed, in form order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.0.iter().map(|(field, error)| (*field, error))
    }

    /// Removes the error for one field, leaving the others untouched.
    pub fn clear_field(
        &mut self,
        field: Field,
    ) -> Option<FieldError> {
        self.0.remove(&field)
    }

    fn record(
        &mut self,
        error: Option<FieldError>,
    ) {
        if let Some(error) = error {
            self.0.insert(error.field(), error);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for (i, (field, error)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{field}: {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Input that has passed validation, converted to the calculator's units.
///
/// Only [`validate_input`] can build one, so holding a `ValidatedInput` is
/// proof the form was accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedInput {
    principal: f64,
    years: f64,
    annual_rate: f64,
    mortgage_type: MortgageType,
}

impl ValidatedInput {
    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn years(&self) -> f64 {
        self.years
    }

    /// Annual rate in percent.
    pub fn annual_rate(&self) -> f64 {
        self.annual_rate
    }

    pub fn mortgage_type(&self) -> MortgageType {
        self.mortgage_type
    }
}

/// Checks every field of `input` against `rules`.
pub fn validate(
    input: &FormInput,
    rules: &ValidationRules,
) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.record(rules.check_amount(input.amount));
    errors.record(rules.check_term(input.term));
    errors.record(rules.check_rate(input.rate));

    debug!(
        amount = ?input.amount,
        term = ?input.term,
        rate = ?input.rate,
        error_count = errors.len(),
        "validated mortgage form"
    );

    errors
}

/// Validates `input` and, if accepted, converts it for the calculator.
///
/// # Errors
///
/// Returns the full [`ValidationErrors`] mapping when any field fails.
pub fn validate_input(
    input: &FormInput,
    rules: &ValidationRules,
) -> Result<ValidatedInput, ValidationErrors> {
    let mut errors = validate(input, rules);
    if !errors.is_empty() {
        return Err(errors);
    }

    let principal = input.amount.and_then(decimal_to_f64);
    let years = input.term.and_then(decimal_to_f64);
    let annual_rate = input.rate.and_then(decimal_to_f64);

    match (principal, years, annual_rate) {
        (Some(principal), Some(years), Some(annual_rate)) => Ok(ValidatedInput {
            principal,
            years,
            annual_rate,
            mortgage_type: input.mortgage_type,
        }),
        _ => {
            errors.record(principal.is_none().then_some(FieldError::InvalidAmount));
            errors.record(years.is_none().then_some(FieldError::InvalidTerm));
            errors.record(annual_rate.is_none().then_some(FieldError::InvalidRate));
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn valid_input() -> FormInput {
        FormInput {
            amount: Some(dec!(200000)),
            term: Some(dec!(25)),
            rate: Some(dec!(5)),
            mortgage_type: MortgageType::Repayment,
        }
    }

    fn errors_for(input: FormInput) -> ValidationErrors {
        validate(&input, &ValidationRules::default())
    }

    // =========================================================================
    // ValidationRules::validate tests
    // =========================================================================

    #[test]
    fn rules_validate_accepts_defaults() {
        assert_eq!(ValidationRules::default().validate(), Ok(()));
    }

    #[test]
    fn rules_validate_rejects_non_positive_min_amount() {
        let rules = ValidationRules {
            min_amount: dec!(0),
            ..ValidationRules::default()
        };

        assert_eq!(rules.validate(), Err(RulesError::InvalidMinAmount(dec!(0))));
    }

    #[test]
    fn rules_validate_rejects_non_positive_min_term() {
        let rules = ValidationRules {
            min_term: dec!(-1),
            ..ValidationRules::default()
        };

        assert_eq!(rules.validate(), Err(RulesError::InvalidMinTerm(dec!(-1))));
    }

    #[test]
    fn rules_validate_rejects_inverted_term_range() {
        let rules = ValidationRules {
            min_term: dec!(10),
            max_term: dec!(5),
            ..ValidationRules::default()
        };

        assert_eq!(
            rules.validate(),
            Err(RulesError::InvalidTermRange {
                min: dec!(10),
                max: dec!(5),
            })
        );
    }

    #[test]
    fn rules_validate_rejects_non_positive_max_rate() {
        let rules = ValidationRules {
            max_rate: dec!(0),
            ..ValidationRules::default()
        };

        assert_eq!(rules.validate(), Err(RulesError::InvalidMaxRate(dec!(0))));
    }

    // =========================================================================
    // amount rules
    // =========================================================================

    #[test]
    fn accepts_valid_input() {
        assert!(errors_for(valid_input()).is_empty());
    }

    #[test]
    fn missing_amount_is_invalid() {
        let errors = errors_for(FormInput {
            amount: None,
            ..valid_input()
        });

        assert_eq!(errors.get(Field::Amount), Some(&FieldError::InvalidAmount));
        assert_eq!(
            errors.message(Field::Amount).as_deref(),
            Some("Please enter a valid mortgage amount")
        );
    }

    #[test]
    fn zero_or_negative_amount_is_invalid() {
        for amount in [dec!(0), dec!(-250000)] {
            let errors = errors_for(FormInput {
                amount: Some(amount),
                ..valid_input()
            });

            assert_eq!(errors.get(Field::Amount), Some(&FieldError::InvalidAmount));
        }
    }

    #[test]
    fn amount_below_minimum_reports_minimum() {
        for amount in [dec!(0.01), dec!(500), dec!(999.99)] {
            let errors = errors_for(FormInput {
                amount: Some(amount),
                ..valid_input()
            });

            assert_eq!(
                errors.message(Field::Amount).as_deref(),
                Some("Minimum mortgage amount is $1,000")
            );
        }
    }

    #[test]
    fn amount_at_minimum_is_accepted() {
        let errors = errors_for(FormInput {
            amount: Some(dec!(1000)),
            ..valid_input()
        });

        assert!(errors.is_empty());
    }

    // =========================================================================
    // term rules
    // =========================================================================

    #[test]
    fn missing_or_non_positive_term_is_invalid() {
        for term in [None, Some(dec!(0)), Some(dec!(-5))] {
            let errors = errors_for(FormInput {
                term,
                ..valid_input()
            });

            assert_eq!(
                errors.message(Field::Term).as_deref(),
                Some("Please enter a valid mortgage term")
            );
        }
    }

    #[test]
    fn term_outside_range_reports_range() {
        for term in [dec!(0.5), dec!(50.01), dec!(51), dec!(100)] {
            let errors = errors_for(FormInput {
                term: Some(term),
                ..valid_input()
            });

            assert_eq!(
                errors.message(Field::Term).as_deref(),
                Some("Mortgage term must be between 1 and 50 years")
            );
        }
    }

    #[test]
    fn every_term_in_range_is_accepted() {
        for years in 1..=50 {
            let errors = errors_for(FormInput {
                term: Some(Decimal::from(years)),
                ..valid_input()
            });

            assert!(errors.is_empty(), "term {years} should be accepted");
        }
    }

    // =========================================================================
    // rate rules
    // =========================================================================

    #[test]
    fn missing_or_non_positive_rate_is_invalid() {
        for rate in [None, Some(dec!(0)), Some(dec!(-1))] {
            let errors = errors_for(FormInput {
                rate,
                ..valid_input()
            });

            assert_eq!(
                errors.message(Field::Rate).as_deref(),
                Some("Please enter a valid interest rate")
            );
        }
    }

    #[test]
    fn rate_above_maximum_is_rejected() {
        let errors = errors_for(FormInput {
            rate: Some(dec!(30.01)),
            ..valid_input()
        });

        assert_eq!(
            errors.message(Field::Rate).as_deref(),
            Some("Interest rate cannot exceed 30%")
        );
    }

    #[test]
    fn rates_up_to_maximum_are_accepted() {
        for rate in [dec!(0.01), dec!(3.5), dec!(29.99), dec!(30)] {
            let errors = errors_for(FormInput {
                rate: Some(rate),
                ..valid_input()
            });

            assert!(errors.is_empty(), "rate {rate} should be accepted");
        }
    }

    // =========================================================================
    // combined behaviour
    // =========================================================================

    #[test]
    fn reports_every_failing_field() {
        let errors = errors_for(FormInput {
            amount: Some(dec!(10)),
            term: None,
            rate: Some(dec!(45)),
            mortgage_type: MortgageType::InterestOnly,
        });

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::Amount, Field::Term, Field::Rate]);
        assert_eq!(
            errors.to_string(),
            "amount: Minimum mortgage amount is $1,000\n\
             term: Please enter a valid mortgage term\n\
             rate: Interest rate cannot exceed 30%"
        );
    }

    #[test]
    fn messages_follow_custom_limits() {
        let rules = ValidationRules {
            min_amount: dec!(25000),
            min_term: dec!(5),
            max_term: dec!(35),
            max_rate: dec!(12.5),
        };
        let input = FormInput {
            amount: Some(dec!(20000)),
            term: Some(dec!(40)),
            rate: Some(dec!(15)),
            mortgage_type: MortgageType::Repayment,
        };

        let errors = validate(&input, &rules);

        assert_eq!(
            errors.message(Field::Amount).as_deref(),
            Some("Minimum mortgage amount is $25,000")
        );
        assert_eq!(
            errors.message(Field::Term).as_deref(),
            Some("Mortgage term must be between 5 and 35 years")
        );
        assert_eq!(
            errors.message(Field::Rate).as_deref(),
            Some("Interest rate cannot exceed 12.5%")
        );
    }

    #[test]
    fn clear_field_leaves_other_errors() {
        let mut errors = errors_for(FormInput::default());

        let cleared = errors.clear_field(Field::Term);

        assert_eq!(cleared, Some(FieldError::InvalidTerm));
        assert!(errors.contains(Field::Amount));
        assert!(!errors.contains(Field::Term));
        assert!(errors.contains(Field::Rate));
    }

    // =========================================================================
    // validate_input tests
    // =========================================================================

    #[test]
    fn validate_input_converts_accepted_values() {
        let validated = validate_input(&valid_input(), &ValidationRules::default()).unwrap();

        assert_eq!(validated.principal(), 200000.0);
        assert_eq!(validated.years(), 25.0);
        assert_eq!(validated.annual_rate(), 5.0);
        assert_eq!(validated.mortgage_type(), MortgageType::Repayment);
    }

    #[test]
    fn validate_input_returns_errors_when_rejected() {
        let input = FormInput {
            amount: Some(dec!(500)),
            ..valid_input()
        };

        let result = validate_input(&input, &ValidationRules::default());

        let errors = result.unwrap_err();
        assert_eq!(errors.get(Field::Amount), Some(&FieldError::AmountBelowMinimum(dec!(1000))));
    }

    #[test]
    fn field_parse_round_trips() {
        for field in Field::all() {
            assert_eq!(Field::parse(field.as_str()), Some(*field));
        }
        assert_eq!(Field::parse("type"), None);
    }
}
