//! Form session state for the mortgage calculator.
//!
//! [`MortgageForm`] holds the raw text of each field, the selected mortgage
//! type, the errors from the last submit, the last result and a busy flag.
//! A front end edits fields, submits and resets; the session keeps these
//! rules:
//!
//! - editing a field clears that field's error only;
//! - a submit while a calculation is pending is refused;
//! - a failed submit replaces the errors but keeps the previous result;
//! - a result is only ever stored for input that passed validation;
//! - reset clears everything, and a calculation started before the reset is
//!   discarded when it completes.

use thiserror::Error;
use tracing::{info, warn};

use crate::calculations::calculate;
use crate::models::{CalculationResult, FormInput, MortgageType};
use crate::validation::{
    Field, RulesError, ValidatedInput, ValidationErrors, ValidationRules, validate_input,
};

/// Why a submit did not start a calculation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("a calculation is already in progress")]
    Busy,

    #[error("the form has invalid fields:\n{0}")]
    Invalid(ValidationErrors),
}

/// A calculation accepted by [`MortgageForm::begin_submit`] and not yet
/// completed.
///
/// Each submit hands out exactly one of these and it cannot be copied, so a
/// calculation completes at most once:
///
/// ```compile_fail
/// use mortgage_core::{Field, MortgageForm};
///
/// let mut form = MortgageForm::default();
/// form.set_field(Field::Amount, "200000");
/// form.set_field(Field::Term, "25");
/// form.set_field(Field::Rate, "5");
/// let pending = form.begin_submit().unwrap();
/// let copy = pending.clone();
/// ```
#[derive(Debug, PartialEq)]
#[must_use = "a pending calculation keeps the form busy until completed"]
pub struct PendingCalculation {
    input: ValidatedInput,
    generation: u64,
}

impl PendingCalculation {
    pub fn input(&self) -> &ValidatedInput {
        &self.input
    }
}

/// One user's mortgage form.
#[derive(Debug, Clone, Default)]
pub struct MortgageForm {
    rules: ValidationRules,
    amount: String,
    term: String,
    rate: String,
    mortgage_type: MortgageType,
    errors: ValidationErrors,
    result: Option<CalculationResult>,
    calculating: bool,
    // Bumped on every accepted submit and on reset; only the pending
    // calculation carrying the current value may complete.
    generation: u64,
}

impl MortgageForm {
    /// Creates an empty form that validates with `rules`.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError`] if the rules are self-inconsistent.
    pub fn new(rules: ValidationRules) -> Result<Self, RulesError> {
        rules.validate()?;
        Ok(Self {
            rules,
            ..Self::default()
        })
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Raw text currently in `field`.
    pub fn field(
        &self,
        field: Field,
    ) -> &str {
        match field {
            Field::Amount => &self.amount,
            Field::Term => &self.term,
            Field::Rate => &self.rate,
        }
    }

    /// Replaces the text of `field` and clears that field's error.
    pub fn set_field(
        &mut self,
        field: Field,
        value: impl Into<String>,
    ) {
        let slot = match field {
            Field::Amount => &mut self.amount,
            Field::Term => &mut self.term,
            Field::Rate => &mut self.rate,
        };
        *slot = value.into();
        self.errors.clear_field(field);
    }

    pub fn mortgage_type(&self) -> MortgageType {
        self.mortgage_type
    }

    pub fn set_mortgage_type(
        &mut self,
        mortgage_type: MortgageType,
    ) {
        self.mortgage_type = mortgage_type;
    }

    /// Errors from the most recent submit, minus any fields edited since.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The most recent successful calculation.
    pub fn result(&self) -> Option<&CalculationResult> {
        self.result.as_ref()
    }

    pub fn is_calculating(&self) -> bool {
        self.calculating
    }

    /// Parses the current field text.
    pub fn input(&self) -> FormInput {
        FormInput::from_raw(&self.amount, &self.term, &self.rate, self.mortgage_type)
    }

    /// Validates the form and, if it passes, marks it busy.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Busy`] if an earlier calculation has not completed.
    /// - [`SubmitError::Invalid`] with every failing field. The errors are
    ///   also stored on the form.
    pub fn begin_submit(&mut self) -> Result<PendingCalculation, SubmitError> {
        if self.calculating {
            warn!("submit ignored; calculation already in progress");
            return Err(SubmitError::Busy);
        }

        match validate_input(&self.input(), &self.rules) {
            Ok(input) => {
                self.errors = ValidationErrors::default();
                self.calculating = true;
                self.generation = self.generation.wrapping_add(1);
                Ok(PendingCalculation {
                    input,
                    generation: self.generation,
                })
            }
            Err(errors) => {
                warn!(
                    fields = ?errors.fields().map(|f| f.as_str()).collect::<Vec<_>>(),
                    "mortgage form rejected"
                );
                self.errors = errors.clone();
                Err(SubmitError::Invalid(errors))
            }
        }
    }

    /// Finishes a pending calculation and stores its result.
    ///
    /// Returns `None` when `pending` is no longer the form's current
    /// calculation, i.e. the form was reset or submitted again since. The
    /// result is dropped and the busy flag is left alone in that case.
    pub fn complete(
        &mut self,
        pending: PendingCalculation,
    ) -> Option<&CalculationResult> {
        if !self.calculating || pending.generation != self.generation {
            warn!(
                pending = pending.generation,
                current = self.generation,
                "discarding stale calculation"
            );
            return None;
        }
        Some(self.finish(&pending.input))
    }

    /// Validates and calculates in one step.
    ///
    /// # Errors
    ///
    /// See [`begin_submit`](Self::begin_submit).
    pub fn submit(&mut self) -> Result<&CalculationResult, SubmitError> {
        let pending = self.begin_submit()?;
        Ok(self.finish(&pending.input))
    }

    fn finish(
        &mut self,
        input: &ValidatedInput,
    ) -> &CalculationResult {
        let result = calculate(input);
        info!(
            monthly_payment = result.monthly_payment,
            total_amount = result.total_amount,
            mortgage_type = result.mortgage_type.as_str(),
            "mortgage calculated"
        );

        self.calculating = false;
        self.result.insert(result)
    }

    /// Clears every field, error and result and returns the type to
    /// [`MortgageType::Repayment`].
    pub fn reset(&mut self) {
        self.amount.clear();
        self.term.clear();
        self.rate.clear();
        self.mortgage_type = MortgageType::default();
        self.errors = ValidationErrors::default();
        self.result = None;
        self.calculating = false;
        self.generation = self.generation.wrapping_add(1);
    }
}
