//! Mortgage repayment calculator core.
//!
//! The pipeline is linear: raw form text is parsed into a [`FormInput`],
//! checked by [`validate`] / [`validate_input`], and a [`ValidatedInput`] is
//! turned into a [`CalculationResult`] by [`calculations::calculate`].
//! [`MortgageForm`] wraps that pipeline with the state a front end needs.

pub mod calculations;
pub mod form;
pub mod format;
pub mod models;
pub mod validation;

pub use form::{MortgageForm, PendingCalculation, SubmitError};
pub use models::*;
pub use validation::{
    Field, FieldError, RulesError, ValidatedInput, ValidationErrors, ValidationRules, validate,
    validate_input,
};
