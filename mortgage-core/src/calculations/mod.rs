//! Mortgage repayment calculations.
//!
//! This module holds the pure formulas: the amortized (annuity) payment for
//! repayment mortgages and the interest-only payment.

pub mod common;
pub mod repayment;

pub use repayment::{Repayment, calculate, compute};
