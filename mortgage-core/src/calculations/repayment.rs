//! Monthly repayment calculations for repayment and interest-only mortgages.
//!
//! # Formulas
//!
//! With `r = annual_rate_percent / 100 / 12` and `n = years × 12`:
//!
//! | Type          | Monthly payment                          | Total interest |
//! |---------------|------------------------------------------|----------------|
//! | Interest-only | `P × r`                                  | `payment × n`  |
//! | Repayment     | `P × r(1+r)^n / ((1+r)^n − 1)`           | `payment × n − P` |
//! | Repayment, r = 0 | `P / n`                               | `0`            |
//!
//! In every case `total_amount = P + total_interest`.
//!
//! All arithmetic is `f64` and nothing is rounded here. The functions assume
//! validated input (see [`crate::validation`]) and do not re-check bounds.
//!
//! # Example
//!
//! ```
//! use mortgage_core::MortgageType;
//! use mortgage_core::calculations::compute;
//!
//! let repayment = compute(200_000.0, 5.0, 25.0, MortgageType::InterestOnly);
//!
//! assert!((repayment.monthly_payment - 833.33).abs() < 0.01);
//! assert!((repayment.total_interest - 250_000.0).abs() < 1e-6);
//! assert!((repayment.total_amount - 450_000.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::PAYMENTS_PER_YEAR;
use crate::models::{CalculationResult, MortgageType};
use crate::validation::ValidatedInput;

/// The three figures produced by [`compute`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Repayment {
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub total_amount: f64,
}

/// Computes the monthly payment, total interest and total amount repayable.
///
/// # Arguments
///
/// * `principal` - Amount borrowed
/// * `annual_rate_percent` - Annual interest rate in percent (e.g. `5.0`)
/// * `years` - Term of the mortgage in years
/// * `mortgage_type` - Whether the principal is repaid over the term
pub fn compute(
    principal: f64,
    annual_rate_percent: f64,
    years: f64,
    mortgage_type: MortgageType,
) -> Repayment {
    let rate = monthly_rate(annual_rate_percent);
    let payments = payment_count(years);

    let (monthly_payment, total_interest) = match mortgage_type {
        MortgageType::InterestOnly => {
            let payment = interest_only_payment(principal, rate);
            (payment, payment * payments)
        }
        MortgageType::Repayment => {
            let payment = amortized_payment(principal, rate, payments);
            (payment, payment * payments - principal)
        }
    };

    let repayment = Repayment {
        monthly_payment,
        total_interest,
        total_amount: principal + total_interest,
    };

    debug!(
        principal,
        annual_rate_percent,
        years,
        mortgage_type = mortgage_type.as_str(),
        monthly_payment = repayment.monthly_payment,
        total_interest = repayment.total_interest,
        "computed mortgage repayment"
    );

    repayment
}

/// Runs [`compute`] on validated input and echoes the inputs into the result.
pub fn calculate(input: &ValidatedInput) -> CalculationResult {
    let repayment = compute(
        input.principal(),
        input.annual_rate(),
        input.years(),
        input.mortgage_type(),
    );

    CalculationResult {
        monthly_payment: repayment.monthly_payment,
        total_interest: repayment.total_interest,
        total_amount: repayment.total_amount,
        principal: input.principal(),
        years: input.years(),
        annual_rate: input.annual_rate(),
        mortgage_type: input.mortgage_type(),
    }
}

/// Converts an annual percentage rate into a monthly fraction.
fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / PAYMENTS_PER_YEAR
}

/// Number of monthly payments over the term.
fn payment_count(years: f64) -> f64 {
    years * PAYMENTS_PER_YEAR
}

fn interest_only_payment(
    principal: f64,
    monthly_rate: f64,
) -> f64 {
    principal * monthly_rate
}

/// Level payment that retires `principal` over `payments` months.
fn amortized_payment(
    principal: f64,
    monthly_rate: f64,
    payments: f64,
) -> f64 {
    if monthly_rate == 0.0 {
        warn!(
            principal,
            payments, "zero interest rate; repaying principal in equal instalments"
        );
        return principal / payments;
    }

    let growth = (1.0 + monthly_rate).powf(payments);
    principal * (monthly_rate * growth) / (growth - 1.0)
}
