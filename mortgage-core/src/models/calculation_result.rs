use std::fmt;

use serde::{Deserialize, Serialize};

use crate::format::format_currency;
use crate::models::MortgageType;

/// Outcome of one successful mortgage calculation.
///
/// Holds the three computed figures together with an echo of the inputs that
/// produced them. Values are unrounded; use [`format_currency`] (or the
/// [`Display`](fmt::Display) impl) for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Payment due every month.
    pub monthly_payment: f64,
    /// Interest paid over the whole term.
    pub total_interest: f64,
    /// Principal plus total interest.
    pub total_amount: f64,
    pub principal: f64,
    pub years: f64,
    /// Annual interest rate in percent (e.g. `5.0` for 5%).
    pub annual_rate: f64,
    pub mortgage_type: MortgageType,
}

impl CalculationResult {
    pub fn is_interest_only(&self) -> bool {
        self.mortgage_type.is_interest_only()
    }

    /// Caption shown next to the monthly payment.
    pub fn payment_caption(&self) -> &'static str {
        if self.is_interest_only() {
            "(Interest Only)"
        } else {
            "(Principal + Interest)"
        }
    }
}

impl fmt::Display for CalculationResult {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "Monthly repayment {}: {}",
            self.payment_caption(),
            format_currency(self.monthly_payment)
        )?;
        writeln!(f, "Total interest:  {}", format_currency(self.total_interest))?;
        writeln!(f, "Total repayable: {}", format_currency(self.total_amount))?;
        writeln!(f)?;
        writeln!(f, "Loan amount:     {}", format_currency(self.principal))?;
        writeln!(f, "Interest rate:   {}% per year", self.annual_rate)?;
        writeln!(f, "Term:            {} years", self.years)?;
        writeln!(f, "Type:            {}", self.mortgage_type.label())
    }
}
