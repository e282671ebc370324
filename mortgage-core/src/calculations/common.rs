//! Common helpers shared by the calculation and formatting code.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Number of payments per year; all mortgages here are paid monthly.
pub const PAYMENTS_PER_YEAR: f64 = 12.0;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use mortgage_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(833.334)), dec!(833.33));
/// assert_eq!(round_half_up(dec!(833.335)), dec!(833.34));
/// assert_eq!(round_half_up(dec!(-833.335)), dec!(-833.34)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a validated decimal field into the `f64` the calculator works in.
///
/// Returns `None` only when the value cannot be represented as a finite float.
pub fn decimal_to_f64(value: Decimal) -> Option<f64> {
    value.to_f64().filter(|v| v.is_finite())
}
