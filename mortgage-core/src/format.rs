//! Display formatting for monetary values.
//!
//! Calculations run in `f64`; formatting converts to [`Decimal`] so that the
//! two-decimal rounding is exact half-up rather than binary-float rounding.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::calculations::common::round_half_up;

/// Formats a value as dollars with thousands separators and two decimals.
///
/// Values too large for [`Decimal`] (beyond about 7.9e28) are rounded by
/// `f64` formatting instead but still grouped. `inf` and `NaN` print as-is.
///
/// # Examples
///
/// ```
/// use mortgage_core::format::format_currency;
///
/// assert_eq!(format_currency(1169.180083), "$1,169.18");
/// assert_eq!(format_currency(450000.0), "$450,000.00");
/// assert_eq!(format_currency(-12.5), "-$12.50");
/// ```
pub fn format_currency(value: f64) -> String {
    let Some(decimal) = Decimal::from_f64(value) else {
        return format_out_of_range(value);
    };
    let rounded = round_half_up(decimal);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    format!("{sign}${}", group_thousands(&digits))
}

fn format_out_of_range(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(&format!("{:.2}", value.abs())))
}

/// Formats a limit for use in a message, e.g. `$1,000` or `$1,500.5`.
///
/// Trailing zeros in the fraction are dropped.
pub fn format_amount(value: Decimal) -> String {
    let normalized = value.normalize();
    let sign = if normalized.is_sign_negative() { "-" } else { "" };
    format!("{sign}${}", group_thousands(&normalized.abs().to_string()))
}

/// Inserts `,` every three digits in the integer part of a plain number string.
fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{grouped}.{frac}"),
        None => grouped,
    }
}
