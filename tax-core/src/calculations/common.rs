//! Rounding and display helpers shared by the calculators and the report.
//!
//! Calculations never round; these are applied when a value leaves the core
//! as a displayed amount or a whole-dollar savings estimate.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to the nearest whole currency unit, half away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(1519.5)), dec!(1520));
/// assert_eq!(round_whole(dec!(1519.49)), dec!(1519));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as whole dollars with thousands separators.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::format_currency;
///
/// assert_eq!(format_currency(dec!(1234567.5)), "$1,234,568");
/// assert_eq!(format_currency(dec!(-950)), "-$950");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_whole(value);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(&digits))
}

/// Formats a rate (0.304) as a percentage ("30.4%") with `precision` places.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::format_rate;
///
/// assert_eq!(format_rate(dec!(0.30376), 1), "30.4%");
/// assert_eq!(format_rate(dec!(0.22), 0), "22%");
/// assert_eq!(format_rate(dec!(0.0685), 2), "6.85%");
/// ```
pub fn format_rate(
    rate: Decimal,
    precision: u32,
) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    format!("{percent:.prec$}%", prec = precision as usize)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
