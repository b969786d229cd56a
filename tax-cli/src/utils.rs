use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a cell cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

impl ParseDecimalError {
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Trims whitespace and removes the currency sign and thousands separators.
fn normalize_amount_input(s: &str) -> String {
    s.trim().replace(['$', ','], "")
}

/// Parses a currency string into a [`Decimal`].
///
/// Accepts `"$1,234.56"` as well as `"1234.56"`. Empty or whitespace-only
/// input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid amount: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Parses an input amount the estimator can accept: like [`parse_decimal`],
/// but a negative value is clamped to 0.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseDecimalError> {
    let value = parse_decimal(s)?;
    if value < Decimal::ZERO {
        tracing::warn!(input = %s, "negative amount clamped to zero");
        return Ok(Decimal::ZERO);
    }
    Ok(value)
}

/// Parses a yes/no cell. Empty is `false`.
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "n" | "0" => Some(false),
        "true" | "yes" | "y" | "1" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_strips_dollar_sign() {
        assert_eq!(parse_decimal("$85,000").unwrap(), dec!(85000));
        assert_eq!(parse_decimal(" $12.50 ").unwrap(), dec!(12.50));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), dec!(0));
        assert_eq!(parse_decimal("   ").unwrap(), dec!(0));
    }

    #[test]
    fn parse_decimal_rejects_garbage() {
        let err = parse_decimal("12k").unwrap_err();

        assert_eq!(err.input(), "12k");
        assert!(err.to_string().starts_with("invalid amount '12k'"));
    }

    #[test]
    fn parse_amount_clamps_negative_to_zero() {
        assert_eq!(parse_amount("-500").unwrap(), dec!(0));
        assert_eq!(parse_amount("-$1,000.00").unwrap(), dec!(0));
        assert_eq!(parse_amount("500").unwrap(), dec!(500));
    }

    #[test]
    fn parse_flag_accepts_common_spellings() {
        for yes in ["true", "TRUE", "yes", "Y", "1"] {
            assert_eq!(parse_flag(yes), Some(true), "{yes}");
        }
        for no in ["", "false", "No", "n", "0"] {
            assert_eq!(parse_flag(no), Some(false), "{no}");
        }
        assert_eq!(parse_flag("maybe"), None);
    }
}
