//! Error types shared by every calculator in the crate.

use thiserror::Error;

use crate::calculations::SeTaxError;

/// Errors raised while resolving tax tables or computing a result.
///
/// A computation either returns a complete result or one of these; nothing
/// is ever partially populated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxError {
    /// No tables are loaded for the requested tax year.
    #[error("tax tables for year {year} not found (supported: {supported})")]
    ConfigNotFound { year: i32, supported: String },

    /// A code or combination outside the closed set the calculator supports.
    #[error("invalid {field}: '{value}'")]
    InvalidEnum { field: &'static str, value: String },

    /// A bracket schedule does not partition `[0, ∞)`.
    #[error("invalid bracket schedule '{schedule}': {reason}")]
    InvalidSchedule { schedule: String, reason: String },

    /// The year's self-employment constants are out of range.
    #[error("invalid self-employment constants: {0}")]
    SelfEmployment(#[from] SeTaxError),
}

impl TaxError {
    pub(crate) fn invalid_enum(
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidEnum {
            field,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn config_not_found_displays_year_and_supported_years() {
        let error = TaxError::ConfigNotFound {
            year: 2019,
            supported: "2024, 2025, 2026".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "tax tables for year 2019 not found (supported: 2024, 2025, 2026)"
        );
    }

    #[test]
    fn invalid_enum_displays_field_and_value() {
        let error = TaxError::invalid_enum("filing status", "QSS");

        assert_eq!(error.to_string(), "invalid filing status: 'QSS'");
    }

    #[test]
    fn invalid_schedule_displays_reason() {
        let error = TaxError::InvalidSchedule {
            schedule: "NY/single".to_string(),
            reason: "gap at 8500".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "invalid bracket schedule 'NY/single': gap at 8500"
        );
    }

    #[test]
    fn self_employment_error_wraps_constant_error() {
        let error: TaxError = SeTaxError::InvalidWageBase(rust_decimal::Decimal::ZERO).into();

        assert_eq!(
            error.to_string(),
            "invalid self-employment constants: social security wage base must be positive, got 0"
        );
    }
}
