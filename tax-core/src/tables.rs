//! Lookup of per-year tax tables.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{TaxError, TaxYearConfig};

/// Supplies the immutable tables for a tax year.
///
/// Implementations must fail with [`TaxError::ConfigNotFound`] for any year
/// they do not carry; callers never fall back to another year.
pub trait TaxTableSource: Send + Sync {
    fn config(
        &self,
        tax_year: i32,
    ) -> Result<&TaxYearConfig, TaxError>;

    /// Supported years, ascending.
    fn supported_years(&self) -> Vec<i32>;
}

/// In-memory set of year configurations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxTables {
    years: BTreeMap<i32, TaxYearConfig>,
}

impl TaxTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the configuration for `config.tax_year`.
    pub fn insert(
        &mut self,
        config: TaxYearConfig,
    ) {
        debug!(tax_year = config.tax_year, "Registered tax year tables");
        self.years.insert(config.tax_year, config);
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaxYearConfig> {
        self.years.values()
    }
}

impl FromIterator<TaxYearConfig> for TaxTables {
    fn from_iter<I: IntoIterator<Item = TaxYearConfig>>(iter: I) -> Self {
        let mut tables = Self::new();
        for config in iter {
            tables.insert(config);
        }
        tables
    }
}

impl TaxTableSource for TaxTables {
    fn config(
        &self,
        tax_year: i32,
    ) -> Result<&TaxYearConfig, TaxError> {
        self.years
            .get(&tax_year)
            .ok_or_else(|| TaxError::ConfigNotFound {
                year: tax_year,
                supported: self
                    .supported_years()
                    .iter()
                    .map(i32::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    fn supported_years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::config_2025;

    #[test]
    fn config_returns_registered_year() {
        let tables: TaxTables = [config_2025()].into_iter().collect();

        let config = tables.config(2025).expect("2025 registered");

        assert_eq!(config.tax_year, 2025);
    }

    #[test]
    fn config_fails_for_missing_year() {
        let mut later = config_2025();
        later.tax_year = 2026;
        let tables: TaxTables = [later, config_2025()].into_iter().collect();

        let result = tables.config(2019);

        assert_eq!(
            result,
            Err(TaxError::ConfigNotFound {
                year: 2019,
                supported: "2025, 2026".to_string(),
            })
        );
    }

    #[test]
    fn supported_years_are_ascending() {
        let mut a = config_2025();
        a.tax_year = 2026;
        let mut b = config_2025();
        b.tax_year = 2024;
        let tables: TaxTables = [a, config_2025(), b].into_iter().collect();

        assert_eq!(tables.supported_years(), vec![2024, 2025, 2026]);
        assert_eq!(tables.len(), 3);
    }
}
