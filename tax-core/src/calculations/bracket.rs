//! Progressive (marginal bracket) tax calculation.
//!
//! Income is split into slices, one per bracket, and each slice is taxed at
//! its bracket's rate. Nothing is rounded here; rounding happens only when
//! an amount is displayed.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::ProgressiveTax;
//! use tax_core::{BracketSchedule, TaxBracket};
//!
//! let schedule = BracketSchedule::new(
//!     "example",
//!     vec![
//!         TaxBracket { min_income: dec!(0), max_income: Some(dec!(10000)), tax_rate: dec!(0.10) },
//!         TaxBracket { min_income: dec!(10000), max_income: None, tax_rate: dec!(0.20) },
//!     ],
//! )
//! .unwrap();
//!
//! let result = ProgressiveTax::new(&schedule).calculate(dec!(25000));
//!
//! assert_eq!(result.tax, dec!(4000.00)); // 1000 + 15000 × 20%
//! assert_eq!(result.breakdown.len(), 2);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::BracketSchedule;

/// The part of taxable income that fell into one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub rate: Decimal,
    pub amount: Decimal,
    pub tax: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTaxResult {
    pub tax: Decimal,
    /// Only brackets with a non-zero slice, lowest first.
    pub breakdown: Vec<BracketSlice>,
}

/// Applies one bracket schedule to taxable income.
#[derive(Debug, Clone, Copy)]
pub struct ProgressiveTax<'a> {
    schedule: &'a BracketSchedule,
}

impl<'a> ProgressiveTax<'a> {
    pub fn new(schedule: &'a BracketSchedule) -> Self {
        Self { schedule }
    }

    /// Computes total tax and the per-bracket breakdown.
    ///
    /// Negative income is treated as zero.
    pub fn calculate(
        &self,
        taxable_income: Decimal,
    ) -> BracketTaxResult {
        if taxable_income < Decimal::ZERO {
            warn!(
                taxable_income = %taxable_income,
                "Negative taxable income; treating as zero"
            );
        }

        let mut remaining = taxable_income.max(Decimal::ZERO);
        let mut result = BracketTaxResult::default();

        for bracket in self.schedule.brackets() {
            if remaining <= Decimal::ZERO {
                break;
            }
            let amount = match bracket.width() {
                Some(width) => remaining.min(width),
                None => remaining,
            };
            let tax = amount * bracket.tax_rate;

            result.tax += tax;
            result.breakdown.push(BracketSlice {
                rate: bracket.tax_rate,
                amount,
                tax,
            });
            remaining -= amount;
        }

        result
    }

    /// Rate applied to the next dollar of `income`.
    ///
    /// Scans from the top bracket down and returns the rate of the first
    /// bracket whose lower bound is strictly below `income`. Income at or
    /// below zero gets the lowest bracket's rate.
    pub fn marginal_rate(
        &self,
        income: Decimal,
    ) -> Decimal {
        let brackets = self.schedule.brackets();
        brackets
            .iter()
            .rev()
            .find(|bracket| income > bracket.min_income)
            .or_else(|| brackets.first())
            .map_or(Decimal::ZERO, |bracket| bracket.tax_rate)
    }
}
