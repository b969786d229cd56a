//! Calculators for bracket tax, self-employment tax and deductions, and the
//! estimator that combines them.

mod bracket;
pub mod common;
mod deductions;
mod estimator;
mod self_emp;

pub use bracket::{BracketSlice, BracketTaxResult, ProgressiveTax};
pub use deductions::{
    CHARITABLE_CASH_AGI_LIMIT, CHARITABLE_STOCK_AGI_LIMIT, DeductionComparison, ItemizedBreakdown,
    MEDICAL_AGI_FLOOR, ResolvedDeduction, SALT_CAP, compare_deductions, compute_itemized,
    resolve_deduction,
};
pub use estimator::TaxEstimator;
pub use self_emp::{SeTaxCalculator, SeTaxError, SeTaxResult};
