//! Federal, New York, New Jersey and NYC income tax estimation.
//!
//! [`TaxEstimator`] turns a [`TaxRequest`] into a [`TaxComputationResult`]
//! using the tables from a [`TaxTableSource`]; [`GuidanceEngine`] then derives
//! savings recommendations from that result.

pub mod calculations;
mod error;
pub mod guidance;
pub mod models;
pub mod report;
mod tables;

#[cfg(test)]
mod test_support;

pub use calculations::TaxEstimator;
pub use error::TaxError;
pub use guidance::{GuidanceContext, GuidanceEngine};
pub use models::*;
pub use tables::{TaxTableSource, TaxTables};
