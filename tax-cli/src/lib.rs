//! Command-line front end: CSV input, estimation and rendering.

pub mod csv_loader;
pub mod render;
pub mod utils;

use serde::Serialize;
use tax_core::{
    GuidanceContext, GuidanceEngine, GuidanceReport, TaxComputationResult, TaxError, TaxEstimator,
    TaxRequest, TaxTableSource,
};
use tracing::info;

/// One request with its computed result and, optionally, its guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Estimate {
    pub request: TaxRequest,
    pub result: TaxComputationResult,
    pub guidance: Option<GuidanceReport>,
}

/// Computes a request and, when asked, runs the guidance rules over it.
///
/// # Errors
///
/// Propagates the estimator's [`TaxError`], e.g. for an unsupported year.
pub fn estimate(
    tables: &dyn TaxTableSource,
    request: TaxRequest,
    with_guidance: bool,
) -> Result<Estimate, TaxError> {
    let result = TaxEstimator::new(tables).compute(&request)?;
    let guidance = if with_guidance {
        let context = GuidanceContext::from_tables(tables, &request, &result)?;
        Some(GuidanceEngine::new().generate(&context))
    } else {
        None
    };

    info!(
        tax_year = result.tax_year,
        filing_status = result.filing_status.as_str(),
        state = result.state.as_str(),
        total_balance = %result.total_balance,
        "estimate computed"
    );

    Ok(Estimate {
        request,
        result,
        guidance,
    })
}
