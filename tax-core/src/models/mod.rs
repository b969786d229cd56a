mod filing_status;
mod guidance;
mod jurisdiction;
mod tax_bracket;
mod tax_request;
mod tax_result;
mod tax_year_config;

pub use filing_status::{FilingStatus, PerFilingStatus, StateFilingKey};
pub use guidance::{GuidanceCategory, GuidanceItem, GuidanceReport, Priority, SavingsCalculation};
pub use jurisdiction::{Jurisdiction, State};
pub use tax_bracket::{BracketSchedule, TaxBracket};
pub use tax_request::{
    DeductionType, IncomeProfile, ItemizedProfile, PreTaxContributions, TaxRequest, Withholdings,
};
pub use tax_result::{JurisdictionTax, MarginalRates, TaxComputationResult};
pub use tax_year_config::{
    ContributionLimits, PerStateKey, SelfEmploymentConstants, StateBrackets, TaxYearConfig,
};
