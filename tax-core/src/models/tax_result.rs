use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DeductionType, FilingStatus, State};
use crate::calculations::{BracketSlice, ItemizedBreakdown, SeTaxResult};

/// Tax owed to one jurisdiction and how it compares to withholding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionTax {
    pub taxable_income: Decimal,
    pub tax: Decimal,
    pub breakdown: Vec<BracketSlice>,
    pub withheld: Decimal,
    /// Withheld minus owed; positive is a refund.
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginalRates {
    /// At federal taxable income.
    pub federal: Decimal,
    /// At AGI, on the state schedule.
    pub state: Decimal,
    /// Top city rate when the filer is a city resident, otherwise zero.
    pub city: Decimal,
    pub combined: Decimal,
}

/// Snapshot of one computation. Never mutated after the estimator builds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputationResult {
    pub tax_year: i32,
    pub filing_status: FilingStatus,
    pub state: State,
    pub nyc_resident: bool,

    pub gross_wages: Decimal,
    pub total_income: Decimal,
    pub pre_tax_total: Decimal,
    pub net_self_employment_income: Decimal,
    pub self_employment: SeTaxResult,
    pub agi: Decimal,

    pub requested_deduction: DeductionType,
    pub deduction_used: DeductionType,
    pub deduction_amount: Decimal,
    pub standard_deduction: Decimal,
    /// Present only when itemizing was requested.
    pub itemized: Option<ItemizedBreakdown>,

    pub federal: JurisdictionTax,
    pub state_tax: JurisdictionTax,
    /// Present only for city residents.
    pub city: Option<JurisdictionTax>,

    pub total_balance: Decimal,
    /// Total tax as a percentage of total income.
    pub effective_rate: Decimal,
    pub marginal_rates: MarginalRates,
}

impl TaxComputationResult {
    /// Federal income tax plus self-employment tax.
    pub fn total_federal_tax(&self) -> Decimal {
        self.federal.tax + self.self_employment.self_employment_tax
    }

    pub fn city_tax(&self) -> Decimal {
        self.city.as_ref().map_or(Decimal::ZERO, |city| city.tax)
    }

    pub fn city_withheld(&self) -> Decimal {
        self.city.as_ref().map_or(Decimal::ZERO, |city| city.withheld)
    }

    pub fn city_balance(&self) -> Decimal {
        self.city.as_ref().map_or(Decimal::ZERO, |city| city.balance)
    }

    pub fn total_tax(&self) -> Decimal {
        self.total_federal_tax() + self.state_tax.tax + self.city_tax()
    }

    pub fn total_withheld(&self) -> Decimal {
        self.federal.withheld + self.state_tax.withheld + self.city_withheld()
    }

    /// Sum of above-the-line reductions: pre-tax contributions and the
    /// deductible half of SE tax.
    pub fn adjustments(&self) -> Decimal {
        self.pre_tax_total + self.self_employment.se_tax_deduction
    }
}
