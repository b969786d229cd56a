use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FilingStatus, State};
use crate::TaxError;

/// Pre-tax contributions that reduce AGI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreTaxContributions {
    pub retirement_401k: Decimal,
    pub traditional_ira: Decimal,
    pub hsa: Decimal,
    pub fsa: Decimal,
    pub health_premiums: Decimal,
    pub other: Decimal,
}

impl PreTaxContributions {
    pub fn total(&self) -> Decimal {
        self.retirement_401k
            + self.traditional_ira
            + self.hsa
            + self.fsa
            + self.health_premiums
            + self.other
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeProfile {
    /// W-2 wages and salary.
    pub gross_wages: Decimal,
    pub self_employment_income: Decimal,
    pub business_expenses: Decimal,
    pub other_income: Decimal,
    pub pre_tax: PreTaxContributions,
}

impl IncomeProfile {
    /// Self-employment profit, never below zero.
    pub fn net_self_employment_income(&self) -> Decimal {
        (self.self_employment_income - self.business_expenses).max(Decimal::ZERO)
    }
}

/// Schedule A inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemizedProfile {
    pub mortgage_interest: Decimal,
    pub mortgage_interest_second_home: Decimal,
    pub mortgage_points: Decimal,
    pub pmi_premiums: Decimal,
    pub property_taxes: Decimal,
    pub state_income_tax_paid: Decimal,
    pub local_income_tax_paid: Decimal,
    pub vehicle_registration_fees: Decimal,
    pub charitable_cash: Decimal,
    pub charitable_non_cash: Decimal,
    pub charitable_stock: Decimal,
    pub medical_expenses: Decimal,
    pub casualty_losses: Decimal,
    pub gambling_losses: Decimal,
    pub investment_interest: Decimal,
    pub home_office_expenses: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withholdings {
    pub federal: Decimal,
    pub state: Decimal,
    pub city: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeductionType {
    #[default]
    Standard,
    Itemized,
}

impl DeductionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Itemized => "itemized",
        }
    }
}

impl fmt::Display for DeductionType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeductionType {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "itemized" => Ok(Self::Itemized),
            _ => Err(TaxError::invalid_enum("deduction type", s)),
        }
    }
}

/// Everything the estimator needs for one computation.
///
/// Amounts are expected to be sanitized, non-negative values; the input
/// layer owns that guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRequest {
    pub tax_year: i32,
    pub filing_status: FilingStatus,
    pub state: State,
    pub nyc_resident: bool,
    pub income: IncomeProfile,
    pub itemized: ItemizedProfile,
    pub deduction_type: DeductionType,
    pub withholdings: Withholdings,
}

impl TaxRequest {
    /// A request with no income, standard deduction and no withholding.
    pub fn new(
        tax_year: i32,
        filing_status: FilingStatus,
        state: State,
    ) -> Self {
        Self {
            tax_year,
            filing_status,
            state,
            nyc_resident: false,
            income: IncomeProfile::default(),
            itemized: ItemizedProfile::default(),
            deduction_type: DeductionType::Standard,
            withholdings: Withholdings::default(),
        }
    }
}
