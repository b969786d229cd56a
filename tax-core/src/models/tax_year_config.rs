use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BracketSchedule, FilingStatus, PerFilingStatus, State, StateFilingKey};

/// Everything the calculators need for one tax year.
///
/// Built once by a [`TaxTableSource`](crate::TaxTableSource) and only ever
/// read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,
    pub federal_brackets: PerFilingStatus<BracketSchedule>,
    pub standard_deduction: PerFilingStatus<Decimal>,
    pub ny_standard_deduction: PerFilingStatus<Decimal>,
    pub self_employment: SelfEmploymentConstants,
    pub contribution_limits: ContributionLimits,
    pub state_brackets: StateBrackets,
}

impl TaxYearConfig {
    pub fn federal_schedule(
        &self,
        status: FilingStatus,
    ) -> &BracketSchedule {
        self.federal_brackets.get(status)
    }

    pub fn standard_deduction_for(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        *self.standard_deduction.get(status)
    }

    pub fn ny_standard_deduction_for(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        *self.ny_standard_deduction.get(status)
    }

    pub fn state_schedule(
        &self,
        state: State,
        key: StateFilingKey,
    ) -> &BracketSchedule {
        match state {
            State::NewYork => self.state_brackets.new_york.get(key),
            State::NewJersey => self.state_brackets.new_jersey.get(key),
        }
    }

    pub fn city_schedule(
        &self,
        key: StateFilingKey,
    ) -> &BracketSchedule {
        self.state_brackets.new_york_city.get(key)
    }
}

/// Self-employment tax rates and limits for a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmploymentConstants {
    /// Combined employer + employee social security rate (12.4%).
    pub social_security_rate: Decimal,
    /// Combined Medicare rate (2.9%), applied without a cap.
    pub medicare_rate: Decimal,
    /// Surtax on earnings above the additional Medicare threshold (0.9%).
    pub additional_medicare_rate: Decimal,
    /// Maximum earnings subject to social security tax.
    pub social_security_wage_base: Decimal,
    pub additional_medicare_threshold_single: Decimal,
    pub additional_medicare_threshold_married: Decimal,
    /// Share of net profit treated as net earnings (92.35%).
    pub net_earnings_multiplier: Decimal,
    /// Deductible share of the SE tax (50%).
    pub deduction_factor: Decimal,
}

/// Annual contribution limits used by the guidance rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionLimits {
    pub traditional_401k: Decimal,
    pub traditional_401k_age_50: Decimal,
    pub traditional_401k_age_60_to_63: Decimal,
    pub ira: Decimal,
    pub ira_age_50: Decimal,
    pub hsa_self_only: Decimal,
    pub hsa_family: Decimal,
    pub fsa_health: Decimal,
    pub fsa_dependent_care: Decimal,
    pub sep_ira: Decimal,
    pub solo_401k: Decimal,
}

impl ContributionLimits {
    /// HSA limit for the filer: family coverage for joint returns.
    pub fn hsa_limit(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        if status.is_joint() {
            self.hsa_family
        } else {
            self.hsa_self_only
        }
    }
}

/// A state or city table pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerStateKey<T> {
    pub single: T,
    pub married: T,
}

impl<T> PerStateKey<T> {
    pub fn get(
        &self,
        key: StateFilingKey,
    ) -> &T {
        match key {
            StateFilingKey::Single => &self.single,
            StateFilingKey::Married => &self.married,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateBrackets {
    pub new_york: PerStateKey<BracketSchedule>,
    pub new_jersey: PerStateKey<BracketSchedule>,
    pub new_york_city: PerStateKey<BracketSchedule>,
}
