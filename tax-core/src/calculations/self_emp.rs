//! Self-employment tax calculations.
//!
//! Follows Schedule SE: net profit is scaled to net earnings, social security
//! tax applies up to whatever wage base the W-2 wages left unused, Medicare
//! applies to all net earnings, and the additional Medicare surtax applies
//! to combined wages and net earnings above the filing-status threshold.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Net earnings: net profit × 92.35% |
//! | 2    | Remaining SS wage base: wage base − W-2 wages (floor 0) |
//! | 3    | SS-taxable earnings: smaller of step 1 and step 2 |
//! | 4    | Social security tax: step 3 × 12.4% |
//! | 5    | Medicare tax: step 1 × 2.9% |
//! | 6    | Additional Medicare: (wages + step 1 − threshold, floor 0) × 0.9% |
//! | 7    | SE tax: steps 4 + 5 + 6 |
//! | 8    | Deductible part: step 7 × 50% |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::SeTaxCalculator;
//! use tax_core::{FilingStatus, SelfEmploymentConstants};
//!
//! let constants = SelfEmploymentConstants {
//!     social_security_rate: dec!(0.124),
//!     medicare_rate: dec!(0.029),
//!     additional_medicare_rate: dec!(0.009),
//!     social_security_wage_base: dec!(176100),
//!     additional_medicare_threshold_single: dec!(200000),
//!     additional_medicare_threshold_married: dec!(250000),
//!     net_earnings_multiplier: dec!(0.9235),
//!     deduction_factor: dec!(0.50),
//! };
//!
//! let calculator = SeTaxCalculator::new(&constants);
//! let result = calculator
//!     .calculate(dec!(100000), dec!(0), FilingStatus::Single)
//!     .unwrap();
//!
//! assert_eq!(result.self_employment_tax, dec!(14129.55));
//! assert_eq!(result.se_tax_deduction, dec!(7064.775));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{FilingStatus, SelfEmploymentConstants};

/// Errors raised when the year's self-employment constants are unusable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SeTaxError {
    #[error("net earnings multiplier must be between 0 and 1, got {0}")]
    InvalidNetEarningsMultiplier(Decimal),

    #[error("social security rate must be between 0 and 1, got {0}")]
    InvalidSocialSecurityRate(Decimal),

    #[error("medicare rate must be between 0 and 1, got {0}")]
    InvalidMedicareRate(Decimal),

    #[error("additional medicare rate must be between 0 and 1, got {0}")]
    InvalidAdditionalMedicareRate(Decimal),

    #[error("deduction factor must be between 0 and 1, got {0}")]
    InvalidDeductionFactor(Decimal),

    #[error("social security wage base must be positive, got {0}")]
    InvalidWageBase(Decimal),

    #[error("additional medicare threshold must be non-negative, got {0}")]
    InvalidAdditionalMedicareThreshold(Decimal),
}

impl SelfEmploymentConstants {
    /// Checks every rate and limit is inside its valid range.
    ///
    /// # Errors
    ///
    /// Returns the first [`SeTaxError`] found, checking the multiplier,
    /// then each rate, then the wage base and thresholds.
    pub fn validate(&self) -> Result<(), SeTaxError> {
        let in_unit = |value: Decimal| value >= Decimal::ZERO && value <= Decimal::ONE;

        if self.net_earnings_multiplier <= Decimal::ZERO
            || self.net_earnings_multiplier > Decimal::ONE
        {
            return Err(SeTaxError::InvalidNetEarningsMultiplier(
                self.net_earnings_multiplier,
            ));
        }
        if !in_unit(self.social_security_rate) {
            return Err(SeTaxError::InvalidSocialSecurityRate(
                self.social_security_rate,
            ));
        }
        if !in_unit(self.medicare_rate) {
            return Err(SeTaxError::InvalidMedicareRate(self.medicare_rate));
        }
        if !in_unit(self.additional_medicare_rate) {
            return Err(SeTaxError::InvalidAdditionalMedicareRate(
                self.additional_medicare_rate,
            ));
        }
        if !in_unit(self.deduction_factor) {
            return Err(SeTaxError::InvalidDeductionFactor(self.deduction_factor));
        }
        if self.social_security_wage_base <= Decimal::ZERO {
            return Err(SeTaxError::InvalidWageBase(self.social_security_wage_base));
        }
        for threshold in [
            self.additional_medicare_threshold_single,
            self.additional_medicare_threshold_married,
        ] {
            if threshold < Decimal::ZERO {
                return Err(SeTaxError::InvalidAdditionalMedicareThreshold(threshold));
            }
        }
        Ok(())
    }

    /// Additional Medicare threshold; the married tier is for joint returns.
    pub fn additional_medicare_threshold(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        if status.is_joint() {
            self.additional_medicare_threshold_married
        } else {
            self.additional_medicare_threshold_single
        }
    }
}

/// Self-employment tax and its line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeTaxResult {
    /// Net self-employment income the tax was computed from.
    pub net_profit: Decimal,
    /// Net profit × net earnings multiplier.
    pub net_earnings: Decimal,
    pub ss_taxable_earnings: Decimal,
    pub social_security_tax: Decimal,
    pub medicare_tax: Decimal,
    pub additional_medicare_tax: Decimal,
    pub self_employment_tax: Decimal,
    /// Half of the SE tax, deducted above the line.
    pub se_tax_deduction: Decimal,
}

impl SeTaxResult {
    fn none(net_profit: Decimal) -> Self {
        Self {
            net_profit,
            ..Self::default()
        }
    }
}

/// Computes self-employment tax for one filer.
#[derive(Debug, Clone, Copy)]
pub struct SeTaxCalculator<'a> {
    constants: &'a SelfEmploymentConstants,
}

impl<'a> SeTaxCalculator<'a> {
    pub fn new(constants: &'a SelfEmploymentConstants) -> Self {
        Self { constants }
    }

    /// Runs every step and returns the tax with its line items.
    ///
    /// # Arguments
    ///
    /// * `net_profit` - Self-employment income minus business expenses
    /// * `wages` - W-2 wages, which use up social security wage base first
    /// * `status` - Selects the additional Medicare threshold
    ///
    /// Zero or negative profit yields an all-zero result.
    ///
    /// # Errors
    ///
    /// Returns [`SeTaxError`] if the constants are invalid.
    pub fn calculate(
        &self,
        net_profit: Decimal,
        wages: Decimal,
        status: FilingStatus,
    ) -> Result<SeTaxResult, SeTaxError> {
        self.constants.validate()?;

        if net_profit <= Decimal::ZERO {
            if net_profit < Decimal::ZERO {
                warn!(
                    net_profit = %net_profit,
                    "Net self-employment income is negative; no SE tax applies"
                );
            }
            return Ok(SeTaxResult::none(net_profit));
        }

        let net_earnings = self.net_earnings(net_profit);
        let remaining_base = self.remaining_wage_base(wages);
        let ss_taxable_earnings = net_earnings.min(remaining_base);
        let social_security_tax = ss_taxable_earnings * self.constants.social_security_rate;
        let medicare_tax = net_earnings * self.constants.medicare_rate;
        let additional_medicare_tax = self.additional_medicare_tax(wages, net_earnings, status);

        let self_employment_tax = social_security_tax + medicare_tax + additional_medicare_tax;
        let se_tax_deduction = self_employment_tax * self.constants.deduction_factor;

        debug!(
            net_earnings = %net_earnings,
            ss_taxable_earnings = %ss_taxable_earnings,
            self_employment_tax = %self_employment_tax,
            "Computed self-employment tax"
        );

        Ok(SeTaxResult {
            net_profit,
            net_earnings,
            ss_taxable_earnings,
            social_security_tax,
            medicare_tax,
            additional_medicare_tax,
            self_employment_tax,
            se_tax_deduction,
        })
    }

    fn net_earnings(
        &self,
        net_profit: Decimal,
    ) -> Decimal {
        net_profit * self.constants.net_earnings_multiplier
    }

    /// Wage base left for self-employment earnings after W-2 wages.
    fn remaining_wage_base(
        &self,
        wages: Decimal,
    ) -> Decimal {
        let remaining = self.constants.social_security_wage_base - wages;
        if remaining <= Decimal::ZERO {
            warn!(
                wage_base = %self.constants.social_security_wage_base,
                wages = %wages,
                "Wages meet or exceed the social security wage base; no SS tax on SE income"
            );
            return Decimal::ZERO;
        }
        remaining
    }

    fn additional_medicare_tax(
        &self,
        wages: Decimal,
        net_earnings: Decimal,
        status: FilingStatus,
    ) -> Decimal {
        let threshold = self.constants.additional_medicare_threshold(status);
        let excess = (wages + net_earnings - threshold).max(Decimal::ZERO);
        excess * self.constants.additional_medicare_rate
    }
}
