//! Combines the calculators into one federal, state and city result.
//!
//! The flow for a request:
//!
//! 1. Net self-employment income and SE tax
//! 2. Total income, pre-tax contributions and AGI
//! 3. Deduction (standard, or itemized when larger)
//! 4. Federal taxable income and bracket tax
//! 5. State taxable income (NY subtracts its own standard deduction, NJ
//!    taxes AGI) and bracket tax
//! 6. NYC resident tax on the state taxable income
//! 7. Balances, effective rate and marginal rates

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::{ProgressiveTax, SeTaxCalculator, compute_itemized, resolve_deduction};
use crate::{
    DeductionType, JurisdictionTax, MarginalRates, State, TaxComputationResult, TaxError,
    TaxRequest, TaxTableSource, TaxYearConfig,
};

/// Computes tax results against a table source.
///
/// Holds no state between calls; the same request always produces the same
/// result.
pub struct TaxEstimator<'a> {
    tables: &'a dyn TaxTableSource,
}

impl<'a> TaxEstimator<'a> {
    pub fn new(tables: &'a dyn TaxTableSource) -> Self {
        Self { tables }
    }

    /// Runs every layer for `request` and returns the complete result.
    ///
    /// # Errors
    ///
    /// * [`TaxError::ConfigNotFound`] if the year has no tables
    /// * [`TaxError::InvalidEnum`] if city residency is claimed outside NY
    /// * [`TaxError::SelfEmployment`] if the year's SE constants are invalid
    pub fn compute(
        &self,
        request: &TaxRequest,
    ) -> Result<TaxComputationResult, TaxError> {
        if request.nyc_resident && !request.state.has_city_tax() {
            return Err(TaxError::invalid_enum(
                "city residency",
                format!("NYC resident filing in {}", request.state),
            ));
        }

        let config = self.tables.config(request.tax_year)?;
        let status = request.filing_status;
        let income = &request.income;

        let net_se = income.net_self_employment_income();
        let self_employment = SeTaxCalculator::new(&config.self_employment).calculate(
            net_se,
            income.gross_wages,
            status,
        )?;

        let total_income = income.gross_wages + net_se + income.other_income;
        let pre_tax_total = income.pre_tax.total();
        let agi = total_income - pre_tax_total - self_employment.se_tax_deduction;
        debug!(
            total_income = %total_income,
            pre_tax_total = %pre_tax_total,
            se_tax = %self_employment.self_employment_tax,
            agi = %agi,
            "Computed adjusted gross income"
        );

        let standard_deduction = config.standard_deduction_for(status);
        let itemized = match request.deduction_type {
            DeductionType::Itemized => Some(compute_itemized(agi, &request.itemized)),
            DeductionType::Standard => None,
        };
        let itemized_total = itemized.as_ref().map_or(Decimal::ZERO, |i| i.total);
        let deduction = resolve_deduction(request.deduction_type, standard_deduction, itemized_total);
        debug!(
            requested = %request.deduction_type,
            used = %deduction.used,
            amount = %deduction.amount,
            "Resolved deduction"
        );

        let federal_schedule = config.federal_schedule(status);
        let federal_taxable = (agi - deduction.amount).max(Decimal::ZERO);
        let federal_bracket = ProgressiveTax::new(federal_schedule).calculate(federal_taxable);
        let federal_owed = federal_bracket.tax + self_employment.self_employment_tax;
        let federal = JurisdictionTax {
            taxable_income: federal_taxable,
            tax: federal_bracket.tax,
            breakdown: federal_bracket.breakdown,
            withheld: request.withholdings.federal,
            balance: request.withholdings.federal - federal_owed,
        };
        debug!(taxable = %federal.taxable_income, tax = %federal.tax, "Computed federal tax");

        let state_key = status.state_key();
        let state_schedule = config.state_schedule(request.state, state_key);
        let state_taxable = state_taxable_income(config, request, agi);
        let state_bracket = ProgressiveTax::new(state_schedule).calculate(state_taxable);
        let state_tax = JurisdictionTax {
            taxable_income: state_taxable,
            tax: state_bracket.tax,
            breakdown: state_bracket.breakdown,
            withheld: request.withholdings.state,
            balance: request.withholdings.state - state_bracket.tax,
        };
        debug!(
            state = %request.state,
            taxable = %state_tax.taxable_income,
            tax = %state_tax.tax,
            "Computed state tax"
        );

        let city_schedule = config.city_schedule(state_key);
        let city = request.nyc_resident.then(|| {
            let city_bracket = ProgressiveTax::new(city_schedule).calculate(state_taxable);
            debug!(taxable = %state_taxable, tax = %city_bracket.tax, "Computed NYC tax");
            JurisdictionTax {
                taxable_income: state_taxable,
                tax: city_bracket.tax,
                breakdown: city_bracket.breakdown,
                withheld: request.withholdings.city,
                balance: request.withholdings.city - city_bracket.tax,
            }
        });

        let city_balance = city.as_ref().map_or(Decimal::ZERO, |c| c.balance);
        let city_tax = city.as_ref().map_or(Decimal::ZERO, |c| c.tax);
        let total_balance = federal.balance + state_tax.balance + city_balance;
        let total_tax = federal_owed + state_tax.tax + city_tax;
        let effective_rate = if total_income.is_zero() {
            Decimal::ZERO
        } else {
            total_tax / total_income * Decimal::ONE_HUNDRED
        };

        let federal_marginal = ProgressiveTax::new(federal_schedule).marginal_rate(federal_taxable);
        let state_marginal = ProgressiveTax::new(state_schedule).marginal_rate(agi);
        let city_marginal = if request.nyc_resident {
            city_schedule.top_rate()
        } else {
            Decimal::ZERO
        };
        let marginal_rates = MarginalRates {
            federal: federal_marginal,
            state: state_marginal,
            city: city_marginal,
            combined: federal_marginal + state_marginal + city_marginal,
        };

        info!(
            tax_year = request.tax_year,
            filing_status = status.as_str(),
            state = %request.state,
            agi = %agi,
            total_tax = %total_tax,
            total_balance = %total_balance,
            "Tax estimate computed"
        );

        Ok(TaxComputationResult {
            tax_year: request.tax_year,
            filing_status: status,
            state: request.state,
            nyc_resident: request.nyc_resident,
            gross_wages: income.gross_wages,
            total_income,
            pre_tax_total,
            net_self_employment_income: net_se,
            self_employment,
            agi,
            requested_deduction: request.deduction_type,
            deduction_used: deduction.used,
            deduction_amount: deduction.amount,
            standard_deduction,
            itemized,
            federal,
            state_tax,
            city,
            total_balance,
            effective_rate,
            marginal_rates,
        })
    }
}

/// NY subtracts its own standard deduction; NJ has none and taxes AGI.
fn state_taxable_income(
    config: &TaxYearConfig,
    request: &TaxRequest,
    agi: Decimal,
) -> Decimal {
    let taxable = match request.state {
        State::NewYork => agi - config.ny_standard_deduction_for(request.filing_status),
        State::NewJersey => agi,
    };
    taxable.max(Decimal::ZERO)
}
