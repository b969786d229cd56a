//! Rule-based tax-reduction guidance.
//!
//! Each [`Rule`] pairs a predicate with a builder. The engine evaluates the
//! rules in their declared order and never re-sorts the output, so items
//! within a category appear in rule order.

mod rules;

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    ContributionLimits, DeductionType, FilingStatus, GuidanceCategory, GuidanceItem,
    GuidanceReport, PreTaxContributions, Priority, State, TaxComputationResult, TaxError,
    TaxRequest, TaxTableSource, TaxYearConfig,
};

pub use rules::RULES;

/// The inputs every rule reads, taken from one request and its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidanceContext {
    pub tax_year: i32,
    pub filing_status: FilingStatus,
    pub state: State,
    pub requested_deduction: DeductionType,
    pub wages: Decimal,
    pub total_income: Decimal,
    pub net_self_employment_income: Decimal,
    pub agi: Decimal,
    pub self_employment_tax: Decimal,
    /// Federal income tax, excluding SE tax.
    pub federal_tax: Decimal,
    pub federal_withheld: Decimal,
    pub standard_deduction: Decimal,
    pub federal_marginal_rate: Decimal,
    pub state_marginal_rate: Decimal,
    pub combined_marginal_rate: Decimal,
    /// Contributions already being made.
    pub current: PreTaxContributions,
    pub limits: ContributionLimits,
}

impl GuidanceContext {
    pub fn new(
        request: &TaxRequest,
        result: &TaxComputationResult,
        config: &TaxYearConfig,
    ) -> Self {
        Self {
            tax_year: result.tax_year,
            filing_status: result.filing_status,
            state: result.state,
            requested_deduction: result.requested_deduction,
            wages: result.gross_wages,
            total_income: result.total_income,
            net_self_employment_income: result.net_self_employment_income,
            agi: result.agi,
            self_employment_tax: result.self_employment.self_employment_tax,
            federal_tax: result.federal.tax,
            federal_withheld: result.federal.withheld,
            standard_deduction: result.standard_deduction,
            federal_marginal_rate: result.marginal_rates.federal,
            state_marginal_rate: result.marginal_rates.state,
            combined_marginal_rate: result.marginal_rates.combined,
            current: request.income.pre_tax.clone(),
            limits: config.contribution_limits.clone(),
        }
    }

    /// Looks up the year's tables and builds the context.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::ConfigNotFound`] if `tables` lacks the result's year.
    pub fn from_tables(
        tables: &dyn TaxTableSource,
        request: &TaxRequest,
        result: &TaxComputationResult,
    ) -> Result<Self, TaxError> {
        let config = tables.config(result.tax_year)?;
        Ok(Self::new(request, result, config))
    }

    pub fn has_self_employment(&self) -> bool {
        self.net_self_employment_income > Decimal::ZERO
    }
}

/// One recommendation: when it applies and what it says.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub category: GuidanceCategory,
    pub priority: Priority,
    /// Whether the item's savings add to the report total.
    pub counts_toward_total: bool,
    pub applies: fn(&GuidanceContext) -> bool,
    pub build: fn(&GuidanceContext) -> GuidanceItem,
}

/// Evaluates a fixed, ordered rule list.
#[derive(Debug, Clone, Copy)]
pub struct GuidanceEngine {
    rules: &'static [Rule],
}

impl Default for GuidanceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GuidanceEngine {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    /// Runs every rule in order and collects the items that apply.
    pub fn generate(
        &self,
        context: &GuidanceContext,
    ) -> GuidanceReport {
        let mut report = GuidanceReport::default();

        for rule in self.rules {
            if !(rule.applies)(context) {
                continue;
            }
            let mut item = (rule.build)(context);
            item.category = rule.category;
            item.priority = rule.priority;

            if rule.counts_toward_total {
                report.total_potential_savings +=
                    item.estimated_annual_savings.unwrap_or(Decimal::ZERO);
            }
            debug!(rule = rule.id, savings = ?item.estimated_annual_savings, "Guidance rule applied");
            report.items.push(item);
        }

        debug!(
            items = report.items.len(),
            total_potential_savings = %report.total_potential_savings,
            "Generated guidance"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::test_support::config_2025;
    use crate::{TaxEstimator, TaxTables};

    fn generate(request: &TaxRequest) -> GuidanceReport {
        let tables: TaxTables = [config_2025()].into_iter().collect();
        let result = TaxEstimator::new(&tables)
            .compute(request)
            .expect("2025 supported");
        let context =
            GuidanceContext::from_tables(&tables, request, &result).expect("2025 supported");
        GuidanceEngine::new().generate(&context)
    }

    fn wage_earner(
        wages: Decimal,
        state: State,
    ) -> TaxRequest {
        let mut request = TaxRequest::new(2025, FilingStatus::Single, state);
        request.income.gross_wages = wages;
        request
    }

    fn base_context() -> GuidanceContext {
        let request = wage_earner(dec!(80000), State::NewYork);
        let tables: TaxTables = [config_2025()].into_iter().collect();
        let result = TaxEstimator::new(&tables)
            .compute(&request)
            .expect("2025 supported");
        GuidanceContext::new(&request, &result, &config_2025())
    }

    fn fired(context: &GuidanceContext) -> Vec<&'static str> {
        GuidanceEngine::new()
            .rules()
            .iter()
            .filter(|rule| (rule.applies)(context))
            .map(|rule| rule.id)
            .collect()
    }

    // =========================================================================
    // scenario tests
    // =========================================================================

    #[test]
    fn generate_single_ny_wage_earner() {
        let report = generate(&wage_earner(dec!(80000), State::NewYork));

        assert_eq!(
            report.titles(),
            vec![
                "Maximize HSA Contributions",
                "Consider Flexible Spending Account (FSA)",
                "Maximize 401(k) Contributions",
                "Traditional IRA Contribution",
                "Consider Roth Contributions",
                "NY 529 Plan Deduction",
                "Tax-Loss Harvesting",
                "Income & Deduction Timing",
                "Adjust Withholding or Pay Quarterly",
            ]
        );
        // 1183 + 550 + 6463 + 1925; NY 529 and loss harvesting are not counted
        assert_eq!(report.total_potential_savings, dec!(10121));
    }

    #[test]
    fn generate_self_employed_nj_filer() {
        let mut request = TaxRequest::new(2025, FilingStatus::Single, State::NewJersey);
        request.income.self_employment_income = dec!(100000);

        let report = generate(&request);

        assert_eq!(
            report.titles(),
            vec![
                "SEP-IRA for Self-Employment Income",
                "Consider a Solo 401(k)",
                "Self-Employed Health Insurance Deduction",
                "Quarterly Estimated Tax Payments Required",
                "Qualified Business Income (QBI) Deduction",
                "Maximize Business Expense Deductions",
                "Maximize HSA Contributions",
                "Consider Flexible Spending Account (FSA)",
                "Traditional IRA Contribution",
                "Consider Roth Contributions",
                "Homeowner Tax Benefits",
                "NJ Property Tax Deduction",
                "Tax-Loss Harvesting",
                "Income & Deduction Timing",
                "Adjust Withholding or Pay Quarterly",
            ]
        );
        // 7093 + 4400 + 1220 + 567 + 1986
        assert_eq!(report.total_potential_savings, dec!(15266));
    }

    #[test]
    fn generate_sep_item_shows_calculation() {
        let mut request = TaxRequest::new(2025, FilingStatus::Single, State::NewJersey);
        request.income.self_employment_income = dec!(100000);

        let report = generate(&request);

        let sep = &report.items[0];
        assert_eq!(sep.category, GuidanceCategory::Retirement);
        assert_eq!(sep.priority, Priority::High);
        assert_eq!(sep.estimated_annual_savings, Some(dec!(7093)));
        assert_eq!(
            sep.limit_text,
            "Your max SEP contribution: $25,000 (25% of $100,000)"
        );
        assert_eq!(
            sep.calculation.as_ref().map(ToString::to_string),
            Some("$25,000 contribution × 28.4% combined marginal rate = $7,093 saved".to_string())
        );
    }

    #[test]
    fn generate_maxed_401k_emits_only_maximized_item() {
        let mut request = wage_earner(dec!(200000), State::NewYork);
        request.income.pre_tax.retirement_401k = dec!(23500);

        let report = generate(&request);

        let titles = report.titles();
        assert!(titles.contains(&"401(k) Maximized ✓"));
        assert!(!titles.contains(&"Maximize 401(k) Contributions"));
    }

    #[test]
    fn generate_without_self_employment_has_no_se_items() {
        let report = generate(&wage_earner(dec!(250000), State::NewYork));

        let titles = report.titles();
        for se_title in [
            "SEP-IRA for Self-Employment Income",
            "Consider a Solo 401(k)",
            "Self-Employed Health Insurance Deduction",
            "Quarterly Estimated Tax Payments Required",
            "Qualified Business Income (QBI) Deduction",
            "Maximize Business Expense Deductions",
        ] {
            assert!(!titles.contains(&se_title), "unexpected {se_title}");
        }
        assert!(titles.contains(&"Consider Tax-Advantaged Business Structures"));
    }

    #[test]
    fn generate_ny_529_uses_state_rate_with_two_places() {
        let report = generate(&wage_earner(dec!(80000), State::NewYork));

        let item = report
            .items
            .iter()
            .find(|item| item.title == "NY 529 Plan Deduction")
            .expect("NY filer");
        assert_eq!(item.estimated_annual_savings, Some(dec!(275)));
        assert_eq!(
            item.calculation.as_ref().map(ToString::to_string),
            Some("$5,000 max contribution × 5.50% NY marginal rate = $275 saved".to_string())
        );
    }

    #[test]
    fn generate_high_income_joint_ny_wage_earner() {
        let mut request = wage_earner(dec!(250000), State::NewYork);
        request.filing_status = FilingStatus::MarriedFilingJointly;

        let report = generate(&request);

        assert_eq!(
            report.titles(),
            vec![
                "Maximize HSA Contributions",
                "Consider Flexible Spending Account (FSA)",
                "Maximize 401(k) Contributions",
                "Backdoor Roth IRA Strategy",
                "Charitable Giving Strategies",
                "Donor-Advised Fund (DAF)",
                "NY 529 Plan Deduction",
                "Tax-Loss Harvesting",
                "Income & Deduction Timing",
                "Adjust Withholding or Pay Quarterly",
                "Consider Tax-Advantaged Business Structures",
            ]
        );
        // combined 30% (24% federal + 6% NY): 8550 HSA + 2000 FSA + 23500 401(k)
        assert_eq!(report.total_potential_savings, dec!(10215));
    }

    #[test]
    fn generate_ny_529_doubles_basis_for_joint_filers() {
        let calculation = |status: FilingStatus| {
            let mut request = wage_earner(dec!(250000), State::NewYork);
            request.filing_status = status;
            generate(&request)
                .items
                .into_iter()
                .find(|item| item.title == "NY 529 Plan Deduction")
                .and_then(|item| item.calculation)
                .map(|calculation| calculation.to_string())
        };

        assert_eq!(
            calculation(FilingStatus::MarriedFilingJointly),
            Some("$10,000 max contribution × 6.00% NY marginal rate = $600 saved".to_string())
        );
        // separate filers use the married table but the single-filer cap
        assert_eq!(
            calculation(FilingStatus::MarriedFilingSeparately),
            Some("$5,000 max contribution × 6.00% NY marginal rate = $300 saved".to_string())
        );
    }

    #[test]
    fn generate_is_deterministic() {
        let request = wage_earner(dec!(120000), State::NewYork);

        assert_eq!(generate(&request), generate(&request));
    }

    // =========================================================================
    // rule predicate tests
    // =========================================================================

    #[test]
    fn rule_ids_are_in_declared_order() {
        let ids: Vec<_> = GuidanceEngine::new().rules().iter().map(|r| r.id).collect();

        assert_eq!(
            ids,
            vec![
                "sep_ira",
                "solo_401k",
                "se_health_insurance",
                "quarterly_estimates",
                "qbi",
                "business_expenses",
                "hsa",
                "fsa",
                "max_401k",
                "maxed_401k",
                "traditional_ira",
                "roth",
                "backdoor_roth",
                "homeowner_itemize",
                "review_itemized",
                "charitable_bunching",
                "donor_advised_fund",
                "nj_property_tax",
                "ny_529",
                "tax_loss_harvesting",
                "timing",
                "underwithholding",
                "business_structure",
                "municipal_bonds",
            ]
        );
    }

    #[test]
    fn sep_ira_needs_contribution_above_minimum() {
        let mut context = base_context();
        context.net_self_employment_income = dec!(20000);

        let ids = fired(&context);

        // 20000 × 25% = 5000, not above the minimum
        assert!(!ids.contains(&"sep_ira"));
        assert!(ids.contains(&"se_health_insurance"));
        assert!(!ids.contains(&"solo_401k"));
    }

    #[test]
    fn qbi_stops_at_agi_limit() {
        let mut context = base_context();
        context.net_self_employment_income = dec!(50000);
        context.agi = dec!(197300);

        assert!(!fired(&context).contains(&"qbi"));
    }

    #[test]
    fn hsa_uses_family_limit_for_joint_filers() {
        let mut context = base_context();
        context.filing_status = FilingStatus::MarriedFilingJointly;
        context.current.hsa = dec!(5000);

        let ids = fired(&context);

        assert!(ids.contains(&"hsa"));
    }

    #[test]
    fn hsa_skipped_at_self_only_limit() {
        let mut context = base_context();
        context.current.hsa = dec!(4300);

        assert!(!fired(&context).contains(&"hsa"));
    }

    #[test]
    fn backdoor_roth_starts_above_income_threshold() {
        let mut context = base_context();
        context.total_income = dec!(165000);
        assert!(!fired(&context).contains(&"backdoor_roth"));

        context.total_income = dec!(165000.01);
        assert!(fired(&context).contains(&"backdoor_roth"));
    }

    #[test]
    fn charitable_rules_start_above_high_income_threshold() {
        let mut context = base_context();
        context.total_income = dec!(100000);

        let ids = fired(&context);
        assert!(!ids.contains(&"charitable_bunching"));
        assert!(!ids.contains(&"donor_advised_fund"));

        context.total_income = dec!(100000.01);

        let ids = fired(&context);
        assert!(ids.contains(&"charitable_bunching"));
        assert!(ids.contains(&"donor_advised_fund"));
    }

    #[test]
    fn fsa_requires_income_above_threshold() {
        let mut context = base_context();
        context.total_income = dec!(50000);

        assert!(!fired(&context).contains(&"fsa"));
    }

    #[test]
    fn traditional_ira_joint_tier_applies_to_joint_filers_only() {
        let mut context = base_context();
        context.total_income = dec!(200000);
        context.filing_status = FilingStatus::MarriedFilingSeparately;
        assert!(!fired(&context).contains(&"traditional_ira"));

        context.filing_status = FilingStatus::MarriedFilingJointly;
        assert!(fired(&context).contains(&"traditional_ira"));
    }

    #[test]
    fn itemizing_rules_skip_when_itemized_requested() {
        let mut context = base_context();
        context.total_income = dec!(400000);
        context.requested_deduction = DeductionType::Itemized;

        let ids = fired(&context);

        assert!(!ids.contains(&"homeowner_itemize"));
        assert!(!ids.contains(&"review_itemized"));
    }

    #[test]
    fn review_itemized_fires_for_high_income_standard_filer() {
        let mut context = base_context();
        context.total_income = dec!(150000);

        // 7500 + 4500 + 3000 = 15000 > 12000
        assert!(fired(&context).contains(&"review_itemized"));
    }

    #[test]
    fn underwithholding_excludes_small_shortfalls() {
        let mut context = base_context();
        context.federal_tax = dec!(5000);
        context.federal_withheld = dec!(4000);

        assert!(!fired(&context).contains(&"underwithholding"));
    }

    #[test]
    fn municipal_bonds_needs_combined_rate_above_threshold() {
        let mut context = base_context();
        context.combined_marginal_rate = dec!(0.35);
        assert!(!fired(&context).contains(&"municipal_bonds"));

        context.combined_marginal_rate = dec!(0.3501);
        assert!(fired(&context).contains(&"municipal_bonds"));
    }

    #[test]
    fn timing_always_applies() {
        let context = base_context();

        assert!(fired(&context).contains(&"timing"));
    }
}
