//! Printable summary of a computed result.
//!
//! [`summary_lines`] flattens a [`TaxComputationResult`] into labelled lines
//! with Form 1040 line references where one exists. Renderers only format
//! these lines; they never reach into the result themselves.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::calculations::common::format_currency;
use crate::{DeductionType, TaxComputationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarySection {
    Federal,
    State,
    City,
    Total,
}

impl SummarySection {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Federal => "Federal",
            Self::State => "State",
            Self::City => "New York City",
            Self::Total => "Summary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LineValue {
    Amount(Decimal),
    /// Subtracted from the line above; shown with a leading minus.
    Reduction(Decimal),
    /// Positive is a refund.
    Balance(Decimal),
    /// Percentage, already scaled to 0..100.
    Percent(Decimal),
}

impl fmt::Display for LineValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Amount(amount) | Self::Balance(amount) => f.write_str(&format_currency(*amount)),
            Self::Reduction(amount) => write!(f, "-{}", format_currency(*amount)),
            Self::Percent(percent) => {
                let shown = percent.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
                write!(f, "{shown:.1}%")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub section: SummarySection,
    /// Form line reference, e.g. "Line 11".
    pub reference: Option<&'static str>,
    pub label: String,
    pub value: LineValue,
}

impl SummaryLine {
    fn new(
        section: SummarySection,
        reference: Option<&'static str>,
        label: impl Into<String>,
        value: LineValue,
    ) -> Self {
        Self {
            section,
            reference,
            label: label.into(),
            value,
        }
    }
}

/// Wording for the overall balance.
pub fn balance_description(total_balance: Decimal) -> &'static str {
    if total_balance > Decimal::ZERO {
        "Estimated refund"
    } else if total_balance < Decimal::ZERO {
        "Estimated amount owed"
    } else {
        "Right on target"
    }
}

/// Lines of the summary document, in print order.
///
/// Self-employment lines appear only when SE tax is owed, and the city
/// section only for NYC residents.
pub fn summary_lines(result: &TaxComputationResult) -> Vec<SummaryLine> {
    use LineValue::{Amount, Balance, Percent, Reduction};
    use SummarySection::{City, Federal, State, Total};

    let has_se_tax = result.self_employment.self_employment_tax > Decimal::ZERO;
    let mut lines = vec![
        SummaryLine::new(Federal, Some("Line 9"), "Total income", Amount(result.total_income)),
        SummaryLine::new(
            Federal,
            Some("Line 10"),
            "Adjustments to income",
            Reduction(result.adjustments()),
        ),
    ];
    if has_se_tax {
        lines.push(SummaryLine::new(
            Federal,
            Some("Schedule 1, line 15"),
            "Deductible part of self-employment tax",
            Reduction(result.self_employment.se_tax_deduction),
        ));
    }
    let deduction_label = match result.deduction_used {
        DeductionType::Standard => "Standard deduction",
        DeductionType::Itemized => "Itemized deductions",
    };
    lines.extend([
        SummaryLine::new(Federal, Some("Line 11"), "Adjusted gross income", Amount(result.agi)),
        SummaryLine::new(
            Federal,
            Some("Line 12"),
            deduction_label,
            Reduction(result.deduction_amount),
        ),
        SummaryLine::new(
            Federal,
            Some("Line 15"),
            "Taxable income",
            Amount(result.federal.taxable_income),
        ),
        SummaryLine::new(Federal, Some("Line 16"), "Tax", Amount(result.federal.tax)),
    ]);
    if has_se_tax {
        lines.push(SummaryLine::new(
            Federal,
            Some("Schedule 2, line 4"),
            "Self-employment tax",
            Amount(result.self_employment.self_employment_tax),
        ));
    }
    lines.extend([
        SummaryLine::new(
            Federal,
            Some("Line 24"),
            "Total tax",
            Amount(result.total_federal_tax()),
        ),
        SummaryLine::new(
            Federal,
            Some("Line 25d"),
            "Federal income tax withheld",
            Amount(result.federal.withheld),
        ),
        SummaryLine::new(Federal, None, "Federal balance", Balance(result.federal.balance)),
        SummaryLine::new(
            State,
            None,
            format!("{} taxable income", result.state),
            Amount(result.state_tax.taxable_income),
        ),
        SummaryLine::new(
            State,
            None,
            format!("{} income tax", result.state),
            Amount(result.state_tax.tax),
        ),
        SummaryLine::new(
            State,
            None,
            format!("{} tax withheld", result.state),
            Amount(result.state_tax.withheld),
        ),
        SummaryLine::new(
            State,
            None,
            format!("{} balance", result.state),
            Balance(result.state_tax.balance),
        ),
    ]);
    if let Some(city) = &result.city {
        lines.extend([
            SummaryLine::new(City, None, "NYC resident tax", Amount(city.tax)),
            SummaryLine::new(City, None, "NYC tax withheld", Amount(city.withheld)),
            SummaryLine::new(City, None, "NYC balance", Balance(city.balance)),
        ]);
    }
    lines.extend([
        SummaryLine::new(
            Total,
            None,
            balance_description(result.total_balance),
            Balance(result.total_balance),
        ),
        SummaryLine::new(Total, None, "Effective tax rate", Percent(result.effective_rate)),
    ]);
    lines
}
