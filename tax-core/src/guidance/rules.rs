//! The guidance rules, in evaluation order.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{GuidanceContext, Rule};
use crate::calculations::common::format_currency;
use crate::{DeductionType, GuidanceCategory, GuidanceItem, Priority, SavingsCalculation, State};

/// Share of net SE income that can go into a SEP-IRA.
const SEP_CONTRIBUTION_RATE: Decimal = dec!(0.25);
const SEP_MIN_WORTHWHILE: Decimal = dec!(5000);
const SOLO_401K_INCOME_THRESHOLD: Decimal = dec!(50000);
const QUARTERLY_SE_TAX_THRESHOLD: Decimal = dec!(1000);
/// QBI phase-in starts here.
const QBI_AGI_LIMIT: Decimal = dec!(197300);
const QBI_RATE: Decimal = dec!(0.20);
const FSA_INCOME_THRESHOLD: Decimal = dec!(50000);
const FSA_ESTIMATE_CAP: Decimal = dec!(2000);
const IRA_INCOME_LIMIT: Decimal = dec!(150000);
const IRA_INCOME_LIMIT_JOINT: Decimal = dec!(230000);
const ROTH_MAX_MARGINAL_RATE: Decimal = dec!(0.22);
const BACKDOOR_ROTH_INCOME: Decimal = dec!(165000);
const HOMEOWNER_INCOME_THRESHOLD: Decimal = dec!(75000);
const HIGH_INCOME_THRESHOLD: Decimal = dec!(100000);
const NY_529_LIMIT: Decimal = dec!(5000);
const NY_529_LIMIT_JOINT: Decimal = dec!(10000);
const LOSS_HARVEST_OFFSET: Decimal = dec!(3000);
const LOSS_HARVEST_INCOME_THRESHOLD: Decimal = dec!(75000);
const UNDERWITHHOLDING_MARGIN: Decimal = dec!(1000);
const BUSINESS_STRUCTURE_INCOME: Decimal = dec!(150000);
const MUNICIPAL_BOND_RATE: Decimal = dec!(0.35);

pub static RULES: &[Rule] = &[
    // self-employment
    Rule {
        id: "sep_ira",
        category: GuidanceCategory::Retirement,
        priority: Priority::High,
        counts_toward_total: true,
        applies: |ctx| ctx.has_self_employment() && sep_contribution(ctx) > SEP_MIN_WORTHWHILE,
        build: sep_ira,
    },
    Rule {
        id: "solo_401k",
        category: GuidanceCategory::Retirement,
        priority: Priority::Medium,
        counts_toward_total: false,
        applies: |ctx| {
            ctx.has_self_employment() && ctx.net_self_employment_income > SOLO_401K_INCOME_THRESHOLD
        },
        build: solo_401k,
    },
    Rule {
        id: "se_health_insurance",
        category: GuidanceCategory::Deductions,
        priority: Priority::High,
        counts_toward_total: false,
        applies: GuidanceContext::has_self_employment,
        build: se_health_insurance,
    },
    Rule {
        id: "quarterly_estimates",
        category: GuidanceCategory::Planning,
        priority: Priority::High,
        counts_toward_total: false,
        applies: |ctx| {
            ctx.has_self_employment() && ctx.self_employment_tax > QUARTERLY_SE_TAX_THRESHOLD
        },
        build: quarterly_estimates,
    },
    Rule {
        id: "qbi",
        category: GuidanceCategory::Deductions,
        priority: Priority::High,
        counts_toward_total: true,
        applies: |ctx| ctx.has_self_employment() && ctx.agi < QBI_AGI_LIMIT,
        build: qbi,
    },
    Rule {
        id: "business_expenses",
        category: GuidanceCategory::Deductions,
        priority: Priority::Medium,
        counts_toward_total: false,
        applies: GuidanceContext::has_self_employment,
        build: business_expenses,
    },
    // pre-tax accounts
    Rule {
        id: "hsa",
        category: GuidanceCategory::Immediate,
        priority: Priority::High,
        counts_toward_total: true,
        applies: |ctx| ctx.current.hsa < hsa_limit(ctx),
        build: hsa,
    },
    Rule {
        id: "fsa",
        category: GuidanceCategory::Immediate,
        priority: Priority::Medium,
        counts_toward_total: true,
        applies: |ctx| {
            ctx.current.fsa < ctx.limits.fsa_health && ctx.total_income > FSA_INCOME_THRESHOLD
        },
        build: fsa,
    },
    // retirement
    Rule {
        id: "max_401k",
        category: GuidanceCategory::Retirement,
        priority: Priority::High,
        counts_toward_total: true,
        applies: |ctx| {
            ctx.wages > Decimal::ZERO && ctx.current.retirement_401k < ctx.limits.traditional_401k
        },
        build: max_401k,
    },
    Rule {
        id: "maxed_401k",
        category: GuidanceCategory::Retirement,
        priority: Priority::Low,
        counts_toward_total: false,
        applies: |ctx| {
            ctx.wages > Decimal::ZERO && ctx.current.retirement_401k >= ctx.limits.traditional_401k
        },
        build: maxed_401k,
    },
    Rule {
        id: "traditional_ira",
        category: GuidanceCategory::Retirement,
        priority: Priority::High,
        counts_toward_total: true,
        applies: |ctx| {
            ctx.current.traditional_ira < ctx.limits.ira
                && (ctx.total_income < IRA_INCOME_LIMIT
                    || (ctx.filing_status.is_joint() && ctx.total_income < IRA_INCOME_LIMIT_JOINT))
        },
        build: traditional_ira,
    },
    Rule {
        id: "roth",
        category: GuidanceCategory::Retirement,
        priority: Priority::Medium,
        counts_toward_total: false,
        applies: |ctx| ctx.federal_marginal_rate <= ROTH_MAX_MARGINAL_RATE,
        build: roth,
    },
    Rule {
        id: "backdoor_roth",
        category: GuidanceCategory::Retirement,
        priority: Priority::Low,
        counts_toward_total: false,
        applies: |ctx| ctx.total_income > BACKDOOR_ROTH_INCOME,
        build: backdoor_roth,
    },
    // deductions
    Rule {
        id: "homeowner_itemize",
        category: GuidanceCategory::Deductions,
        priority: Priority::High,
        counts_toward_total: false,
        applies: |ctx| {
            ctx.total_income > HOMEOWNER_INCOME_THRESHOLD
                && ctx.requested_deduction == DeductionType::Standard
                && homeowner_estimate(ctx.total_income) > ctx.standard_deduction * dec!(0.7)
        },
        build: homeowner_itemize,
    },
    Rule {
        id: "review_itemized",
        category: GuidanceCategory::Deductions,
        priority: Priority::Medium,
        counts_toward_total: false,
        applies: |ctx| {
            ctx.requested_deduction == DeductionType::Standard
                && potential_itemized(ctx.total_income) > ctx.standard_deduction * dec!(0.8)
        },
        build: review_itemized,
    },
    Rule {
        id: "charitable_bunching",
        category: GuidanceCategory::Deductions,
        priority: Priority::Medium,
        counts_toward_total: false,
        applies: |ctx| ctx.total_income > HIGH_INCOME_THRESHOLD,
        build: charitable_bunching,
    },
    Rule {
        id: "donor_advised_fund",
        category: GuidanceCategory::Deductions,
        priority: Priority::Low,
        counts_toward_total: false,
        applies: |ctx| ctx.total_income > HIGH_INCOME_THRESHOLD,
        build: donor_advised_fund,
    },
    Rule {
        id: "nj_property_tax",
        category: GuidanceCategory::Deductions,
        priority: Priority::Medium,
        counts_toward_total: false,
        applies: |ctx| ctx.state == State::NewJersey,
        build: nj_property_tax,
    },
    Rule {
        id: "ny_529",
        category: GuidanceCategory::Deductions,
        priority: Priority::Medium,
        counts_toward_total: false,
        applies: |ctx| ctx.state == State::NewYork,
        build: ny_529,
    },
    // planning
    Rule {
        id: "tax_loss_harvesting",
        category: GuidanceCategory::Planning,
        priority: Priority::Medium,
        counts_toward_total: false,
        applies: |ctx| ctx.total_income > LOSS_HARVEST_INCOME_THRESHOLD,
        build: tax_loss_harvesting,
    },
    Rule {
        id: "timing",
        category: GuidanceCategory::Planning,
        priority: Priority::Low,
        counts_toward_total: false,
        applies: |_| true,
        build: timing,
    },
    Rule {
        id: "underwithholding",
        category: GuidanceCategory::Planning,
        priority: Priority::High,
        counts_toward_total: false,
        applies: |ctx| ctx.federal_tax > ctx.federal_withheld + UNDERWITHHOLDING_MARGIN,
        build: underwithholding,
    },
    Rule {
        id: "business_structure",
        category: GuidanceCategory::Planning,
        priority: Priority::Medium,
        counts_toward_total: false,
        applies: |ctx| {
            ctx.total_income > BUSINESS_STRUCTURE_INCOME
                && ctx.net_self_employment_income.is_zero()
        },
        build: business_structure,
    },
    Rule {
        id: "municipal_bonds",
        category: GuidanceCategory::Planning,
        priority: Priority::Low,
        counts_toward_total: false,
        applies: |ctx| ctx.combined_marginal_rate > MUNICIPAL_BOND_RATE,
        build: municipal_bonds,
    },
];

/// Item without a savings estimate. Category and priority are overwritten
/// by the engine from the rule.
fn advice(
    title: &str,
    description: impl Into<String>,
    limit_text: impl Into<String>,
) -> GuidanceItem {
    GuidanceItem {
        category: GuidanceCategory::Planning,
        title: title.to_string(),
        description: description.into(),
        estimated_annual_savings: None,
        limit_text: limit_text.into(),
        calculation: None,
        priority: Priority::Low,
    }
}

fn with_savings(
    mut item: GuidanceItem,
    calculation: SavingsCalculation,
) -> GuidanceItem {
    item.estimated_annual_savings = Some(calculation.savings);
    item.calculation = Some(calculation);
    item
}

fn combined(
    ctx: &GuidanceContext,
    basis: Decimal,
    basis_label: &str,
) -> SavingsCalculation {
    SavingsCalculation::new(
        basis,
        basis_label,
        ctx.combined_marginal_rate,
        "combined marginal rate",
        1,
    )
}

fn sep_contribution(ctx: &GuidanceContext) -> Decimal {
    (ctx.net_self_employment_income * SEP_CONTRIBUTION_RATE).min(ctx.limits.sep_ira)
}

fn hsa_limit(ctx: &GuidanceContext) -> Decimal {
    ctx.limits.hsa_limit(ctx.filing_status)
}

fn homeowner_estimate(total_income: Decimal) -> Decimal {
    let mortgage = total_income * dec!(0.03);
    let property_tax = dec!(8000).min(dec!(10000));
    mortgage + property_tax
}

/// Rough itemized total for someone who has not entered any: SALT, a
/// mortgage for higher earners, and modest giving.
fn potential_itemized(total_income: Decimal) -> Decimal {
    let salt = (total_income * dec!(0.05)).min(dec!(10000));
    let mortgage = if total_income > HIGH_INCOME_THRESHOLD {
        total_income * dec!(0.03)
    } else {
        Decimal::ZERO
    };
    let charitable = total_income * dec!(0.02);
    salt + mortgage + charitable
}

fn sep_ira(ctx: &GuidanceContext) -> GuidanceItem {
    let contribution = sep_contribution(ctx);
    with_savings(
        advice(
            "SEP-IRA for Self-Employment Income",
            "As a self-employed individual, you can contribute up to 25% of your net \
             self-employment income to a SEP-IRA.",
            format!(
                "Your max SEP contribution: {} (25% of {})",
                format_currency(contribution),
                format_currency(ctx.net_self_employment_income)
            ),
        ),
        combined(ctx, contribution, "contribution"),
    )
}

fn solo_401k(ctx: &GuidanceContext) -> GuidanceItem {
    advice(
        "Consider a Solo 401(k)",
        format!(
            "A Solo 401(k) allows both employee ({}) and employer (25% of net SE income) \
             contributions, potentially higher than SEP-IRA limits.",
            format_currency(ctx.limits.traditional_401k)
        ),
        format!(
            "{} total limit: {} + catch-up if applicable",
            ctx.tax_year,
            format_currency(ctx.limits.solo_401k)
        ),
    )
}

fn se_health_insurance(_: &GuidanceContext) -> GuidanceItem {
    advice(
        "Self-Employed Health Insurance Deduction",
        "Self-employed filers can deduct 100% of health insurance premiums for themselves, \
         a spouse and dependents as an above-the-line deduction.",
        "Cannot exceed net self-employment income",
    )
}

fn quarterly_estimates(ctx: &GuidanceContext) -> GuidanceItem {
    advice(
        "Quarterly Estimated Tax Payments Required",
        format!(
            "With {} in self-employment tax, you likely need to make quarterly estimated \
             payments to avoid underpayment penalties.",
            format_currency(ctx.self_employment_tax)
        ),
        "Pay at least 90% of current year or 100% of prior year tax",
    )
}

fn qbi(ctx: &GuidanceContext) -> GuidanceItem {
    let deduction = ctx.net_self_employment_income * QBI_RATE;
    with_savings(
        advice(
            "Qualified Business Income (QBI) Deduction",
            "You may qualify for a 20% deduction on qualified business income.",
            format!(
                "Potential deduction: {} (20% of {})",
                format_currency(deduction),
                format_currency(ctx.net_self_employment_income)
            ),
        ),
        SavingsCalculation::new(
            deduction,
            "QBI deduction",
            ctx.federal_marginal_rate,
            "federal marginal rate",
            0,
        ),
    )
}

fn business_expenses(_: &GuidanceContext) -> GuidanceItem {
    advice(
        "Maximize Business Expense Deductions",
        "Common deductible expenses: home office ($5/sq ft up to 300 sq ft), equipment, \
         software, travel, vehicle expenses, professional services.",
        "Must be ordinary and necessary business expenses",
    )
}

fn hsa(ctx: &GuidanceContext) -> GuidanceItem {
    let limit = hsa_limit(ctx);
    let room = limit - ctx.current.hsa;
    with_savings(
        advice(
            "Maximize HSA Contributions",
            format!(
                "You're contributing {} to your HSA. HSA contributions are triple \
                 tax-advantaged: tax-deductible, tax-free growth and tax-free withdrawals \
                 for medical expenses.",
                format_currency(ctx.current.hsa)
            ),
            format!(
                "{} limit: {} | Room to contribute: {}",
                ctx.tax_year,
                format_currency(limit),
                format_currency(room)
            ),
        ),
        SavingsCalculation::new(
            room,
            "additional contribution",
            ctx.combined_marginal_rate,
            "combined rate",
            1,
        ),
    )
}

fn fsa(ctx: &GuidanceContext) -> GuidanceItem {
    let room = ctx.limits.fsa_health - ctx.current.fsa;
    let estimate = room.min(FSA_ESTIMATE_CAP);
    let description = if ctx.current.fsa > Decimal::ZERO {
        format!(
            "You're contributing {} to an FSA. You can contribute up to {} for health expenses.",
            format_currency(ctx.current.fsa),
            format_currency(ctx.limits.fsa_health)
        )
    } else {
        "Use pre-tax dollars for predictable medical expenses or dependent care.".to_string()
    };
    with_savings(
        advice(
            "Consider Flexible Spending Account (FSA)",
            description,
            format!(
                "{} limits: {} (health) / {} (dependent care)",
                ctx.tax_year,
                format_currency(ctx.limits.fsa_health),
                format_currency(ctx.limits.fsa_dependent_care)
            ),
        ),
        combined(ctx, estimate, "estimated contribution"),
    )
}

fn max_401k(ctx: &GuidanceContext) -> GuidanceItem {
    let room = ctx.limits.traditional_401k - ctx.current.retirement_401k;
    let description = if ctx.current.retirement_401k > Decimal::ZERO {
        format!(
            "You're contributing {} to your 401(k). Consider increasing to the maximum limit.",
            format_currency(ctx.current.retirement_401k)
        )
    } else {
        "Contribute to your employer's 401(k) plan. Don't leave employer matching on the table."
            .to_string()
    };
    with_savings(
        advice(
            "Maximize 401(k) Contributions",
            description,
            format!(
                "{} limit: {} (under 50) / {} (50+) | Room: {}",
                ctx.tax_year,
                format_currency(ctx.limits.traditional_401k),
                format_currency(ctx.limits.traditional_401k_age_50),
                format_currency(room)
            ),
        ),
        combined(ctx, room, "additional contribution"),
    )
}

fn maxed_401k(ctx: &GuidanceContext) -> GuidanceItem {
    advice(
        "401(k) Maximized ✓",
        format!(
            "Great job! You're contributing {} to your 401(k).",
            format_currency(ctx.current.retirement_401k)
        ),
        format!(
            "Catch-up limits: {} (50+) / {} (60-63)",
            format_currency(ctx.limits.traditional_401k_age_50),
            format_currency(ctx.limits.traditional_401k_age_60_to_63)
        ),
    )
}

fn traditional_ira(ctx: &GuidanceContext) -> GuidanceItem {
    let room = ctx.limits.ira - ctx.current.traditional_ira;
    let description = if ctx.current.traditional_ira > Decimal::ZERO {
        format!(
            "You're contributing {} to a Traditional IRA. Room to add: {}.",
            format_currency(ctx.current.traditional_ira),
            format_currency(room)
        )
    } else {
        "Contribute to a Traditional IRA for an immediate tax deduction.".to_string()
    };
    with_savings(
        advice(
            "Traditional IRA Contribution",
            description,
            format!(
                "{} limit: {} (under 50) / {} (50+)",
                ctx.tax_year,
                format_currency(ctx.limits.ira),
                format_currency(ctx.limits.ira_age_50)
            ),
        ),
        combined(ctx, room, "contribution"),
    )
}

fn roth(_: &GuidanceContext) -> GuidanceItem {
    advice(
        "Consider Roth Contributions",
        "At your current tax bracket, Roth contributions may be beneficial. Pay tax now at a \
         lower rate for tax-free growth and withdrawals.",
        "Same limits as traditional accounts",
    )
}

fn backdoor_roth(_: &GuidanceContext) -> GuidanceItem {
    advice(
        "Backdoor Roth IRA Strategy",
        "If your income exceeds Roth IRA limits, consider the \"backdoor\" strategy: \
         contribute to a non-deductible Traditional IRA, then convert to Roth.",
        "No income limit for conversions",
    )
}

fn homeowner_itemize(ctx: &GuidanceContext) -> GuidanceItem {
    advice(
        "Homeowner Tax Benefits",
        "If you own a home, mortgage interest and property taxes may allow you to itemize. \
         Enter your homeowner expenses as itemized deductions to see if they beat the \
         standard deduction.",
        format!(
            "Your standard deduction: {}",
            format_currency(ctx.standard_deduction)
        ),
    )
}

fn review_itemized(ctx: &GuidanceContext) -> GuidanceItem {
    advice(
        "Review Itemized Deductions",
        "Track mortgage interest, state/local taxes (up to $10K), charitable donations, and \
         medical expenses to see if itemizing would save more.",
        format!(
            "Your standard deduction: {}",
            format_currency(ctx.standard_deduction)
        ),
    )
}

fn charitable_bunching(_: &GuidanceContext) -> GuidanceItem {
    advice(
        "Charitable Giving Strategies",
        "Consider bunching charitable donations in alternating years to exceed the standard \
         deduction, or donate appreciated stock.",
        "Deduction limited to 60% of AGI for cash donations",
    )
}

fn donor_advised_fund(_: &GuidanceContext) -> GuidanceItem {
    advice(
        "Donor-Advised Fund (DAF)",
        "Contribute to a DAF for an immediate tax deduction, then distribute to charities \
         over time.",
        "No minimum, immediate deduction in contribution year",
    )
}

fn nj_property_tax(_: &GuidanceContext) -> GuidanceItem {
    advice(
        "NJ Property Tax Deduction",
        "New Jersey allows a property tax deduction up to $15,000 on your state return, \
         separate from the federal SALT cap.",
        "Up to $15,000 for NJ state taxes",
    )
}

fn ny_529(ctx: &GuidanceContext) -> GuidanceItem {
    let limit = if ctx.filing_status.is_joint() {
        NY_529_LIMIT_JOINT
    } else {
        NY_529_LIMIT
    };
    with_savings(
        advice(
            "NY 529 Plan Deduction",
            "New York offers a state tax deduction for contributions to NY's 529 college \
             savings plan.",
            format!("Up to {} deduction", format_currency(limit)),
        ),
        SavingsCalculation::new(
            limit,
            "max contribution",
            ctx.state_marginal_rate,
            "NY marginal rate",
            2,
        ),
    )
}

fn tax_loss_harvesting(ctx: &GuidanceContext) -> GuidanceItem {
    with_savings(
        advice(
            "Tax-Loss Harvesting",
            "Sell investments at a loss to offset capital gains. Up to $3,000 of excess losses \
             can offset ordinary income.",
            "$3,000 annual limit against ordinary income",
        ),
        combined(ctx, LOSS_HARVEST_OFFSET, "max offset"),
    )
}

fn timing(_: &GuidanceContext) -> GuidanceItem {
    advice(
        "Income & Deduction Timing",
        "If you expect to be in a different tax bracket next year, consider accelerating or \
         deferring income and deductions.",
        "Strategy depends on year-over-year bracket changes",
    )
}

fn underwithholding(_: &GuidanceContext) -> GuidanceItem {
    advice(
        "Adjust Withholding or Pay Quarterly",
        "You may owe a significant amount. Consider adjusting your W-4 withholding or making \
         quarterly estimated payments.",
        "Avoid penalty by paying 90% of current year or 100% of prior year tax",
    )
}

fn business_structure(ctx: &GuidanceContext) -> GuidanceItem {
    advice(
        "Consider Tax-Advantaged Business Structures",
        "If you start a side business, structures like S-Corps or SEP-IRAs can provide \
         significant tax savings.",
        format!(
            "SEP-IRA: up to {} for {}",
            format_currency(ctx.limits.sep_ira),
            ctx.tax_year
        ),
    )
}

fn municipal_bonds(_: &GuidanceContext) -> GuidanceItem {
    advice(
        "Consider Municipal Bonds",
        "At your tax bracket, tax-free municipal bond interest may provide better after-tax \
         returns than taxable bonds.",
        "Compare tax-equivalent yields at your bracket",
    )
}
