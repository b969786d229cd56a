//! 2025 tables built in code for unit tests.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    BracketSchedule, ContributionLimits, PerFilingStatus, PerStateKey, SelfEmploymentConstants,
    StateBrackets, TaxBracket, TaxYearConfig,
};

/// Builds a schedule from `(min, rate)` pairs; each bracket ends where the
/// next begins.
pub fn schedule(
    name: &str,
    steps: &[(Decimal, Decimal)],
) -> BracketSchedule {
    let brackets = steps
        .iter()
        .enumerate()
        .map(|(i, &(min, rate))| TaxBracket {
            min_income: min,
            max_income: steps.get(i + 1).map(|&(next, _)| next),
            tax_rate: rate,
        })
        .collect();
    BracketSchedule::new(name, brackets).expect("test schedule must be valid")
}

pub fn federal_single_2025() -> BracketSchedule {
    schedule(
        "X",
        &[
            (dec!(0), dec!(0.10)),
            (dec!(11925), dec!(0.12)),
            (dec!(48475), dec!(0.22)),
            (dec!(103350), dec!(0.24)),
            (dec!(197300), dec!(0.32)),
            (dec!(250525), dec!(0.35)),
            (dec!(626350), dec!(0.37)),
        ],
    )
}

pub fn federal_married_2025() -> BracketSchedule {
    schedule(
        "Y-1",
        &[
            (dec!(0), dec!(0.10)),
            (dec!(23850), dec!(0.12)),
            (dec!(96950), dec!(0.22)),
            (dec!(206700), dec!(0.24)),
            (dec!(394600), dec!(0.32)),
            (dec!(501050), dec!(0.35)),
            (dec!(751600), dec!(0.37)),
        ],
    )
}

pub fn federal_married_separate_2025() -> BracketSchedule {
    schedule(
        "Y-2",
        &[
            (dec!(0), dec!(0.10)),
            (dec!(11925), dec!(0.12)),
            (dec!(48475), dec!(0.22)),
            (dec!(103350), dec!(0.24)),
            (dec!(197300), dec!(0.32)),
            (dec!(250525), dec!(0.35)),
            (dec!(375800), dec!(0.37)),
        ],
    )
}

pub fn federal_head_of_household_2025() -> BracketSchedule {
    schedule(
        "Z",
        &[
            (dec!(0), dec!(0.10)),
            (dec!(17000), dec!(0.12)),
            (dec!(64850), dec!(0.22)),
            (dec!(103350), dec!(0.24)),
            (dec!(197300), dec!(0.32)),
            (dec!(250500), dec!(0.35)),
            (dec!(626350), dec!(0.37)),
        ],
    )
}

pub fn ny_single() -> BracketSchedule {
    schedule(
        "NY/single",
        &[
            (dec!(0), dec!(0.04)),
            (dec!(8500), dec!(0.045)),
            (dec!(11700), dec!(0.0525)),
            (dec!(13900), dec!(0.055)),
            (dec!(80650), dec!(0.06)),
            (dec!(215400), dec!(0.0685)),
            (dec!(1077550), dec!(0.0965)),
            (dec!(5000000), dec!(0.103)),
            (dec!(25000000), dec!(0.109)),
        ],
    )
}

pub fn ny_married() -> BracketSchedule {
    schedule(
        "NY/married",
        &[
            (dec!(0), dec!(0.04)),
            (dec!(17150), dec!(0.045)),
            (dec!(23600), dec!(0.0525)),
            (dec!(27900), dec!(0.055)),
            (dec!(161550), dec!(0.06)),
            (dec!(323200), dec!(0.0685)),
            (dec!(2155350), dec!(0.0965)),
            (dec!(5000000), dec!(0.103)),
            (dec!(25000000), dec!(0.109)),
        ],
    )
}

pub fn nj_single() -> BracketSchedule {
    schedule(
        "NJ/single",
        &[
            (dec!(0), dec!(0.014)),
            (dec!(20000), dec!(0.0175)),
            (dec!(35000), dec!(0.035)),
            (dec!(40000), dec!(0.05525)),
            (dec!(75000), dec!(0.0637)),
            (dec!(500000), dec!(0.0897)),
            (dec!(1000000), dec!(0.1075)),
        ],
    )
}

pub fn nj_married() -> BracketSchedule {
    schedule(
        "NJ/married",
        &[
            (dec!(0), dec!(0.014)),
            (dec!(20000), dec!(0.0175)),
            (dec!(50000), dec!(0.0245)),
            (dec!(70000), dec!(0.035)),
            (dec!(80000), dec!(0.05525)),
            (dec!(150000), dec!(0.0637)),
            (dec!(500000), dec!(0.0897)),
            (dec!(1000000), dec!(0.1075)),
        ],
    )
}

pub fn nyc_single() -> BracketSchedule {
    schedule(
        "NYC/single",
        &[
            (dec!(0), dec!(0.03078)),
            (dec!(12000), dec!(0.03762)),
            (dec!(25000), dec!(0.03819)),
            (dec!(50000), dec!(0.03876)),
        ],
    )
}

pub fn nyc_married() -> BracketSchedule {
    schedule(
        "NYC/married",
        &[
            (dec!(0), dec!(0.03078)),
            (dec!(21600), dec!(0.03762)),
            (dec!(45000), dec!(0.03819)),
            (dec!(90000), dec!(0.03876)),
        ],
    )
}

pub fn se_constants_2025() -> SelfEmploymentConstants {
    SelfEmploymentConstants {
        social_security_rate: dec!(0.124),
        medicare_rate: dec!(0.029),
        additional_medicare_rate: dec!(0.009),
        social_security_wage_base: dec!(176100),
        additional_medicare_threshold_single: dec!(200000),
        additional_medicare_threshold_married: dec!(250000),
        net_earnings_multiplier: dec!(0.9235),
        deduction_factor: dec!(0.50),
    }
}

pub fn config_2025() -> TaxYearConfig {
    TaxYearConfig {
        tax_year: 2025,
        federal_brackets: PerFilingStatus {
            single: federal_single_2025(),
            married_joint: federal_married_2025(),
            married_separate: federal_married_separate_2025(),
            head_of_household: federal_head_of_household_2025(),
        },
        standard_deduction: PerFilingStatus {
            single: dec!(15000),
            married_joint: dec!(30000),
            married_separate: dec!(15000),
            head_of_household: dec!(22500),
        },
        ny_standard_deduction: PerFilingStatus {
            single: dec!(8000),
            married_joint: dec!(16050),
            married_separate: dec!(8000),
            head_of_household: dec!(11200),
        },
        self_employment: se_constants_2025(),
        contribution_limits: ContributionLimits {
            traditional_401k: dec!(23500),
            traditional_401k_age_50: dec!(31000),
            traditional_401k_age_60_to_63: dec!(34750),
            ira: dec!(7000),
            ira_age_50: dec!(8000),
            hsa_self_only: dec!(4300),
            hsa_family: dec!(8550),
            fsa_health: dec!(3300),
            fsa_dependent_care: dec!(5000),
            sep_ira: dec!(70000),
            solo_401k: dec!(70000),
        },
        state_brackets: StateBrackets {
            new_york: PerStateKey {
                single: ny_single(),
                married: ny_married(),
            },
            new_jersey: PerStateKey {
                single: nj_single(),
                married: nj_married(),
            },
            new_york_city: PerStateKey {
                single: nyc_single(),
                married: nyc_married(),
            },
        },
    }
}
