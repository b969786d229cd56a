//! Itemized deduction totals and the standard-versus-itemized choice.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{DeductionType, ItemizedProfile};

/// Cap on state and local taxes (property, income, vehicle fees).
pub const SALT_CAP: Decimal = dec!(10000);
/// Medical expenses are deductible only above this share of AGI.
pub const MEDICAL_AGI_FLOOR: Decimal = dec!(0.075);
/// Cash and non-cash gifts are limited to this share of AGI.
pub const CHARITABLE_CASH_AGI_LIMIT: Decimal = dec!(0.60);
/// Appreciated stock gifts are limited to this share of AGI.
pub const CHARITABLE_STOCK_AGI_LIMIT: Decimal = dec!(0.30);

/// Schedule A components after caps and floors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemizedBreakdown {
    /// State and local taxes before the cap.
    pub salt_uncapped: Decimal,
    pub salt: Decimal,
    pub mortgage: Decimal,
    pub charitable: Decimal,
    /// Medical expenses as entered.
    pub medical_raw: Decimal,
    /// Medical expenses above the AGI floor.
    pub medical: Decimal,
    pub casualty: Decimal,
    pub gambling: Decimal,
    pub investment_interest: Decimal,
    pub home_office: Decimal,
    pub total: Decimal,
}

/// Applies the caps and floors to `profile` using `agi` for the
/// AGI-relative limits.
///
/// Charitable limits are applied to each category on its own rather than as
/// a combined ceiling, and mortgage interest is not limited by loan size.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::compute_itemized;
/// use tax_core::ItemizedProfile;
///
/// let profile = ItemizedProfile {
///     property_taxes: dec!(9000),
///     state_income_tax_paid: dec!(6000),
///     mortgage_interest: dec!(12000),
///     ..ItemizedProfile::default()
/// };
///
/// let itemized = compute_itemized(dec!(150000), &profile);
///
/// assert_eq!(itemized.salt, dec!(10000));
/// assert_eq!(itemized.total, dec!(22000));
/// ```
pub fn compute_itemized(
    agi: Decimal,
    profile: &ItemizedProfile,
) -> ItemizedBreakdown {
    // AGI-based caps and floors never go below zero.
    let agi_base = agi.max(Decimal::ZERO);

    let salt_uncapped = profile.property_taxes
        + profile.state_income_tax_paid
        + profile.local_income_tax_paid
        + profile.vehicle_registration_fees;
    let salt = salt_uncapped.min(SALT_CAP);
    if salt_uncapped > SALT_CAP {
        debug!(salt_uncapped = %salt_uncapped, "State and local taxes limited to cap");
    }

    let mortgage = profile.mortgage_interest
        + profile.mortgage_interest_second_home
        + profile.mortgage_points
        + profile.pmi_premiums;

    let charitable = (profile.charitable_cash + profile.charitable_non_cash)
        .min(agi_base * CHARITABLE_CASH_AGI_LIMIT)
        + profile
            .charitable_stock
            .min(agi_base * CHARITABLE_STOCK_AGI_LIMIT);

    let medical_raw = profile.medical_expenses;
    let medical = (medical_raw - agi_base * MEDICAL_AGI_FLOOR).max(Decimal::ZERO);

    let casualty = profile.casualty_losses;
    let gambling = profile.gambling_losses;
    let investment_interest = profile.investment_interest;
    let home_office = profile.home_office_expenses;

    let total = salt
        + mortgage
        + charitable
        + medical
        + casualty
        + gambling
        + investment_interest
        + home_office;

    ItemizedBreakdown {
        salt_uncapped,
        salt,
        mortgage,
        charitable,
        medical_raw,
        medical,
        casualty,
        gambling,
        investment_interest,
        home_office,
        total,
    }
}

/// The deduction actually taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDeduction {
    pub amount: Decimal,
    pub used: DeductionType,
}

/// Picks the deduction amount for the requested type.
///
/// Itemizing below the standard deduction falls back to the standard amount,
/// reported as [`DeductionType::Standard`].
pub fn resolve_deduction(
    requested: DeductionType,
    standard: Decimal,
    itemized_total: Decimal,
) -> ResolvedDeduction {
    match requested {
        DeductionType::Standard => ResolvedDeduction {
            amount: standard,
            used: DeductionType::Standard,
        },
        DeductionType::Itemized if standard > itemized_total => {
            warn!(
                itemized = %itemized_total,
                standard = %standard,
                "Itemized deductions below standard deduction; using standard"
            );
            ResolvedDeduction {
                amount: standard,
                used: DeductionType::Standard,
            }
        }
        DeductionType::Itemized => ResolvedDeduction {
            amount: itemized_total,
            used: DeductionType::Itemized,
        },
    }
}

/// Which deduction comes out ahead, and by how much.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "difference", rename_all = "snake_case")]
pub enum DeductionComparison {
    NoItemizedEntered,
    ItemizeSaves(Decimal),
    StandardBetter(Decimal),
}

impl DeductionComparison {
    /// Short advice line for the comparison panel.
    pub fn message(&self) -> String {
        use crate::calculations::common::format_currency;

        match self {
            Self::NoItemizedEntered => "Enter itemized deductions to compare".to_string(),
            Self::ItemizeSaves(diff) => {
                format!("Itemize and save {} more in deductions", format_currency(*diff))
            }
            Self::StandardBetter(diff) => {
                format!("Standard deduction is better by {}", format_currency(*diff))
            }
        }
    }
}

/// Compares the standard deduction against an itemized total.
///
/// A tie favours the standard deduction with a zero difference.
pub fn compare_deductions(
    standard: Decimal,
    itemized_total: Decimal,
) -> DeductionComparison {
    if itemized_total <= Decimal::ZERO {
        DeductionComparison::NoItemizedEntered
    } else if itemized_total > standard {
        DeductionComparison::ItemizeSaves(itemized_total - standard)
    } else {
        DeductionComparison::StandardBetter(standard - itemized_total)
    }
}
