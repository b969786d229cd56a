use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{format_currency, format_rate, round_whole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuidanceCategory {
    Immediate,
    Retirement,
    Deductions,
    Planning,
}

impl GuidanceCategory {
    /// Display order of the category tabs.
    pub const ALL: [GuidanceCategory; 4] = [
        Self::Immediate,
        Self::Retirement,
        Self::Deductions,
        Self::Planning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Retirement => "retirement",
            Self::Deductions => "deductions",
            Self::Planning => "planning",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Self::Immediate => "Immediate Actions",
            Self::Retirement => "Retirement Strategies",
            Self::Deductions => "Deduction Opportunities",
            Self::Planning => "Tax Planning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// How a savings estimate was derived: basis × rate, rounded to whole dollars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsCalculation {
    pub basis: Decimal,
    pub basis_label: String,
    pub rate: Decimal,
    pub rate_label: String,
    /// Decimal places shown for the rate percentage.
    pub rate_precision: u32,
    pub savings: Decimal,
}

impl SavingsCalculation {
    pub fn new(
        basis: Decimal,
        basis_label: impl Into<String>,
        rate: Decimal,
        rate_label: impl Into<String>,
        rate_precision: u32,
    ) -> Self {
        Self {
            basis,
            basis_label: basis_label.into(),
            rate,
            rate_label: rate_label.into(),
            rate_precision,
            savings: round_whole(basis * rate),
        }
    }
}

impl fmt::Display for SavingsCalculation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} {} × {} {} = {} saved",
            format_currency(self.basis),
            self.basis_label,
            format_rate(self.rate, self.rate_precision),
            self.rate_label,
            format_currency(self.savings),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceItem {
    pub category: GuidanceCategory,
    pub title: String,
    pub description: String,
    /// Whole-dollar estimate, when one can be made.
    pub estimated_annual_savings: Option<Decimal>,
    pub limit_text: String,
    pub calculation: Option<SavingsCalculation>,
    pub priority: Priority,
}

/// Items in rule order plus the total of the counted savings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceReport {
    pub items: Vec<GuidanceItem>,
    pub total_potential_savings: Decimal,
}

impl GuidanceReport {
    /// Items of one category, in rule order.
    pub fn by_category(
        &self,
        category: GuidanceCategory,
    ) -> impl Iterator<Item = &GuidanceItem> {
        self.items
            .iter()
            .filter(move |item| item.category == category)
    }

    pub fn titles(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.title.as_str()).collect()
    }
}
