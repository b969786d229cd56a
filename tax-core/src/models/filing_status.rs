use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TaxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 4] = [
        Self::Single,
        Self::MarriedFilingJointly,
        Self::MarriedFilingSeparately,
        Self::HeadOfHousehold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "S" => Some(Self::Single),
            "MFJ" => Some(Self::MarriedFilingJointly),
            "MFS" => Some(Self::MarriedFilingSeparately),
            "HOH" => Some(Self::HeadOfHousehold),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::MarriedFilingSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
        }
    }

    /// IRS rate schedule used for this status (X, Y-1, Y-2, Z).
    pub fn schedule_code(&self) -> &'static str {
        match self {
            Self::Single => "X",
            Self::MarriedFilingJointly => "Y-1",
            Self::MarriedFilingSeparately => "Y-2",
            Self::HeadOfHousehold => "Z",
        }
    }

    /// True only for a joint return. Thresholds with a separate "married"
    /// tier (additional Medicare, HSA family limit, IRA phase-out, NY 529)
    /// apply to joint filers only.
    pub fn is_joint(&self) -> bool {
        matches!(self, Self::MarriedFilingJointly)
    }

    /// Key used for NY, NJ and NYC schedules, which only have a single and
    /// a married table. Both married statuses use the married table.
    pub fn state_key(&self) -> StateFilingKey {
        match self {
            Self::MarriedFilingJointly | Self::MarriedFilingSeparately => StateFilingKey::Married,
            Self::Single | Self::HeadOfHousehold => StateFilingKey::Single,
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for FilingStatus {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim()).ok_or_else(|| TaxError::invalid_enum("filing status", s))
    }
}

/// Normalized filing key for state and city bracket tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateFilingKey {
    Single,
    Married,
}

impl StateFilingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Married => "married",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Self::Single),
            "married" => Some(Self::Married),
            _ => None,
        }
    }
}

/// A value held once per filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerFilingStatus<T> {
    pub single: T,
    pub married_joint: T,
    pub married_separate: T,
    pub head_of_household: T,
}

impl<T> PerFilingStatus<T> {
    pub fn get(
        &self,
        status: FilingStatus,
    ) -> &T {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedFilingJointly => &self.married_joint,
            FilingStatus::MarriedFilingSeparately => &self.married_separate,
            FilingStatus::HeadOfHousehold => &self.head_of_household,
        }
    }
}
