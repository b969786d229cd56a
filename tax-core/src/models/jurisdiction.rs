use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TaxError;

/// State of residence. Only New York and New Jersey are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    NewYork,
    NewJersey,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewYork => "NY",
            Self::NewJersey => "NJ",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NY" => Some(Self::NewYork),
            "NJ" => Some(Self::NewJersey),
            _ => None,
        }
    }

    /// Whether residents can also owe NYC resident tax.
    pub fn has_city_tax(&self) -> bool {
        matches!(self, Self::NewYork)
    }
}

impl fmt::Display for State {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for State {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim()).ok_or_else(|| TaxError::invalid_enum("state", s))
    }
}

/// Every bracket table a tax year carries, used to label schedules in
/// errors and data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    Federal,
    NewYork,
    NewJersey,
    NewYorkCity,
}

impl Jurisdiction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Federal => "US",
            Self::NewYork => "NY",
            Self::NewJersey => "NJ",
            Self::NewYorkCity => "NYC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "US" => Some(Self::Federal),
            "NY" => Some(Self::NewYork),
            "NJ" => Some(Self::NewJersey),
            "NYC" => Some(Self::NewYorkCity),
            _ => None,
        }
    }
}

impl From<State> for Jurisdiction {
    fn from(state: State) -> Self {
        match state {
            State::NewYork => Self::NewYork,
            State::NewJersey => Self::NewJersey,
        }
    }
}
