use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::calculations::SeTaxError;
use tax_core::{
    BracketSchedule, ContributionLimits, FilingStatus, Jurisdiction, PerFilingStatus, PerStateKey,
    SelfEmploymentConstants, StateBrackets, StateFilingKey, TaxBracket, TaxError, TaxTableSource,
    TaxTables, TaxYearConfig,
};
use thiserror::Error;
use tracing::{debug, info};

pub const FEDERAL_BRACKETS_FILE: &str = "federal_brackets.csv";
pub const STATE_BRACKETS_FILE: &str = "state_brackets.csv";
pub const YEARS_DIR: &str = "years";

/// Errors that can occur when loading tax table data.
#[derive(Debug, Error)]
pub enum TaxDataError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("failed to parse year file {name}: {source}")]
    YearFile {
        name: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid schedule code '{0}' (expected X, Y-1, Y-2 or Z)")]
    InvalidSchedule(String),

    #[error("invalid jurisdiction '{0}' in state brackets (expected NY, NJ or NYC)")]
    InvalidJurisdiction(String),

    #[error("invalid filing key '{0}' in state brackets (expected single or married)")]
    InvalidFilingKey(String),

    #[error("no brackets for {schedule} in tax year {tax_year}")]
    MissingFederalSchedule { tax_year: i32, schedule: &'static str },

    #[error("no {filing_key} brackets for {jurisdiction}")]
    MissingStateSchedule {
        jurisdiction: &'static str,
        filing_key: &'static str,
    },

    #[error("invalid self-employment constants for {tax_year}: {source}")]
    SelfEmployment {
        tax_year: i32,
        #[source]
        source: SeTaxError,
    },

    #[error(transparent)]
    Tax(#[from] TaxError),

    #[error("no tax year files found")]
    NoYears,
}

/// Maps IRS schedule codes to the filing status that uses them.
///
/// - Schedule X → Single (S)
/// - Schedule Y-1 → Married Filing Jointly (MFJ)
/// - Schedule Y-2 → Married Filing Separately (MFS)
/// - Schedule Z → Head of Household (HOH)
fn schedule_to_filing_status(schedule: &str) -> Result<FilingStatus, TaxDataError> {
    FilingStatus::ALL
        .into_iter()
        .find(|status| status.schedule_code() == schedule)
        .ok_or_else(|| TaxDataError::InvalidSchedule(schedule.to_string()))
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim().parse::<Decimal>().map_err(serde::de::Error::custom)
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// A single record from the federal brackets CSV file.
///
/// - `tax_year`: The tax year (e.g., 2025)
/// - `schedule`: The IRS schedule code (X, Y-1, Y-2, Z)
/// - `min_income`: Lower bound of the bracket
/// - `max_income`: Upper bound (empty for the top bracket)
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FederalBracketRecord {
    pub tax_year: i32,
    pub schedule: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub rate: Decimal,
}

/// A single record from the state brackets CSV file. State and city
/// schedules are the same for every supported year.
///
/// - `jurisdiction`: NY, NJ or NYC
/// - `filing_key`: single or married
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StateBracketRecord {
    pub jurisdiction: String,
    pub filing_key: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub rate: Decimal,
}

/// Per-year scalars from `years/<year>.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct YearFile {
    pub tax_year: i32,
    pub standard_deduction: PerFilingStatus<Decimal>,
    pub ny_standard_deduction: PerFilingStatus<Decimal>,
    pub self_employment: SelfEmploymentConstants,
    pub contribution_limits: ContributionLimits,
}

/// Builds [`TaxTables`] from the bracket CSV files and the per-year TOML
/// files.
pub struct TaxDataLoader;

impl TaxDataLoader {
    /// Parse federal bracket records from a CSV reader.
    pub fn parse_federal<R: Read>(reader: R) -> Result<Vec<FederalBracketRecord>, TaxDataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: FederalBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse state and city bracket records from a CSV reader.
    pub fn parse_state<R: Read>(reader: R) -> Result<Vec<StateBracketRecord>, TaxDataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: StateBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse one year file. `name` is only used in error messages.
    pub fn parse_year(
        name: &str,
        contents: &str,
    ) -> Result<YearFile, TaxDataError> {
        toml::from_str(contents).map_err(|source| TaxDataError::YearFile {
            name: name.to_string(),
            source,
        })
    }

    /// Assembles and validates one [`TaxYearConfig`] per year file.
    ///
    /// Every year needs all four federal schedules; the state and city
    /// schedules are shared by all years. Bracket shapes and SE constants
    /// are validated here so that a computation never sees bad data.
    pub fn build(
        federal: &[FederalBracketRecord],
        state: &[StateBracketRecord],
        years: Vec<YearFile>,
    ) -> Result<TaxTables, TaxDataError> {
        if years.is_empty() {
            return Err(TaxDataError::NoYears);
        }

        let state_brackets = Self::build_state_brackets(state)?;

        let mut federal_groups: BTreeMap<(i32, FilingStatus), Vec<TaxBracket>> = BTreeMap::new();
        for record in federal {
            let status = schedule_to_filing_status(&record.schedule)?;
            federal_groups
                .entry((record.tax_year, status))
                .or_default()
                .push(TaxBracket {
                    min_income: record.min_income,
                    max_income: record.max_income,
                    tax_rate: record.rate,
                });
        }

        let mut tables = TaxTables::new();
        for year in years {
            let tax_year = year.tax_year;
            year.self_employment
                .validate()
                .map_err(|source| TaxDataError::SelfEmployment { tax_year, source })?;

            let mut schedule_for = |status: FilingStatus| -> Result<BracketSchedule, TaxDataError> {
                let brackets = federal_groups.remove(&(tax_year, status)).ok_or(
                    TaxDataError::MissingFederalSchedule {
                        tax_year,
                        schedule: status.schedule_code(),
                    },
                )?;
                let name = format!("{tax_year} {}", status.schedule_code());
                Ok(BracketSchedule::new(&name, sorted(brackets))?)
            };

            let federal_brackets = PerFilingStatus {
                single: schedule_for(FilingStatus::Single)?,
                married_joint: schedule_for(FilingStatus::MarriedFilingJointly)?,
                married_separate: schedule_for(FilingStatus::MarriedFilingSeparately)?,
                head_of_household: schedule_for(FilingStatus::HeadOfHousehold)?,
            };

            debug!(tax_year, "Built tax year tables");
            tables.insert(TaxYearConfig {
                tax_year,
                federal_brackets,
                standard_deduction: year.standard_deduction,
                ny_standard_deduction: year.ny_standard_deduction,
                self_employment: year.self_employment,
                contribution_limits: year.contribution_limits,
                state_brackets: state_brackets.clone(),
            });
        }

        info!(years = ?tables.supported_years(), "Loaded tax tables");
        Ok(tables)
    }

    /// Loads every table from a data directory laid out like `data/`:
    /// `federal_brackets.csv`, `state_brackets.csv` and `years/*.toml`.
    pub fn from_dir(dir: &Path) -> Result<TaxTables, TaxDataError> {
        let federal = Self::parse_federal(open(&dir.join(FEDERAL_BRACKETS_FILE))?)?;
        let state = Self::parse_state(open(&dir.join(STATE_BRACKETS_FILE))?)?;

        let years_dir = dir.join(YEARS_DIR);
        let entries = fs::read_dir(&years_dir).map_err(|source| TaxDataError::Io {
            path: years_dir.clone(),
            source,
        })?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| TaxDataError::Io {
                path: years_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut years = Vec::with_capacity(paths.len());
        for path in paths {
            let contents = fs::read_to_string(&path).map_err(|source| TaxDataError::Io {
                path: path.clone(),
                source,
            })?;
            let name = path.display().to_string();
            years.push(Self::parse_year(&name, &contents)?);
        }

        Self::build(&federal, &state, years)
    }

    fn build_state_brackets(records: &[StateBracketRecord]) -> Result<StateBrackets, TaxDataError> {
        let mut groups: BTreeMap<(&'static str, &'static str), Vec<TaxBracket>> = BTreeMap::new();
        for record in records {
            let jurisdiction = match Jurisdiction::parse(&record.jurisdiction) {
                Some(j @ (Jurisdiction::NewYork | Jurisdiction::NewJersey | Jurisdiction::NewYorkCity)) => j,
                _ => return Err(TaxDataError::InvalidJurisdiction(record.jurisdiction.clone())),
            };
            let key = StateFilingKey::parse(&record.filing_key)
                .ok_or_else(|| TaxDataError::InvalidFilingKey(record.filing_key.clone()))?;
            groups
                .entry((jurisdiction.as_str(), key.as_str()))
                .or_default()
                .push(TaxBracket {
                    min_income: record.min_income,
                    max_income: record.max_income,
                    tax_rate: record.rate,
                });
        }

        let mut pair = |jurisdiction: Jurisdiction| -> Result<PerStateKey<BracketSchedule>, TaxDataError> {
            let mut schedule = |key: StateFilingKey| -> Result<BracketSchedule, TaxDataError> {
                let brackets = groups
                    .remove(&(jurisdiction.as_str(), key.as_str()))
                    .ok_or(TaxDataError::MissingStateSchedule {
                        jurisdiction: jurisdiction.as_str(),
                        filing_key: key.as_str(),
                    })?;
                let name = format!("{}/{}", jurisdiction.as_str(), key.as_str());
                Ok(BracketSchedule::new(&name, sorted(brackets))?)
            };
            Ok(PerStateKey {
                single: schedule(StateFilingKey::Single)?,
                married: schedule(StateFilingKey::Married)?,
            })
        };

        Ok(StateBrackets {
            new_york: pair(Jurisdiction::NewYork)?,
            new_jersey: pair(Jurisdiction::NewJersey)?,
            new_york_city: pair(Jurisdiction::NewYorkCity)?,
        })
    }
}

fn open(path: &Path) -> Result<File, TaxDataError> {
    File::open(path).map_err(|source| TaxDataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn sorted(mut brackets: Vec<TaxBracket>) -> Vec<TaxBracket> {
    brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
    brackets
}
