//! Load [`TaxRequest`]s from CSV.
//!
//! One request per row. Columns are matched by header name, so their order
//! does not matter and unknown columns are ignored.
//!
//! ## Required columns
//!
//! | Column          | Values                          |
//! |-----------------|---------------------------------|
//! | `tax_year`      | e.g. `2025`                     |
//! | `filing_status` | `S`, `MFJ`, `MFS`, `HOH`        |
//! | `state`         | `NY`, `NJ`                      |
//!
//! ## Optional columns
//!
//! * `nyc_resident`: `true`/`false` (also `yes`/`no`, `1`/`0`); empty is false
//! * `deduction_type`: `standard` or `itemized`; empty is standard
//! * income: `gross_wages`, `self_employment_income`, `business_expenses`,
//!   `other_income`
//! * pre-tax contributions: `retirement_401k`, `traditional_ira`, `hsa`,
//!   `fsa`, `health_premiums`, `other_pre_tax`
//! * itemized deductions: `mortgage_interest`,
//!   `mortgage_interest_second_home`, `mortgage_points`, `pmi_premiums`,
//!   `property_taxes`, `state_income_tax_paid`, `local_income_tax_paid`,
//!   `vehicle_registration_fees`, `charitable_cash`, `charitable_non_cash`,
//!   `charitable_stock`, `medical_expenses`, `casualty_losses`,
//!   `gambling_losses`, `investment_interest`, `home_office_expenses`
//! * withholding: `federal_withheld`, `state_withheld`, `city_withheld`
//!
//! Amount cells may carry a `$` and thousands separators. An empty cell is 0
//! and a negative amount is clamped to 0.
//!
//! ### Minimal example
//!
//! ```csv
//! tax_year,filing_status,state
//! 2025,S,NY
//! ```
//!
//! ### Typical example
//!
//! ```csv
//! tax_year,filing_status,state,nyc_resident,gross_wages,retirement_401k,federal_withheld,state_withheld
//! 2025,S,NY,true,"$85,000",6000,11000,4200
//! 2025,MFJ,NJ,,160000,23500,21000,6500
//! ```
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::models::{
    DeductionType, FilingStatus, IncomeProfile, ItemizedProfile, PreTaxContributions, State,
    TaxRequest, Withholdings,
};

use crate::utils::{ParseDecimalError, parse_amount, parse_flag};

// ---------------------------------------------------------------------------
// Serde-compatible row; amounts stay raw text until sanitized
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    tax_year: i32,
    filing_status: String,
    state: String,
    #[serde(default)]
    nyc_resident: String,
    #[serde(default)]
    deduction_type: String,

    #[serde(default)]
    gross_wages: String,
    #[serde(default)]
    self_employment_income: String,
    #[serde(default)]
    business_expenses: String,
    #[serde(default)]
    other_income: String,

    #[serde(default)]
    retirement_401k: String,
    #[serde(default)]
    traditional_ira: String,
    #[serde(default)]
    hsa: String,
    #[serde(default)]
    fsa: String,
    #[serde(default)]
    health_premiums: String,
    #[serde(default)]
    other_pre_tax: String,

    #[serde(default)]
    mortgage_interest: String,
    #[serde(default)]
    mortgage_interest_second_home: String,
    #[serde(default)]
    mortgage_points: String,
    #[serde(default)]
    pmi_premiums: String,
    #[serde(default)]
    property_taxes: String,
    #[serde(default)]
    state_income_tax_paid: String,
    #[serde(default)]
    local_income_tax_paid: String,
    #[serde(default)]
    vehicle_registration_fees: String,
    #[serde(default)]
    charitable_cash: String,
    #[serde(default)]
    charitable_non_cash: String,
    #[serde(default)]
    charitable_stock: String,
    #[serde(default)]
    medical_expenses: String,
    #[serde(default)]
    casualty_losses: String,
    #[serde(default)]
    gambling_losses: String,
    #[serde(default)]
    investment_interest: String,
    #[serde(default)]
    home_office_expenses: String,

    #[serde(default)]
    federal_withheld: String,
    #[serde(default)]
    state_withheld: String,
    #[serde(default)]
    city_withheld: String,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
///
/// Row numbers are 1-based and count data rows only (header = row 0).
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, non-numeric year, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("unrecognised filing status '{status}' on row {row}")]
    InvalidFilingStatus { status: String, row: usize },

    #[error("unsupported state '{state}' on row {row}")]
    InvalidState { state: String, row: usize },

    #[error("unrecognised deduction type '{value}' on row {row}")]
    InvalidDeductionType { value: String, row: usize },

    #[error("'{value}' is not a yes/no value for {column} on row {row}")]
    InvalidFlag {
        column: &'static str,
        value: String,
        row: usize,
    },

    #[error("bad {column} on row {row}: {source}")]
    InvalidAmount {
        column: &'static str,
        row: usize,
        #[source]
        source: ParseDecimalError,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Convert a single CSV row into a [`TaxRequest`].
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<TaxRequest, CsvLoadError> {
    let amount = |column: &'static str, raw: &str| -> Result<Decimal, CsvLoadError> {
        parse_amount(raw).map_err(|source| CsvLoadError::InvalidAmount {
            column,
            row: row_number,
            source,
        })
    };

    let filing_status = FilingStatus::parse(&row.filing_status).ok_or_else(|| {
        CsvLoadError::InvalidFilingStatus {
            status: row.filing_status.clone(),
            row: row_number,
        }
    })?;
    let state = State::parse(&row.state).ok_or_else(|| CsvLoadError::InvalidState {
        state: row.state.clone(),
        row: row_number,
    })?;
    let nyc_resident = parse_flag(&row.nyc_resident).ok_or_else(|| CsvLoadError::InvalidFlag {
        column: "nyc_resident",
        value: row.nyc_resident.clone(),
        row: row_number,
    })?;
    let deduction_type = if row.deduction_type.is_empty() {
        DeductionType::Standard
    } else {
        row.deduction_type
            .parse()
            .map_err(|_| CsvLoadError::InvalidDeductionType {
                value: row.deduction_type.clone(),
                row: row_number,
            })?
    };

    let income = IncomeProfile {
        gross_wages: amount("gross_wages", &row.gross_wages)?,
        self_employment_income: amount("self_employment_income", &row.self_employment_income)?,
        business_expenses: amount("business_expenses", &row.business_expenses)?,
        other_income: amount("other_income", &row.other_income)?,
        pre_tax: PreTaxContributions {
            retirement_401k: amount("retirement_401k", &row.retirement_401k)?,
            traditional_ira: amount("traditional_ira", &row.traditional_ira)?,
            hsa: amount("hsa", &row.hsa)?,
            fsa: amount("fsa", &row.fsa)?,
            health_premiums: amount("health_premiums", &row.health_premiums)?,
            other: amount("other_pre_tax", &row.other_pre_tax)?,
        },
    };

    let itemized = ItemizedProfile {
        mortgage_interest: amount("mortgage_interest", &row.mortgage_interest)?,
        mortgage_interest_second_home: amount(
            "mortgage_interest_second_home",
            &row.mortgage_interest_second_home,
        )?,
        mortgage_points: amount("mortgage_points", &row.mortgage_points)?,
        pmi_premiums: amount("pmi_premiums", &row.pmi_premiums)?,
        property_taxes: amount("property_taxes", &row.property_taxes)?,
        state_income_tax_paid: amount("state_income_tax_paid", &row.state_income_tax_paid)?,
        local_income_tax_paid: amount("local_income_tax_paid", &row.local_income_tax_paid)?,
        vehicle_registration_fees: amount(
            "vehicle_registration_fees",
            &row.vehicle_registration_fees,
        )?,
        charitable_cash: amount("charitable_cash", &row.charitable_cash)?,
        charitable_non_cash: amount("charitable_non_cash", &row.charitable_non_cash)?,
        charitable_stock: amount("charitable_stock", &row.charitable_stock)?,
        medical_expenses: amount("medical_expenses", &row.medical_expenses)?,
        casualty_losses: amount("casualty_losses", &row.casualty_losses)?,
        gambling_losses: amount("gambling_losses", &row.gambling_losses)?,
        investment_interest: amount("investment_interest", &row.investment_interest)?,
        home_office_expenses: amount("home_office_expenses", &row.home_office_expenses)?,
    };

    let withholdings = Withholdings {
        federal: amount("federal_withheld", &row.federal_withheld)?,
        state: amount("state_withheld", &row.state_withheld)?,
        city: amount("city_withheld", &row.city_withheld)?,
    };

    Ok(TaxRequest {
        tax_year: row.tax_year,
        filing_status,
        state,
        nyc_resident,
        income,
        itemized,
        deduction_type,
        withholdings,
    })
}

/// Parse CSV text and return one [`TaxRequest`] per row, in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is structurally invalid or a
///   required column is missing.
/// * One of the `Invalid*` variants, carrying the row number, if a cell
///   holds a value the estimator cannot accept.
pub fn load_from_str(input: &str) -> Result<Vec<TaxRequest>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1;
            convert_row(row, row_number)
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<TaxRequest>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
