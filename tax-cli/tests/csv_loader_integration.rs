//! Integration tests that run the on-disk fixture through the loader and the
//! estimator with the built-in tables.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_cli::{Estimate, csv_loader, estimate};
use tax_core::{DeductionType, FilingStatus, State, TaxRequest};
use tax_data::embedded_tables;

/// Path to the sample CSV shipped with the test fixtures.
fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample_requests.csv")
}

fn load_fixture() -> Vec<TaxRequest> {
    csv_loader::load_from_file(&fixture_path()).expect("fixture file should load without error")
}

fn estimate_row(
    row: usize,
    with_guidance: bool,
) -> Estimate {
    let request = load_fixture().swap_remove(row);
    let tables = embedded_tables().expect("embedded tables load");
    estimate(tables, request, with_guidance).expect("fixture years are supported")
}

#[test]
fn test_load_fixture_file_succeeds() {
    // The fixture has exactly 3 rows.
    assert_eq!(load_fixture().len(), 3);
}

#[test]
fn test_load_fixture_first_row_wage_earner() {
    let requests = load_fixture();
    let r = &requests[0];

    assert_eq!(r.tax_year, 2025);
    assert_eq!(r.filing_status, FilingStatus::Single);
    assert_eq!(r.state, State::NewYork);
    assert!(!r.nyc_resident);
    assert_eq!(r.income.gross_wages, dec!(80000));
    assert_eq!(r.withholdings.federal, dec!(0));
}

#[test]
fn test_load_fixture_third_row_sanitizes_currency() {
    let requests = load_fixture();
    let r = &requests[2];

    assert_eq!(r.tax_year, 2024);
    assert_eq!(r.filing_status, FilingStatus::MarriedFilingJointly);
    assert_eq!(r.state, State::NewJersey);
    assert_eq!(r.deduction_type, DeductionType::Itemized);
    assert_eq!(r.income.gross_wages, dec!(150000));
    assert_eq!(r.income.pre_tax.retirement_401k, dec!(23000));
    assert_eq!(r.itemized.mortgage_interest, dec!(12000));
    assert_eq!(r.withholdings.federal, dec!(18500));
    assert_eq!(r.withholdings.city, dec!(0));
}

#[test]
fn test_fixture_wage_earner_estimate() {
    let estimate = estimate_row(0, true);
    let result = &estimate.result;

    assert_eq!(result.agi, dec!(80000));
    assert_eq!(result.federal.taxable_income, dec!(65000));
    assert_eq!(result.federal.tax, dec!(9214.00));
    assert_eq!(result.state_tax.taxable_income, dec!(72000));
    assert!(result.city.is_none());

    let guidance = estimate.guidance.expect("guidance requested");
    assert_eq!(guidance.total_potential_savings, dec!(10121));
}

#[test]
fn test_fixture_self_employed_nyc_resident_estimate() {
    let estimate = estimate_row(1, false);
    let result = &estimate.result;

    assert_eq!(result.self_employment.self_employment_tax, dec!(14129.55));
    assert_eq!(result.self_employment.se_tax_deduction, dec!(7064.775));
    assert!(result.city.is_some());
    assert!(estimate.guidance.is_none());
}

#[test]
fn test_fixture_itemizer_falls_back_to_standard() {
    let estimate = estimate_row(2, false);
    let result = &estimate.result;

    // 12000 mortgage + 10000 capped SALT + 3000 cash gifts
    let itemized = result.itemized.as_ref().expect("itemized requested");
    assert_eq!(itemized.total, dec!(25000));
    assert_eq!(result.agi, dec!(127000));
    // Itemized total is below the 2024 joint standard deduction.
    assert_eq!(result.deduction_used, DeductionType::Standard);
    assert_eq!(result.deduction_amount, dec!(29200));
}
