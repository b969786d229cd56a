//! Versioned tax tables: federal, NY, NJ and NYC brackets plus the per-year
//! deductions, SE constants and contribution limits.

mod embedded;
mod loader;

pub use embedded::embedded_tables;
pub use loader::{
    FEDERAL_BRACKETS_FILE, FederalBracketRecord, STATE_BRACKETS_FILE, StateBracketRecord,
    TaxDataError, TaxDataLoader, YEARS_DIR, YearFile,
};
