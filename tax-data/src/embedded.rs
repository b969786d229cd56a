//! Tables compiled into the binary from `data/`.

use std::sync::OnceLock;

use tax_core::TaxTables;
use tracing::debug;

use crate::{TaxDataError, TaxDataLoader};

const FEDERAL_BRACKETS: &str = include_str!("../data/federal_brackets.csv");
const STATE_BRACKETS: &str = include_str!("../data/state_brackets.csv");
const YEAR_FILES: &[(&str, &str)] = &[
    ("years/2024.toml", include_str!("../data/years/2024.toml")),
    ("years/2025.toml", include_str!("../data/years/2025.toml")),
    ("years/2026.toml", include_str!("../data/years/2026.toml")),
];

static EMBEDDED: OnceLock<Result<TaxTables, TaxDataError>> = OnceLock::new();

/// Parses the embedded tables on first use and shares them afterwards.
///
/// # Errors
///
/// Returns the load error if the embedded data is malformed; the same error
/// is returned on every call.
pub fn embedded_tables() -> Result<&'static TaxTables, &'static TaxDataError> {
    EMBEDDED.get_or_init(load_embedded).as_ref()
}

fn load_embedded() -> Result<TaxTables, TaxDataError> {
    debug!("Parsing embedded tax tables");
    let federal = TaxDataLoader::parse_federal(FEDERAL_BRACKETS.as_bytes())?;
    let state = TaxDataLoader::parse_state(STATE_BRACKETS.as_bytes())?;
    let years = YEAR_FILES
        .iter()
        .map(|(name, contents)| TaxDataLoader::parse_year(name, contents))
        .collect::<Result<Vec<_>, _>>()?;
    TaxDataLoader::build(&federal, &state, years)
}
