use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tax_core::{FilingStatus, TaxTableSource, TaxTables};
use tax_data::{TaxDataLoader, embedded_tables};
use tracing_subscriber::EnvFilter;

/// Load tax tables and report what they contain.
///
/// The data directory should contain:
/// - federal_brackets.csv: tax_year, schedule (X, Y-1, Y-2, Z), min_income,
///   max_income (empty for the top bracket), rate
/// - state_brackets.csv: jurisdiction (NY, NJ, NYC), filing_key (single,
///   married), min_income, max_income, rate
/// - years/<year>.toml: standard deductions, SE constants, contribution limits
///
/// Without a directory the tables built into the binary are checked.
#[derive(Parser, Debug)]
#[command(name = "tax-data-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory with the tax table files
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();

    let args = Args::parse();

    let loaded: TaxTables;
    let tables = match &args.data_dir {
        Some(dir) => {
            println!("Loading tax tables from: {}", dir.display());
            loaded = TaxDataLoader::from_dir(dir)
                .with_context(|| format!("Failed to load tax tables from: {}", dir.display()))?;
            &loaded
        }
        None => {
            println!("Checking embedded tax tables");
            embedded_tables().context("Embedded tax tables are invalid")?
        }
    };

    for year in tables.supported_years() {
        let config = tables
            .config(year)
            .with_context(|| format!("Tax year {year} listed but not loaded"))?;
        println!("{year}:");
        for status in FilingStatus::ALL {
            let schedule = config.federal_schedule(status);
            println!(
                "  {:<4} schedule {:<3} {} brackets, top rate {}, standard deduction {}",
                status.as_str(),
                status.schedule_code(),
                schedule.brackets().len(),
                schedule.top_rate(),
                config.standard_deduction_for(status),
            );
        }
    }

    println!(
        "All schedules valid for {} tax year(s).",
        tables.supported_years().len()
    );

    Ok(())
}
