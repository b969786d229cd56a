use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use tax_core::{TaxTableSource, TaxTables};
use tax_data::{TaxDataLoader, embedded_tables};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tax_cli::{csv_loader, estimate, render};

// ─── CLI definition ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Federal, New York, New Jersey and NYC income tax estimator.
///
/// Reads one request per CSV row, computes the federal, state and city
/// liability, and prints a summary with tax-reduction guidance.
#[derive(Debug, Parser)]
#[command(name = "tax-estimator", version, about, long_about = None)]
struct Cli {
    /// CSV file with one tax request per row.
    #[arg(short, long)]
    input: PathBuf,

    /// Load tax tables from this directory instead of the built-in ones.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Skip the tax-reduction guidance.
    #[arg(long)]
    no_guidance: bool,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info`.
/// * Writes to stderr so JSON on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let loaded: TaxTables;
    let tables = match &cli.data_dir {
        Some(dir) => {
            debug!(dir = %dir.display(), "loading tax tables from disk");
            loaded = TaxDataLoader::from_dir(dir)
                .with_context(|| format!("Failed to load tax tables from: {}", dir.display()))?;
            &loaded
        }
        None => embedded_tables().context("Built-in tax tables are invalid")?,
    };
    debug!(years = ?tables.supported_years(), "tax tables ready");

    let requests = csv_loader::load_from_file(&cli.input)
        .with_context(|| format!("Failed to read requests from: {}", cli.input.display()))?;
    info!(rows = requests.len(), "loaded requests");

    let estimates = requests
        .into_iter()
        .enumerate()
        .map(|(idx, request)| {
            estimate(tables, request, !cli.no_guidance)
                .with_context(|| format!("Failed to estimate row {}", idx + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Text => {
            let today = Local::now().date_naive();
            for (idx, estimate) in estimates.iter().enumerate() {
                if idx > 0 {
                    writeln!(out)?;
                }
                render::write_text(&mut out, estimate, today)?;
            }
        }
        OutputFormat::Json => {
            let json = render::to_json(&estimates).context("Failed to serialize estimates")?;
            writeln!(out, "{json}")?;
        }
    }

    Ok(())
}
