use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;

use center_ledger::aggregate::Selection;
use center_ledger::config::Config;
use center_ledger::dashboard::load_table;
use center_ledger::logging::init_tracing;
use center_ledger::reports;
use center_ledger::sheets::GoogleSheetsSource;
use center_ledger::source::CsvSource;
use center_ledger::table::Normalized;

#[derive(Parser, Debug)]
#[command(author, version, about = "CJ 물류센터 P/L reporting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print min/max/mean/total for each center and the combined series
    Summary(SummaryArgs),
    /// Write monthly_rollup.csv and period_detail.csv
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Secrets file with the [google_sheets] service account
    #[arg(long, env = "SECRETS_PATH", default_value = "data/secrets.toml")]
    secrets: PathBuf,

    /// Read a CSV export of the worksheet instead of the remote sheet
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Year to report (defaults to the latest year in the data)
    #[arg(long)]
    year: Option<i32>,

    /// Month to report (defaults to the earliest month of the year)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output directory for the CSV files
    #[arg(short, long, default_value = "reports")]
    out: PathBuf,
}

async fn load(args: &SourceArgs) -> Result<Normalized> {
    match &args.csv {
        Some(path) => load_table(&CsvSource::new(path)).await,
        None => {
            let config = Config::load(&args.secrets)?;
            let source = GoogleSheetsSource::from_config(&config)?;
            load_table(&source).await
        }
    }
}

async fn resolve(args: &SourceArgs) -> Result<(Normalized, Selection)> {
    let normalized = load(args).await?;
    for warning in &normalized.warnings {
        eprintln!("  Warning: {}", warning);
    }

    let selection = Selection::resolve(&normalized.table, args.year, args.month)
        .context("No dated rows in the worksheet")?;

    if args.year.is_some_and(|y| y != selection.period.year)
        || args.month.is_some_and(|m| m != selection.period.month)
    {
        warn!(period = %selection.period, "requested period not in data; using default selection");
    }

    Ok((normalized, selection))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Summary(args) => {
            let (normalized, selection) = resolve(&args.source).await?;
            reports::print_summary(&normalized.table, selection.period);
        }
        Command::Export(args) => {
            let (normalized, selection) = resolve(&args.source).await?;
            println!("Writing reports for {} to {}", selection.period, args.out.display());
            reports::generate_all_reports(&args.out, &normalized.table, selection.period)?;
        }
    }

    Ok(())
}
