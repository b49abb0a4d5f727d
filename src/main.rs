use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, ValueEnum};

use fitres::{export, DatasetBuilder, ParameterSchema, DEFAULT_PATTERN};

/// Aggregate curve-fit report files into a single table.
#[derive(Parser, Debug)]
#[command(name = "fitres", version, about)]
struct Cli {
    /// Directory containing the report files.
    reports: PathBuf,

    /// Comma-separated parameter list defining the output columns.
    #[arg(short, long)]
    parameters: PathBuf,

    /// Glob matched against report file names.
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Drop schema parameters starting with this prefix.
    #[arg(long)]
    exclude_prefix: Option<String>,

    /// Fail when a report lacks a schema parameter instead of filling
    /// the cell with NaN.
    #[arg(long)]
    strict: bool,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Csv,
    Json,
    Parquet,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut schema = ParameterSchema::load(&cli.parameters)
        .with_context(|| format!("loading parameter list {}", cli.parameters.display()))?;
    if let Some(prefix) = &cli.exclude_prefix {
        schema = schema.without_prefix(prefix);
    }
    ensure!(!schema.is_empty(), "parameter list is empty");

    let dataset = DatasetBuilder::new(schema)
        .strict(cli.strict)
        .build_dir(&cli.reports, Some(&cli.pattern))
        .context("aggregating reports")?;
    ensure!(
        !dataset.is_empty(),
        "no files matching '{}' in {}",
        cli.pattern,
        cli.reports.display()
    );

    log::info!(
        "dataset: {} rows x {} columns",
        dataset.n_rows(),
        dataset.n_columns()
    );

    match (cli.format, &cli.output) {
        (OutputFormat::Csv, Some(path)) => export::write_csv_file(&dataset, path)?,
        (OutputFormat::Csv, None) => export::write_csv(&dataset, std::io::stdout().lock())?,
        (OutputFormat::Json, Some(path)) => export::write_json_file(&dataset, path)?,
        (OutputFormat::Json, None) => export::write_json(&dataset, std::io::stdout().lock())?,
        (OutputFormat::Parquet, Some(path)) => export::write_parquet_file(&dataset, path)?,
        (OutputFormat::Parquet, None) => bail!("parquet output requires --output"),
    }

    Ok(())
}
