use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// How a report file violated the fixed-offset format.
#[derive(Debug, Error)]
pub enum FormatErrorKind {
    #[error("no quality-metric line (report has fewer than 12 lines)")]
    MissingQualityLine,

    #[error("quality-metric token '{0}' is not a number")]
    BadQualityValue(String),

    #[error("no divider line ('--') found below the parameter block")]
    MissingDivider,

    #[error("line {line_no}: '{line}' does not split into name and value")]
    MalformedParameterLine { line_no: usize, line: String },

    #[error("line {line_no}: parameter '{name}' has non-numeric value '{value}'")]
    BadParameterValue {
        line_no: usize,
        name: String,
        value: String,
    },
}

/// Errors raised while parsing reports or assembling a dataset.
///
/// Every variant is fatal for the whole batch: a build either returns a
/// complete dataset or no dataset at all.
#[derive(Debug, Error)]
pub enum Error {
    /// The fixed-offset structure of a report file is violated.
    #[error("{}: {kind}", path.display())]
    Format { path: PathBuf, kind: FormatErrorKind },

    /// A report lacks required schema parameters (strict mode only).
    #[error("{}: report is missing schema parameters: {}", path.display(), missing.join(", "))]
    SchemaMismatch { path: PathBuf, missing: Vec<String> },

    /// A report, directory, or parameter-list file could not be read.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The report file-name pattern is not a valid glob.
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] globset::Error),

    /// CSV export failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// JSON export failed.
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Parquet export failed.
    #[error("failed to write Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow record-batch assembly failed.
    #[error("failed to assemble Arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

pub type Result<T> = std::result::Result<T, Error>;
