use std::path::{Path, PathBuf};

use globset::Glob;

use crate::data::report::FitReport;
use crate::data::schema::ParameterSchema;
use crate::error::{Error, Result};

/// Name of the identifier column appended after the schema columns.
pub const FILE_NAME_COLUMN: &str = "file_name";

/// Default glob matched against report file names during discovery.
pub const DEFAULT_PATTERN: &str = "*.res";

// ---------------------------------------------------------------------------
// Dataset – the aggregated table
// ---------------------------------------------------------------------------

/// One dataset row: the report identifier plus one value per schema column.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    /// Report file stem.
    pub file_name: String,
    /// Parallel to the schema columns; parameters the report lacked are NaN.
    pub values: Vec<f64>,
}

/// Rectangular table over many reports: one row per report, columns equal to
/// the schema (all f64) plus the identifier column.
///
/// The dataset owns its rows after construction and is not mutated further.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    schema: Vec<String>,
    rows: Vec<DatasetRow>,
}

impl Dataset {
    /// Assemble a dataset from already-reindexed rows. Every row must carry
    /// exactly one value per schema column.
    pub fn new(schema: Vec<String>, rows: Vec<DatasetRow>) -> Self {
        debug_assert!(rows.iter().all(|r| r.values.len() == schema.len()));
        Dataset { schema, rows }
    }

    /// Column headers in output order: schema names, then `file_name`.
    pub fn header(&self) -> Vec<&str> {
        self.schema
            .iter()
            .map(String::as_str)
            .chain([FILE_NAME_COLUMN])
            .collect()
    }

    /// Schema (numeric) column names, excluding the identifier.
    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Column count including the identifier column.
    pub fn n_columns(&self) -> usize {
        self.schema.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at (row, schema column), if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        let col = self.schema.iter().position(|c| c == column)?;
        Some(self.rows.get(row)?.values[col])
    }

    /// Extract one numeric column in row order.
    pub fn column(&self, column: &str) -> Option<Vec<f64>> {
        let col = self.schema.iter().position(|c| c == column)?;
        Some(self.rows.iter().map(|r| r.values[col]).collect())
    }
}

// ---------------------------------------------------------------------------
// DatasetBuilder – aggregate reports against a schema
// ---------------------------------------------------------------------------

/// Aggregates report files into a [`Dataset`].
///
/// The builder holds the schema and the missing-parameter policy and calls
/// the report parser per file (composition, no subtyping). By default a
/// report lacking a schema parameter gets NaN in that cell; with
/// [`strict`](Self::strict) the build fails naming the missing keys. Extra
/// report parameters outside the schema are always dropped.
///
/// Any parse or I/O failure aborts the whole build; no partial dataset is
/// ever returned.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    schema: ParameterSchema,
    strict: bool,
}

impl DatasetBuilder {
    pub fn new(schema: ParameterSchema) -> Self {
        DatasetBuilder {
            schema,
            strict: false,
        }
    }

    /// Fail with [`Error::SchemaMismatch`] when a report lacks a schema
    /// parameter, instead of filling the cell with NaN.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Aggregate the given report files, one row each, in iteration order.
    pub fn build<I>(&self, files: I) -> Result<Dataset>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        let mut rows = Vec::new();
        for file in files {
            let path = file.as_ref();
            let report = FitReport::parse(path)?;
            rows.push(self.row_from_report(path, &report)?);
        }
        log::info!(
            "aggregated {} reports into {} columns",
            rows.len(),
            self.schema.len() + 1
        );
        Ok(Dataset::new(self.schema.names().to_vec(), rows))
    }

    /// Aggregate every file in `dir` whose name matches `pattern`
    /// ([`DEFAULT_PATTERN`] when `None`). Files are sorted by path so the
    /// row order does not depend on directory enumeration order.
    pub fn build_dir(&self, dir: &Path, pattern: Option<&str>) -> Result<Dataset> {
        let pattern = pattern.unwrap_or(DEFAULT_PATTERN);
        let files = discover_reports(dir, pattern)?;
        log::debug!(
            "found {} files matching '{}' in {}",
            files.len(),
            pattern,
            dir.display()
        );
        self.build(files)
    }

    /// Reindex the report's mapping against the schema: present keys keep
    /// their value, absent keys resolve to NaN (never zero).
    fn row_from_report(&self, path: &Path, report: &FitReport) -> Result<DatasetRow> {
        if self.strict {
            let missing: Vec<String> = self
                .schema
                .names()
                .iter()
                .filter(|n| !report.parameters.contains_key(n.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(Error::SchemaMismatch {
                    path: path.to_path_buf(),
                    missing,
                });
            }
        }

        let values = self
            .schema
            .names()
            .iter()
            .map(|n| report.parameters.get(n).copied().unwrap_or(f64::NAN))
            .collect();

        Ok(DatasetRow {
            file_name: report.name.clone(),
            values,
        })
    }
}

fn discover_reports(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = Glob::new(pattern)?.compile_matcher();
    let entries = std::fs::read_dir(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match path.file_name() {
            Some(name) if matcher.is_match(name) => files.push(path),
            _ => {}
        }
    }
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
