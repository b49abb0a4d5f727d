use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, FormatErrorKind, Result};

// ---------------------------------------------------------------------------
// Fixed-offset report layout
// ---------------------------------------------------------------------------

/// Reserved key under which the quality metric is folded into the mapping.
pub const QUALITY_KEY: &str = "rw";

/// 0-indexed line whose last whitespace-separated token is the weighted
/// residual (Rw).
const QUALITY_LINE: usize = 11;

/// First line of the refined-variables block.
const BLOCK_START: usize = 15;

/// Substring marking the divider line below the variables block. The block
/// ends two lines above the first line containing it.
const DIVIDER: &str = "--";

/// Separator between a refined value and its uncertainty.
const UNCERTAINTY_SEP: &str = " +/-";

// ---------------------------------------------------------------------------
// FitReport – one parsed report file
// ---------------------------------------------------------------------------

/// One fit-result report: quality metric plus named fit parameters.
///
/// Immutable after parse; the dataset builder absorbs its values into a row
/// and discards it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitReport {
    /// File stem (base name without extension), used as the row identifier.
    pub name: String,
    /// Weighted residual (Rw) from the report header.
    pub rw: f64,
    /// Parameter name → refined value. Always contains the quality metric
    /// under [`QUALITY_KEY`]. Duplicate names within a report: last wins.
    pub parameters: BTreeMap<String, f64>,
}

impl FitReport {
    /// Parse one report file.
    ///
    /// Parsing is strict: a missing metric line, a missing divider, or a
    /// block line that does not split into name and value is an
    /// [`Error::Format`], never silently skipped.
    pub fn parse(path: &Path) -> Result<FitReport> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let report = parse_text(&text, path)?;
        log::debug!(
            "parsed {} ({} parameters, rw = {})",
            path.display(),
            report.parameters.len(),
            report.rw
        );
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Parsing internals
// ---------------------------------------------------------------------------

fn parse_text(text: &str, path: &Path) -> Result<FitReport> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.trim_end_matches('\r'))
        .collect();

    let format_err = |kind| Error::Format {
        path: path.to_path_buf(),
        kind,
    };

    let rw = quality_metric(&lines).map_err(format_err)?;
    let block = parameter_block(&lines).map_err(format_err)?;

    let mut parameters = BTreeMap::new();
    for (offset, line) in block.iter().enumerate() {
        // 1-based line number in the file, for error messages.
        let line_no = BLOCK_START + offset + 1;
        let (name, value) = split_parameter_line(line, line_no).map_err(format_err)?;
        parameters.insert(name, value);
    }
    parameters.insert(QUALITY_KEY.to_string(), rw);

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(FitReport {
        name,
        rw,
        parameters,
    })
}

/// Last whitespace-separated token of the metric line, parsed as a float.
fn quality_metric(lines: &[&str]) -> std::result::Result<f64, FormatErrorKind> {
    let line = lines
        .get(QUALITY_LINE)
        .ok_or(FormatErrorKind::MissingQualityLine)?;
    let token = line
        .split_whitespace()
        .last()
        .ok_or_else(|| FormatErrorKind::BadQualityValue(String::new()))?;
    token
        .parse::<f64>()
        .map_err(|_| FormatErrorKind::BadQualityValue(token.to_string()))
}

/// Lines 15.. truncated two lines above the first divider line.
fn parameter_block<'a>(lines: &'a [&'a str]) -> std::result::Result<&'a [&'a str], FormatErrorKind> {
    let tail: &[&str] = lines.get(BLOCK_START..).unwrap_or(&[]);
    let divider = tail
        .iter()
        .position(|l| l.contains(DIVIDER))
        .ok_or(FormatErrorKind::MissingDivider)?;
    Ok(&tail[..divider.saturating_sub(2)])
}

/// Split `<name><ws><value>[ +/-<uncertainty>]` into name and value.
fn split_parameter_line(
    line: &str,
    line_no: usize,
) -> std::result::Result<(String, f64), FormatErrorKind> {
    // Everything after " +/-" is the uncertainty; drop it.
    let head = match line.find(UNCERTAINTY_SEP) {
        Some(idx) => &line[..idx],
        None => line,
    };

    let (name, value) = head
        .trim()
        .split_once(|c: char| c.is_whitespace())
        .ok_or_else(|| FormatErrorKind::MalformedParameterLine {
            line_no,
            line: line.to_string(),
        })?;

    let value = value.trim();
    let parsed = value
        .parse::<f64>()
        .map_err(|_| FormatErrorKind::BadParameterValue {
            line_no,
            name: name.to_string(),
            value: value.to_string(),
        })?;

    Ok((name.to_string(), parsed))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a report with the fixed-offset layout: the metric at line 11,
    /// the variables block from line 15, and a divider two lines below it.
    fn report_text(rw_line: &str, params: &[(&str, &str)]) -> String {
        let mut lines: Vec<String> = (0..11).map(|i| format!("header line {i}")).collect();
        lines.push(rw_line.to_string()); // line 11
        lines.push("Chi2            42.0".to_string());
        lines.push(String::new());
        lines.push("Refined variables".to_string()); // line 14
        for (name, value) in params {
            lines.push(format!("{name}  {value}"));
        }
        lines.push(String::new());
        lines.push("Fixed variables: none".to_string());
        lines.push("-".repeat(70));
        lines.join("\n")
    }

    fn parse(text: &str) -> Result<FitReport> {
        parse_text(text, Path::new("sample_01.res"))
    }

    #[test]
    fn extracts_metric_and_parameters() {
        let text = report_text(
            "Rw              0.1234",
            &[("a_Ni", "3.52e+00 +/- 1.2e-03"), ("Uiso_Ni", "0.005 +/- 0.001")],
        );
        let report = parse(&text).unwrap();
        assert_eq!(report.rw, 0.1234);
        assert_eq!(report.parameters["a_Ni"], 3.52);
        assert_eq!(report.parameters["Uiso_Ni"], 0.005);
        assert_eq!(report.name, "sample_01");
    }

    #[test]
    fn quality_metric_is_last_token() {
        let text = report_text("  ...  Rw = 0.1234", &[]);
        let report = parse(&text).unwrap();
        assert_eq!(report.rw, 0.1234);
    }

    #[test]
    fn metric_is_folded_under_reserved_key() {
        let text = report_text("Rw 0.08", &[("scale", "1.5 +/- 0.2")]);
        let report = parse(&text).unwrap();
        assert_eq!(report.parameters[QUALITY_KEY], report.rw);
    }

    #[test]
    fn value_without_uncertainty_suffix_parses() {
        let text = report_text("Rw 0.08", &[("delta2", "2.17")]);
        let report = parse(&text).unwrap();
        assert_eq!(report.parameters["delta2"], 2.17);
    }

    #[test]
    fn duplicate_name_last_occurrence_wins() {
        let text = report_text("Rw 0.08", &[("scale", "1.0"), ("scale", "2.0")]);
        let report = parse(&text).unwrap();
        assert_eq!(report.parameters["scale"], 2.0);
    }

    #[test]
    fn empty_parameter_block_yields_only_metric() {
        let text = report_text("Rw 0.08", &[]);
        let report = parse(&text).unwrap();
        assert_eq!(report.parameters.len(), 1);
        assert_eq!(report.parameters[QUALITY_KEY], 0.08);
    }

    #[test]
    fn short_file_is_missing_quality_line() {
        let err = parse("only\nthree\nlines").unwrap_err();
        assert!(matches!(
            err,
            Error::Format {
                kind: FormatErrorKind::MissingQualityLine,
                ..
            }
        ));
    }

    #[test]
    fn non_numeric_metric_token_is_rejected() {
        let text = report_text("Rw not-a-number", &[]);
        let err = parse(&text).unwrap_err();
        assert!(matches!(
            err,
            Error::Format {
                kind: FormatErrorKind::BadQualityValue(_),
                ..
            }
        ));
    }

    #[test]
    fn missing_divider_is_rejected() {
        // Keep the metric line but cut everything from the block down.
        let mut lines: Vec<String> = (0..11).map(|i| format!("header line {i}")).collect();
        lines.push("Rw 0.1".to_string());
        lines.push("tail with no divider".to_string());
        let err = parse(&lines.join("\n")).unwrap_err();
        assert!(matches!(
            err,
            Error::Format {
                kind: FormatErrorKind::MissingDivider,
                ..
            }
        ));
    }

    #[test]
    fn block_line_without_separator_is_an_error_not_skipped() {
        let text = report_text("Rw 0.08", &[("loneword", "")]);
        // "loneword  " trims to a single token with no value.
        let err = parse(&text).unwrap_err();
        assert!(matches!(
            err,
            Error::Format {
                kind: FormatErrorKind::MalformedParameterLine { .. },
                ..
            }
        ));
    }

    #[test]
    fn block_line_with_non_numeric_value_is_rejected() {
        let text = report_text("Rw 0.08", &[("scale", "abc +/- 0.1")]);
        let err = parse(&text).unwrap_err();
        assert!(matches!(
            err,
            Error::Format {
                kind: FormatErrorKind::BadParameterValue { .. },
                ..
            }
        ));
    }

    #[test]
    fn parsing_is_idempotent() {
        let text = report_text("Rw 0.0812", &[("a_Ni", "3.52e+00 +/- 1.2e-03")]);
        assert_eq!(parse(&text).unwrap(), parse(&text).unwrap());
    }
}
