use std::path::Path;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// ParameterSchema – ordered column selection
// ---------------------------------------------------------------------------

/// Ordered list of expected parameter names.
///
/// Order is significant: it defines the dataset column order. Names are
/// case-sensitive and kept exactly as given; deduplication is the caller's
/// responsibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSchema {
    names: Vec<String>,
}

impl ParameterSchema {
    /// Build a schema from names in iteration order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParameterSchema {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Load a comma- or newline-delimited name list, preserving file order.
    /// Surrounding whitespace is trimmed and empty entries are dropped.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let names: Vec<String> = text
            .split([',', '\n', '\r'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        log::debug!("loaded {} parameter names from {}", names.len(), path.display());
        Ok(ParameterSchema { names })
    }

    /// Drop every name starting with `prefix`, preserving relative order.
    /// An empty prefix filters nothing.
    pub fn without_prefix(&self, prefix: &str) -> Self {
        if prefix.is_empty() {
            return self.clone();
        }
        ParameterSchema {
            names: self
                .names
                .iter()
                .filter(|n| !n.starts_with(prefix))
                .cloned()
                .collect(),
        }
    }

    /// The names in schema (column) order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn preserves_given_order() {
        let schema = ParameterSchema::from_names(["c", "a", "b"]);
        assert_eq!(schema.names(), ["c", "a", "b"]);
    }

    #[test]
    fn loads_comma_delimited_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "scale, delta2 ,a_Ni,Uiso_Ni,\n").unwrap();
        let schema = ParameterSchema::load(file.path()).unwrap();
        assert_eq!(schema.names(), ["scale", "delta2", "a_Ni", "Uiso_Ni"]);
    }

    #[test]
    fn loads_newline_delimited_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "scale\ndelta2\na_Ni\n").unwrap();
        let schema = ParameterSchema::load(file.path()).unwrap();
        assert_eq!(schema.names(), ["scale", "delta2", "a_Ni"]);
    }

    #[test]
    fn prefix_filter_keeps_relative_order() {
        let schema = ParameterSchema::from_names(["a_Ni", "Uiso_Ni", "a_NiO", "scale"]);
        let filtered = schema.without_prefix("a_");
        assert_eq!(filtered.names(), ["Uiso_Ni", "scale"]);
    }

    #[test]
    fn empty_prefix_filters_nothing() {
        let schema = ParameterSchema::from_names(["a", "b"]);
        assert_eq!(schema.without_prefix("").names(), schema.names());
    }

    #[test]
    fn names_are_case_sensitive_and_kept_as_given() {
        let schema = ParameterSchema::from_names(["Uiso_Ni", "uiso_ni"]);
        assert_eq!(schema.without_prefix("U").names(), ["uiso_ni"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ParameterSchema::load(Path::new("/nonexistent/params.csv")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
