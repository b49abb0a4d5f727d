//! Aggregate curve-fit result reports into a rectangular dataset.
//!
//! A fitting run leaves behind one `.res` report per sample: a fixed-offset
//! text file carrying the weighted residual (Rw) in its header and a block
//! of refined `name value +/- uncertainty` lines. This crate parses those
//! reports and stacks them into one table whose columns are given by a
//! caller-supplied parameter schema, with NaN filling the parameters a
//! report lacks.

pub mod data;
pub mod error;
pub mod export;

pub use data::dataset::{Dataset, DatasetBuilder, DatasetRow, DEFAULT_PATTERN, FILE_NAME_COLUMN};
pub use data::report::{FitReport, QUALITY_KEY};
pub use data::schema::ParameterSchema;
pub use error::{Error, FormatErrorKind, Result};
