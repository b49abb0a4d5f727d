//! Data layer: report parsing, schema, and dataset assembly.
//!
//! Architecture:
//! ```text
//!  *.res report files        parameters.csv
//!        │                         │
//!        ▼                         ▼
//!   ┌──────────┐          ┌─────────────────┐
//!   │  report   │          │ ParameterSchema  │
//!   └──────────┘          └─────────────────┘
//!        │ name → value            │ ordered names
//!        └──────────┬──────────────┘
//!                   ▼
//!          ┌────────────────┐
//!          │ DatasetBuilder  │  reindex each report against the schema
//!          └────────────────┘
//!                   │
//!                   ▼
//!            ┌──────────┐
//!            │  Dataset  │  rows × (schema + file_name)
//!            └──────────┘
//! ```

pub mod dataset;
pub mod report;
pub mod schema;
