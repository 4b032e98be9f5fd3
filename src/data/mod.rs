/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv.gz / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (cached once per path)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  immutable columns, inferred dtypes
///   └──────────┘
///        │
///        ├──────────────┬───────────────┐
///        ▼              ▼               ▼
///   ┌──────────┐  ┌───────────┐  ┌───────────┐
///   │  filter   │  │ aggregate │  │  titles   │
///   └──────────┘  └───────────┘  └───────────┘
///   row indices    counts, pivots  honorific counts
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod text;
pub mod titles;

use std::path::PathBuf;

/// Errors raised while loading or interpreting the dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed dataset: {0}")]
    Schema(String),

    #[error("column '{0}' not found")]
    MissingColumn(String),
}
