use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("input is missing required column(s): {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("input header repeats column(s): {}", duplicated.join(", "))]
    DuplicateColumns { duplicated: Vec<String> },

    #[error("CSV header could not be read: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("data row {row_index} column '{column}': {message}")]
    InvalidValue {
        column: String,
        row_index: usize,
        message: String,
    },

    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}

impl LoadError {
    /// Names of the missing columns when this is a schema failure.
    pub fn missing_columns(&self) -> Option<&[String]> {
        match self {
            LoadError::MissingColumns { missing } => Some(missing),
            _ => None,
        }
    }
}
