// crates/tariff-core/src/error.rs

use std::path::PathBuf;

use polars::error::PolarsError;
use tariff_parser::LoadError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::dates::DateNormalizerError;
use crate::outputs::WriteError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("data row {row_index}: cannot parse date '{raw}' (expected day-first, e.g. DD/MM/YYYY)")]
    DateParse { row_index: usize, raw: String },

    #[error("failed to write enriched table to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: WriteError,
    },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{stage} changed the row count from {expected} to {found}")]
    RowCountChanged {
        stage: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}

impl From<DateNormalizerError> for PipelineError {
    fn from(err: DateNormalizerError) -> Self {
        match err {
            DateNormalizerError::Unparseable { row_index, raw } => {
                PipelineError::DateParse { row_index, raw }
            }
            DateNormalizerError::Polars(source) => PipelineError::Polars(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
