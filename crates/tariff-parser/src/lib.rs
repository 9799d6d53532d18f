pub mod errors;
mod reader;
pub mod schema;

use std::path::Path;

use polars::prelude::DataFrame;

pub use errors::LoadError;
pub use reader::{date_to_epoch_days, epoch_days_to_date, load_table};
pub use schema::{enriched_schema, input_schema, ColumnKind, TableSchema};

/// Loads raw tariff events, checking that every required input column is present.
pub fn load_events(path: &Path) -> Result<DataFrame, LoadError> {
    load_table(path, &input_schema())
}

/// Loads a previously enriched table with every derived column restored to its declared type.
pub fn load_enriched(path: &Path) -> Result<DataFrame, LoadError> {
    load_table(path, &enriched_schema())
}

#[cfg(test)]
mod tests;
