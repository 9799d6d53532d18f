use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use polars::prelude::*;

use crate::errors::LoadError;
use crate::schema::{ColumnKind, TableSchema};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads a delimited file into a frame typed according to `schema`.
///
/// Every column is first read as text so that passthrough columns survive untouched; columns the
/// schema declares as typed are then coerced one row at a time, which lets a bad cell be reported
/// with its row index instead of silently becoming null.
pub fn load_table(path: &Path, schema: &TableSchema) -> Result<DataFrame, LoadError> {
    if !path.exists() {
        return Err(LoadError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let headers = read_header(path)?;
    let mut seen = BTreeSet::new();
    let mut duplicated = BTreeSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            duplicated.insert(header.clone());
        }
    }
    if !duplicated.is_empty() {
        return Err(LoadError::DuplicateColumns {
            duplicated: duplicated.into_iter().collect(),
        });
    }

    let missing: Vec<String> = schema
        .required
        .iter()
        .filter(|required| !headers.iter().any(|header| header == *required))
        .map(|required| required.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns { missing });
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    df.set_column_names(headers.iter().map(|s| s.as_str()))?;

    for name in headers.iter() {
        match schema.kind_of(name) {
            ColumnKind::Text => continue,
            ColumnKind::Decimal => {
                let values = coerce_cells(&df, name, parse_optional_f64)?;
                df.with_column(Series::new(name.as_str().into(), values))?;
            }
            ColumnKind::Integer => {
                let values = coerce_cells(&df, name, parse_optional_i32)?;
                df.with_column(Series::new(name.as_str().into(), values))?;
            }
            ColumnKind::IsoDate => {
                let values = coerce_cells(&df, name, parse_optional_iso_date)?;
                let days: Vec<Option<i32>> = values
                    .into_iter()
                    .map(|value| value.map(date_to_epoch_days))
                    .collect();
                let series = Series::new(name.as_str().into(), days).cast(&DataType::Date)?;
                df.with_column(series)?;
            }
        }
    }

    Ok(df)
}

/// Header names, trimmed, in file order.
fn read_header(path: &Path) -> Result<Vec<String>, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| LoadError::Csv { source })?;

    let headers = reader
        .headers()
        .map_err(|source| LoadError::Csv { source })?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    Ok(headers)
}

fn coerce_cells<T>(
    df: &DataFrame,
    column: &str,
    parse: fn(&str) -> Result<Option<T>, String>,
) -> Result<Vec<Option<T>>, LoadError> {
    let raw = df.column(column)?.str()?;
    let mut values = Vec::with_capacity(raw.len());

    for (row_index, cell) in raw.into_iter().enumerate() {
        let value = match cell {
            Some(text) => parse(text).map_err(|message| LoadError::InvalidValue {
                column: column.to_string(),
                row_index,
                message,
            })?,
            None => None,
        };
        values.push(value);
    }

    Ok(values)
}

fn is_missing(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
}

pub(crate) fn parse_optional_f64(value: &str) -> Result<Option<f64>, String> {
    let trimmed = value.trim();
    if is_missing(trimmed) {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(Some(parsed)),
        Ok(_) => Err(format!("non-finite number '{trimmed}'")),
        Err(err) => Err(format!("failed to parse '{trimmed}' as a number: {err}")),
    }
}

pub(crate) fn parse_optional_i32(value: &str) -> Result<Option<i32>, String> {
    let trimmed = value.trim();
    if is_missing(trimmed) {
        return Ok(None);
    }

    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|err| format!("failed to parse '{trimmed}' as an integer: {err}"))
}

pub(crate) fn parse_optional_iso_date(value: &str) -> Result<Option<NaiveDate>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
        .map(Some)
        .map_err(|err| format!("invalid ISO date '{trimmed}': {err}"))
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Physical representation of a polars `Date`: days since 1970-01-01.
pub fn date_to_epoch_days(date: NaiveDate) -> i32 {
    (date - unix_epoch()).num_days() as i32
}

pub fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    unix_epoch().checked_add_signed(chrono::Duration::days(days as i64))
}
