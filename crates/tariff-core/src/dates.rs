use chrono::{Datelike, NaiveDate, NaiveTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tariff_parser::date_to_epoch_days;
use tariff_parser::schema::{DATE, YEAR};
use thiserror::Error;
use tracing::{debug, warn};

const TEXTUAL_FORMATS: [&str; 5] = ["%d %b %Y", "%d %B %Y", "%d-%b-%Y", "%b %d, %Y", "%B %d, %Y"];
const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

#[derive(Debug, Error)]
pub enum DateNormalizerError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("data row {row_index}: cannot parse date '{raw}' as a day-first date")]
    Unparseable { row_index: usize, raw: String },
}

/// What to do with a row whose date cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidDatePolicy {
    #[default]
    Fail,
    Drop,
}

/// How a raw date string was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateResolution {
    DayFirst,
    /// Day-first was impossible (e.g. `12/25/2021`) so month-first was used.
    MonthFirstFallback,
    YearFirst,
    Textual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDate {
    pub row_index: usize,
    pub raw: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DateNormalization {
    pub dataframe: DataFrame,
    pub dropped: Vec<InvalidDate>,
    pub month_first_fallbacks: usize,
}

/// Replaces `date` with a calendar `Date` column and appends `Year`.
pub fn normalize_dates(
    df: &DataFrame,
    policy: InvalidDatePolicy,
) -> Result<DateNormalization, DateNormalizerError> {
    let len = df.height();
    let raw_dates = df.column(DATE)?.str()?;

    let mut days: Vec<Option<i32>> = Vec::with_capacity(len);
    let mut years: Vec<Option<i32>> = Vec::with_capacity(len);
    let mut keep: Vec<bool> = Vec::with_capacity(len);
    let mut dropped = Vec::new();
    let mut month_first_fallbacks = 0usize;

    for (row_index, raw) in raw_dates.into_iter().enumerate() {
        match raw.and_then(parse_day_first) {
            Some((date, resolution)) => {
                if resolution == DateResolution::MonthFirstFallback {
                    month_first_fallbacks += 1;
                    warn!(
                        row_index,
                        raw = raw.unwrap_or_default(),
                        "date is not valid day-first; interpreted as month-first"
                    );
                }
                days.push(Some(date_to_epoch_days(date)));
                years.push(Some(date.year()));
                keep.push(true);
            }
            None => {
                let raw = raw.map(str::to_string);
                match policy {
                    InvalidDatePolicy::Fail => {
                        return Err(DateNormalizerError::Unparseable {
                            row_index,
                            raw: raw.unwrap_or_default(),
                        });
                    }
                    InvalidDatePolicy::Drop => {
                        warn!(row_index, raw = ?raw, "dropping row with unparseable date");
                        dropped.push(InvalidDate { row_index, raw });
                        days.push(None);
                        years.push(None);
                        keep.push(false);
                    }
                }
            }
        }
    }

    let mut output = df.clone();
    output.with_column(Series::new(DATE.into(), days).cast(&DataType::Date)?)?;
    output.hstack_mut(&mut [Series::new(YEAR.into(), years).into()])?;

    if !dropped.is_empty() {
        let mask = BooleanChunked::new("keep".into(), keep.as_slice());
        output = output.filter(&mask)?;
    }

    debug!(
        rows = output.height(),
        dropped = dropped.len(),
        month_first_fallbacks,
        "dates normalized"
    );

    Ok(DateNormalization {
        dataframe: output,
        dropped,
        month_first_fallbacks,
    })
}

/// Parses a date preferring day-first order on ambiguous numeric input.
///
/// Accepts `/`, `-` or `.` separated numeric dates with two- or four-digit years, year-first ISO
/// dates, an optional trailing time of day, and a handful of spelled-out month forms.
pub fn parse_day_first(raw: &str) -> Option<(NaiveDate, DateResolution)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in TEXTUAL_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some((date, DateResolution::Textual));
        }
    }

    let (date_part, time_part) = match trimmed.split_once([' ', 'T']) {
        Some((date, time)) => (date, Some(time.trim())),
        None => (trimmed, None),
    };
    if let Some(time) = time_part {
        if !is_time_of_day(time) {
            return None;
        }
    }

    let separator = date_part.chars().find(|c| matches!(c, '/' | '-' | '.'))?;
    let parts: Vec<&str> = date_part.split(separator).collect();
    if parts.len() != 3
        || parts
            .iter()
            .any(|part| part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    if parts[0].len() == 4 {
        let year: i32 = parts[0].parse().ok()?;
        let month: u32 = parts[1].parse().ok()?;
        let day: u32 = parts[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day)
            .map(|date| (date, DateResolution::YearFirst));
    }

    if parts[0].len() > 2 || parts[1].len() > 2 {
        return None;
    }

    let first: u32 = parts[0].parse().ok()?;
    let second: u32 = parts[1].parse().ok()?;
    let year = parse_year(parts[2])?;

    if let Some(date) = NaiveDate::from_ymd_opt(year, second, first) {
        return Some((date, DateResolution::DayFirst));
    }
    NaiveDate::from_ymd_opt(year, first, second)
        .map(|date| (date, DateResolution::MonthFirstFallback))
}

/// Four-digit years as written; two-digit years pivot at 69 like strftime's `%y`.
fn parse_year(token: &str) -> Option<i32> {
    let value: i32 = token.parse().ok()?;
    match token.len() {
        4 => Some(value),
        2 if value < 69 => Some(2000 + value),
        2 => Some(1900 + value),
        _ => None,
    }
}

fn is_time_of_day(value: &str) -> bool {
    TIME_FORMATS
        .iter()
        .any(|format| NaiveTime::parse_from_str(value, format).is_ok())
}
