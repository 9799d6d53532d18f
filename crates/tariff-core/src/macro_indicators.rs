use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tariff_parser::schema::{COUNTRY, CPI_PCT, GDP_TRILLIONS};
use thiserror::Error;
use tracing::warn;

/// Version tag of the snapshot returned by [`MacroReference::builtin`].
pub const BUILTIN_VERSION: &str = "2023-approx";

/// Approximate point-in-time GDP (trillions USD) and CPI inflation (%) per country.
/// These are rough reference values for dashboard context, not authoritative statistics.
const BUILTIN_SNAPSHOT: [(&str, f64, f64); 18] = [
    ("USA", 25.4, 3.2),
    ("China", 17.9, 2.1),
    ("Germany", 4.0, 5.9),
    ("Japan", 4.2, 3.3),
    ("India", 3.4, 4.5),
    ("UK", 3.0, 6.8),
    ("France", 2.7, 5.2),
    ("Brazil", 1.9, 4.1),
    ("Australia", 1.7, 5.6),
    ("South Korea", 1.6, 3.6),
    ("Mexico", 1.4, 4.6),
    ("Canada", 2.1, 3.9),
    ("Portugal", 0.25, 4.3),
    ("South Africa", 0.4, 5.4),
    ("Argentina", 0.6, 104.0),
    ("Norway", 0.5, 5.8),
    ("Egypt", 0.4, 24.4),
    ("Chile", 0.3, 7.6),
];

#[derive(Debug, Error)]
pub enum MacroReferenceError {
    #[error("country '{0}' appears more than once in the macro reference table")]
    DuplicateCountry(String),
    #[error("macro indicators for '{country}' must be finite numbers")]
    NonFinite { country: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroIndicators {
    pub gdp_trillions: f64,
    pub cpi_pct: f64,
}

/// One row of a macro reference table as it appears in a TOML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryIndicatorsEntry {
    pub country: String,
    pub gdp_trillions: f64,
    pub cpi_pct: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MacroReferenceFile {
    pub version: String,
    #[serde(default)]
    pub countries: Vec<CountryIndicatorsEntry>,
}

/// Immutable, versioned country → indicator lookup used by the joiner.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroReference {
    version: String,
    indicators: BTreeMap<String, MacroIndicators>,
}

impl MacroReference {
    pub fn new(
        version: impl Into<String>,
        entries: impl IntoIterator<Item = (String, MacroIndicators)>,
    ) -> Result<Self, MacroReferenceError> {
        let mut indicators = BTreeMap::new();
        for (country, values) in entries {
            if !values.gdp_trillions.is_finite() || !values.cpi_pct.is_finite() {
                return Err(MacroReferenceError::NonFinite { country });
            }
            if indicators.insert(country.clone(), values).is_some() {
                return Err(MacroReferenceError::DuplicateCountry(country));
            }
        }

        Ok(Self {
            version: version.into(),
            indicators,
        })
    }

    pub fn builtin() -> Self {
        Self {
            version: BUILTIN_VERSION.to_string(),
            indicators: BUILTIN_SNAPSHOT
                .iter()
                .map(|(country, gdp_trillions, cpi_pct)| {
                    (
                        country.to_string(),
                        MacroIndicators {
                            gdp_trillions: *gdp_trillions,
                            cpi_pct: *cpi_pct,
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn from_file(file: MacroReferenceFile) -> Result<Self, MacroReferenceError> {
        Self::new(
            file.version,
            file.countries.into_iter().map(|entry| {
                (
                    entry.country,
                    MacroIndicators {
                        gdp_trillions: entry.gdp_trillions,
                        cpi_pct: entry.cpi_pct,
                    },
                )
            }),
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, country: &str) -> Option<MacroIndicators> {
        self.indicators.get(country).copied()
    }
}

impl Default for MacroReference {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Appends `GDP_Trillions` and `CPI_Pct`; countries outside the reference get nulls.
pub fn join_macro_indicators(
    df: &DataFrame,
    reference: &MacroReference,
) -> Result<DataFrame, PolarsError> {
    let len = df.height();
    let countries = df.column(COUNTRY)?.str()?;

    let mut gdp = Vec::with_capacity(len);
    let mut cpi = Vec::with_capacity(len);
    let mut unmatched: BTreeSet<&str> = BTreeSet::new();

    for country in countries.into_iter() {
        let indicators = match country {
            Some(name) => {
                let found = reference.lookup(name);
                if found.is_none() {
                    unmatched.insert(name);
                }
                found
            }
            None => None,
        };
        gdp.push(indicators.map(|values| values.gdp_trillions));
        cpi.push(indicators.map(|values| values.cpi_pct));
    }

    for country in &unmatched {
        warn!(
            country = %country,
            reference_version = reference.version(),
            "no macro indicators for country; GDP and CPI left null"
        );
    }

    let mut output = df.clone();
    output.hstack_mut(&mut [
        Series::new(GDP_TRILLIONS.into(), gdp).into(),
        Series::new(CPI_PCT.into(), cpi).into(),
    ])?;

    Ok(output)
}
