use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::*;
use serde::Serialize;
use tariff_parser::schema::{
    COUNTRY, GDP_TRILLIONS, PRICE_ELASTICITY, REVENUE_LOSS, TRADE_LIST_STATUS,
    VOLUME_DRIVEN_REVENUE_LOSS,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichmentSummary {
    pub input_rows: usize,
    pub output_rows: usize,
    pub dropped_rows: usize,
    pub month_first_dates: usize,
    pub macro_reference_version: Option<String>,
    pub unmatched_countries: Vec<String>,
    pub undefined_elasticity_rows: usize,
    pub mean_elasticity: Option<f64>,
    pub total_revenue_loss: f64,
    pub total_volume_driven_revenue_loss: f64,
    pub trade_list_counts: BTreeMap<String, usize>,
}

/// Aggregates an enriched frame. Run-level fields (input rows, drops, reference version) are
/// left for the caller to fill in.
pub fn summarize(df: &DataFrame) -> Result<EnrichmentSummary, PolarsError> {
    let countries = df.column(COUNTRY)?.str()?;
    let gdp = df.column(GDP_TRILLIONS)?.f64()?;
    let elasticity = df.column(PRICE_ELASTICITY)?.f64()?;
    let revenue_loss = df.column(REVENUE_LOSS)?.f64()?;
    let volume_driven = df.column(VOLUME_DRIVEN_REVENUE_LOSS)?.f64()?;
    let statuses = df.column(TRADE_LIST_STATUS)?.str()?;

    let unmatched: BTreeSet<&str> = countries
        .into_iter()
        .zip(gdp.into_iter())
        .filter_map(|(country, gdp)| match (country, gdp) {
            (Some(country), None) => Some(country),
            _ => None,
        })
        .collect();

    let defined: Vec<f64> = elasticity.into_iter().flatten().collect();
    let mean_elasticity = if defined.is_empty() {
        None
    } else {
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    };

    let mut trade_list_counts = BTreeMap::new();
    for status in statuses.into_iter().flatten() {
        *trade_list_counts.entry(status.to_string()).or_insert(0) += 1;
    }

    Ok(EnrichmentSummary {
        input_rows: df.height(),
        output_rows: df.height(),
        unmatched_countries: unmatched.into_iter().map(str::to_string).collect(),
        undefined_elasticity_rows: df.height() - defined.len(),
        mean_elasticity,
        total_revenue_loss: revenue_loss.into_iter().flatten().sum(),
        total_volume_driven_revenue_loss: volume_driven.into_iter().flatten().sum(),
        trade_list_counts,
        ..Default::default()
    })
}
