use std::path::Path;

use polars::prelude::DataFrame;
use tariff_parser::schema::ENRICHED_COLUMNS;
use tracing::{info, warn};

use crate::config::{ConfigError, EnrichmentConfig};
use crate::dates::{self, InvalidDate, InvalidDatePolicy};
use crate::economics;
use crate::error::{PipelineError, Result};
use crate::macro_indicators::{self, MacroReference};
use crate::outputs;
use crate::summary::{self, EnrichmentSummary};
use crate::trade_list::{self, TradeListRules};

/// Reference data and policies injected into an enrichment run.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentContext {
    pub macro_reference: MacroReference,
    pub trade_rules: TradeListRules,
    pub invalid_dates: InvalidDatePolicy,
}

impl EnrichmentContext {
    pub fn from_config(config: &EnrichmentConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            macro_reference: config.macro_reference()?,
            trade_rules: config.trade_rules()?,
            invalid_dates: config.invalid_date_policy(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct EnrichmentOutcome {
    pub dataframe: DataFrame,
    pub summary: EnrichmentSummary,
    pub dropped: Vec<InvalidDate>,
}

/// Runs derivation, macro join, classification and date normalization over loaded events.
pub fn enrich(events: &DataFrame, context: &EnrichmentContext) -> Result<EnrichmentOutcome> {
    let input_rows = events.height();
    let events = without_derived_columns(events)?;

    let derived = economics::apply_economic_derivation(&events)?;
    ensure_row_count("economic derivation", input_rows, &derived)?;

    let joined = macro_indicators::join_macro_indicators(&derived, &context.macro_reference)?;
    ensure_row_count("macro indicator join", input_rows, &joined)?;

    let classified = trade_list::apply_trade_list_classification(&joined, &context.trade_rules)?;
    ensure_row_count("trade-list classification", input_rows, &classified)?;

    let normalized = dates::normalize_dates(&classified, context.invalid_dates)?;
    ensure_row_count(
        "date normalization",
        input_rows - normalized.dropped.len(),
        &normalized.dataframe,
    )?;

    let mut summary = summary::summarize(&normalized.dataframe)?;
    summary.input_rows = input_rows;
    summary.dropped_rows = normalized.dropped.len();
    summary.month_first_dates = normalized.month_first_fallbacks;
    summary.macro_reference_version = Some(context.macro_reference.version().to_string());

    Ok(EnrichmentOutcome {
        dataframe: normalized.dataframe,
        summary,
        dropped: normalized.dropped,
    })
}

/// Enriches `input` into `output` with the built-in reference data and strict date handling.
pub fn run(input: &Path, output: &Path) -> Result<EnrichmentSummary> {
    run_with_context(input, output, &EnrichmentContext::default())
}

pub fn run_with_context(
    input: &Path,
    output: &Path,
    context: &EnrichmentContext,
) -> Result<EnrichmentSummary> {
    info!(path = %input.display(), "loading tariff events");
    let events = tariff_parser::load_events(input)?;
    info!(rows = events.height(), columns = events.width(), "tariff events loaded");

    let mut outcome = enrich(&events, context)?;
    info!(
        rows = outcome.summary.output_rows,
        dropped = outcome.summary.dropped_rows,
        unmatched_countries = outcome.summary.unmatched_countries.len(),
        macro_reference_version = context.macro_reference.version(),
        "enrichment complete"
    );

    outputs::write_enriched(&mut outcome.dataframe, output)?;
    Ok(outcome.summary)
}

/// Drops input columns that carry a derived column name so every stage appends a fresh value in
/// the fixed output order.
fn without_derived_columns(events: &DataFrame) -> Result<DataFrame> {
    let mut events = events.clone();
    for name in ENRICHED_COLUMNS {
        if events.column(name).is_ok() {
            events.drop_in_place(name)?;
            warn!(column = name, "input column replaced by derived value");
        }
    }
    Ok(events)
}

fn ensure_row_count(stage: &'static str, expected: usize, df: &DataFrame) -> Result<()> {
    if df.height() == expected {
        Ok(())
    } else {
        Err(PipelineError::RowCountChanged {
            stage,
            expected,
            found: df.height(),
        })
    }
}
