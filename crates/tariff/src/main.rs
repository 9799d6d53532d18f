use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use tariff_core::config::EnrichmentConfig;
use tariff_core::dates::InvalidDatePolicy;
use tariff_core::summary::summarize;
use tariff_core::{run_with_context, EnrichmentContext, EnrichmentSummary};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Tariff impact enrichment pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enrich raw tariff events into the dashboard dataset
    Enrich(EnrichArgs),
    /// Summarize a previously enriched dataset
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct EnrichArgs {
    /// Raw tariff events CSV
    input: PathBuf,
    /// Destination for the enriched CSV (overwritten if present)
    output: PathBuf,
    /// TOML file overriding macro indicators, trade rules or the date policy
    #[arg(long)]
    config: Option<PathBuf>,
    /// What to do with rows whose date cannot be parsed
    #[arg(long, value_enum)]
    invalid_dates: Option<DatePolicyArg>,
    /// Print the run summary as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Enriched CSV produced by `tariff enrich`
    path: PathBuf,
    /// Print the summary as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DatePolicyArg {
    Fail,
    Drop,
}

impl From<DatePolicyArg> for InvalidDatePolicy {
    fn from(arg: DatePolicyArg) -> Self {
        match arg {
            DatePolicyArg::Fail => InvalidDatePolicy::Fail,
            DatePolicyArg::Drop => InvalidDatePolicy::Drop,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Enrich(args) => handle_enrich(args),
        Command::Inspect(args) => handle_inspect(args),
    }
}

fn handle_enrich(args: EnrichArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => EnrichmentConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EnrichmentConfig::default(),
    };

    let mut context = EnrichmentContext::from_config(&config)?;
    if let Some(policy) = args.invalid_dates {
        context.invalid_dates = policy.into();
    }

    let summary = run_with_context(&args.input, &args.output, &context).with_context(|| {
        format!(
            "failed to enrich {} into {}",
            args.input.display(),
            args.output.display()
        )
    })?;
    info!(output = %args.output.display(), "enrichment finished");

    print_summary(&summary, args.json)
}

fn handle_inspect(args: InspectArgs) -> Result<()> {
    let df = tariff_parser::load_enriched(&args.path)
        .with_context(|| format!("failed to read enriched dataset {}", args.path.display()))?;
    let summary = summarize(&df)?;
    print_summary(&summary, args.json)
}

fn print_summary(summary: &EnrichmentSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Input rows".to_string(), summary.input_rows.to_string()]);
    table.add_row(vec!["Output rows".to_string(), summary.output_rows.to_string()]);
    if summary.dropped_rows > 0 {
        table.add_row(vec![
            "Dropped (bad date)".to_string(),
            summary.dropped_rows.to_string(),
        ]);
    }
    if summary.month_first_dates > 0 {
        table.add_row(vec![
            "Month-first dates".to_string(),
            summary.month_first_dates.to_string(),
        ]);
    }
    if let Some(version) = &summary.macro_reference_version {
        table.add_row(vec!["Macro reference".to_string(), version.clone()]);
    }
    table.add_row(vec![
        "Total revenue loss (USD)".to_string(),
        format!("{:.2}", summary.total_revenue_loss),
    ]);
    table.add_row(vec![
        "Volume-driven loss (USD)".to_string(),
        format!("{:.2}", summary.total_volume_driven_revenue_loss),
    ]);
    table.add_row(vec![
        "Mean elasticity".to_string(),
        summary
            .mean_elasticity
            .map(|value| format!("{value:.3}"))
            .unwrap_or_else(|| "n/a".to_string()),
    ]);
    table.add_row(vec![
        "Undefined elasticity rows".to_string(),
        summary.undefined_elasticity_rows.to_string(),
    ]);
    table.add_row(vec![
        "Countries without macro data".to_string(),
        if summary.unmatched_countries.is_empty() {
            "none".to_string()
        } else {
            summary.unmatched_countries.join(", ")
        },
    ]);
    println!("{table}");

    let mut statuses = Table::new();
    statuses.set_header(vec!["Trade list status", "Rows"]);
    for (status, count) in &summary.trade_list_counts {
        statuses.add_row(vec![status.clone(), count.to_string()]);
    }
    println!("{statuses}");

    Ok(())
}

