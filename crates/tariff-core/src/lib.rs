pub mod config;
pub mod dates;
pub mod economics;
pub mod error;
pub mod macro_indicators;
pub mod outputs;
pub mod pipeline;
pub mod summary;
pub mod trade_list;

pub use error::{PipelineError, Result};
pub use pipeline::{enrich, run, run_with_context, EnrichmentContext, EnrichmentOutcome};
pub use summary::EnrichmentSummary;
