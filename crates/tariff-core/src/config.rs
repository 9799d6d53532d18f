use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::dates::InvalidDatePolicy;
use crate::macro_indicators::{MacroReference, MacroReferenceError, MacroReferenceFile};
use crate::trade_list::{TradeListRuleEntry, TradeListRules, TradeRuleError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    MacroReference(#[from] MacroReferenceError),
    #[error(transparent)]
    TradeRule(#[from] TradeRuleError),
}

/// Optional overrides for the reference data and policies an enrichment run uses.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnrichmentConfig {
    #[serde(default)]
    pub invalid_dates: Option<InvalidDatePolicy>,
    #[serde(default)]
    pub macro_indicators: Option<MacroReferenceFile>,
    #[serde(default)]
    pub trade_rules: Option<Vec<TradeListRuleEntry>>,
}

impl EnrichmentConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Sections left out of the file fall back to the built-in reference data.
    pub fn macro_reference(&self) -> Result<MacroReference, ConfigError> {
        match &self.macro_indicators {
            Some(file) => Ok(MacroReference::from_file(file.clone())?),
            None => Ok(MacroReference::builtin()),
        }
    }

    pub fn trade_rules(&self) -> Result<TradeListRules, ConfigError> {
        match &self.trade_rules {
            Some(entries) => Ok(TradeListRules::from_entries(entries.clone())?),
            None => Ok(TradeListRules::default()),
        }
    }

    pub fn invalid_date_policy(&self) -> InvalidDatePolicy {
        self.invalid_dates.unwrap_or_default()
    }
}
