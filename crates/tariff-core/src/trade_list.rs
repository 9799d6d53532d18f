use polars::prelude::*;
use serde::Deserialize;
use tariff_parser::schema::{COUNTRY, PRODUCT_TYPE, TRADE_LIST_STATUS};
use thiserror::Error;

pub const STANDARD_STATUS: &str = "Standard";
pub const LABEL_SEPARATOR: &str = " | ";

pub const SECTION_301: &str = "Section 301";
pub const SECTION_232_TECH: &str = "Potential Section 232/Tech Restrictions";

#[derive(Debug, Error)]
pub enum TradeRuleError {
    #[error("trade rule '{label}' must set exactly one of `country` or `product_types`")]
    InvalidPredicate { label: String },
    #[error("trade rule label must not be empty")]
    EmptyLabel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulePredicate {
    CountryIs(String),
    ProductTypeIn(Vec<String>),
}

impl RulePredicate {
    fn matches(&self, country: Option<&str>, product_type: Option<&str>) -> bool {
        match self {
            RulePredicate::CountryIs(expected) => country == Some(expected.as_str()),
            RulePredicate::ProductTypeIn(types) => {
                product_type.is_some_and(|value| types.iter().any(|t| t == value))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeListRule {
    pub predicate: RulePredicate,
    pub label: String,
}

/// A trade rule as written in a TOML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeListRuleEntry {
    pub label: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product_types: Option<Vec<String>>,
}

impl TryFrom<TradeListRuleEntry> for TradeListRule {
    type Error = TradeRuleError;

    fn try_from(entry: TradeListRuleEntry) -> Result<Self, Self::Error> {
        if entry.label.trim().is_empty() {
            return Err(TradeRuleError::EmptyLabel);
        }

        let predicate = match (entry.country, entry.product_types) {
            (Some(country), None) => RulePredicate::CountryIs(country),
            (None, Some(types)) if !types.is_empty() => RulePredicate::ProductTypeIn(types),
            _ => {
                return Err(TradeRuleError::InvalidPredicate { label: entry.label });
            }
        };

        Ok(Self {
            predicate,
            label: entry.label,
        })
    }
}

/// Ordered rule table. Every matching rule contributes its label, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeListRules {
    rules: Vec<TradeListRule>,
}

impl TradeListRules {
    pub fn new(rules: Vec<TradeListRule>) -> Self {
        Self { rules }
    }

    pub fn from_entries(entries: Vec<TradeListRuleEntry>) -> Result<Self, TradeRuleError> {
        let rules = entries
            .into_iter()
            .map(TradeListRule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[TradeListRule] {
        &self.rules
    }

    pub fn classify(&self, country: Option<&str>, product_type: Option<&str>) -> String {
        let labels: Vec<&str> = self
            .rules
            .iter()
            .filter(|rule| rule.predicate.matches(country, product_type))
            .map(|rule| rule.label.as_str())
            .collect();

        if labels.is_empty() {
            STANDARD_STATUS.to_string()
        } else {
            labels.join(LABEL_SEPARATOR)
        }
    }
}

impl Default for TradeListRules {
    fn default() -> Self {
        Self::new(vec![
            TradeListRule {
                predicate: RulePredicate::CountryIs("China".to_string()),
                label: SECTION_301.to_string(),
            },
            TradeListRule {
                predicate: RulePredicate::ProductTypeIn(vec![
                    "Automobiles".to_string(),
                    "Electronics".to_string(),
                ]),
                label: SECTION_232_TECH.to_string(),
            },
        ])
    }
}

pub fn apply_trade_list_classification(
    df: &DataFrame,
    rules: &TradeListRules,
) -> Result<DataFrame, PolarsError> {
    let countries = df.column(COUNTRY)?.str()?;
    let product_types = df.column(PRODUCT_TYPE)?.str()?;

    let statuses: Vec<String> = countries
        .into_iter()
        .zip(product_types.into_iter())
        .map(|(country, product_type)| rules.classify(country, product_type))
        .collect();

    let mut output = df.clone();
    output.hstack_mut(&mut [Series::new(TRADE_LIST_STATUS.into(), statuses).into()])?;

    Ok(output)
}
