//! Column names and declared column types for raw and enriched tariff tables.

pub const COUNTRY: &str = "country";
pub const PRODUCT_TYPE: &str = "product_type";
pub const PRODUCT_NAME: &str = "product_name";
pub const DATE: &str = "date";
pub const PRICE_BEFORE: &str = "price_before_USD";
pub const PRICE_AFTER: &str = "price_after_USD";
pub const UNITS_BEFORE: &str = "units_sold_before";
pub const UNITS_AFTER: &str = "units_sold_after";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

pub const PRICE_DELTA_PCT: &str = "Price_Delta_Pct";
pub const VOLUME_DELTA_PCT: &str = "Volume_Delta_Pct";
pub const PRICE_ELASTICITY: &str = "Price_Elasticity_of_Demand";
pub const REVENUE_BEFORE: &str = "Revenue_Before";
pub const REVENUE_AFTER: &str = "Revenue_After";
pub const REVENUE_LOSS: &str = "Revenue_Loss";
pub const VOLUME_DRIVEN_REVENUE_LOSS: &str = "Volume_Driven_Revenue_Loss";
pub const GDP_TRILLIONS: &str = "GDP_Trillions";
pub const CPI_PCT: &str = "CPI_Pct";
pub const TRADE_LIST_STATUS: &str = "Trade_List_Status";
pub const YEAR: &str = "Year";

pub const REQUIRED_INPUT_COLUMNS: [&str; 7] = [
    COUNTRY,
    PRODUCT_TYPE,
    PRICE_BEFORE,
    PRICE_AFTER,
    UNITS_BEFORE,
    UNITS_AFTER,
    DATE,
];

/// Derived columns in the order the pipeline appends them.
pub const ENRICHED_COLUMNS: [&str; 11] = [
    PRICE_DELTA_PCT,
    VOLUME_DELTA_PCT,
    PRICE_ELASTICITY,
    REVENUE_BEFORE,
    REVENUE_AFTER,
    REVENUE_LOSS,
    VOLUME_DRIVEN_REVENUE_LOSS,
    GDP_TRILLIONS,
    CPI_PCT,
    TRADE_LIST_STATUS,
    YEAR,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Decimal,
    Integer,
    /// Calendar date serialized as `YYYY-MM-DD`.
    IsoDate,
}

#[derive(Debug, Clone)]
pub struct TableSchema {
    pub required: Vec<&'static str>,
    pub typed: Vec<(&'static str, ColumnKind)>,
}

impl TableSchema {
    pub fn kind_of(&self, column: &str) -> ColumnKind {
        self.typed
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, kind)| *kind)
            .unwrap_or(ColumnKind::Text)
    }
}

const INPUT_DECIMALS: [&str; 6] = [
    PRICE_BEFORE,
    PRICE_AFTER,
    UNITS_BEFORE,
    UNITS_AFTER,
    LATITUDE,
    LONGITUDE,
];

/// Raw tariff events. `date` stays text; day-first parsing happens during enrichment.
pub fn input_schema() -> TableSchema {
    TableSchema {
        required: REQUIRED_INPUT_COLUMNS.to_vec(),
        typed: INPUT_DECIMALS
            .iter()
            .map(|name| (*name, ColumnKind::Decimal))
            .collect(),
    }
}

pub fn enriched_schema() -> TableSchema {
    let mut required = REQUIRED_INPUT_COLUMNS.to_vec();
    required.extend(ENRICHED_COLUMNS);

    let mut typed: Vec<(&'static str, ColumnKind)> = INPUT_DECIMALS
        .iter()
        .map(|name| (*name, ColumnKind::Decimal))
        .collect();
    typed.push((DATE, ColumnKind::IsoDate));
    typed.extend(
        ENRICHED_COLUMNS
            .iter()
            .filter(|name| **name != TRADE_LIST_STATUS && **name != YEAR)
            .map(|name| (*name, ColumnKind::Decimal)),
    );
    typed.push((YEAR, ColumnKind::Integer));

    TableSchema { required, typed }
}
