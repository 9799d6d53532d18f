use polars::prelude::*;
use tariff_parser::schema::{
    PRICE_AFTER, PRICE_BEFORE, PRICE_DELTA_PCT, PRICE_ELASTICITY, REVENUE_AFTER, REVENUE_BEFORE,
    REVENUE_LOSS, UNITS_AFTER, UNITS_BEFORE, VOLUME_DELTA_PCT, VOLUME_DRIVEN_REVENUE_LOSS,
};

/// Prices and volumes observed for one product/country before and after a tariff.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceVolume {
    pub price_before: Option<f64>,
    pub price_after: Option<f64>,
    pub units_before: Option<f64>,
    pub units_after: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EconomicFields {
    pub price_delta_pct: Option<f64>,
    pub volume_delta_pct: Option<f64>,
    pub price_elasticity: Option<f64>,
    pub revenue_before: Option<f64>,
    pub revenue_after: Option<f64>,
    pub revenue_loss: Option<f64>,
    pub volume_driven_revenue_loss: Option<f64>,
}

/// Appends the seven derived economic columns, computed independently per row.
pub fn apply_economic_derivation(df: &DataFrame) -> Result<DataFrame, PolarsError> {
    let len = df.height();

    let price_before = df.column(PRICE_BEFORE)?.f64()?;
    let price_after = df.column(PRICE_AFTER)?.f64()?;
    let units_before = df.column(UNITS_BEFORE)?.f64()?;
    let units_after = df.column(UNITS_AFTER)?.f64()?;

    let mut price_delta = Vec::with_capacity(len);
    let mut volume_delta = Vec::with_capacity(len);
    let mut elasticity = Vec::with_capacity(len);
    let mut revenue_before = Vec::with_capacity(len);
    let mut revenue_after = Vec::with_capacity(len);
    let mut revenue_loss = Vec::with_capacity(len);
    let mut volume_driven = Vec::with_capacity(len);

    for idx in 0..len {
        let fields = derive_row(PriceVolume {
            price_before: price_before.get(idx),
            price_after: price_after.get(idx),
            units_before: units_before.get(idx),
            units_after: units_after.get(idx),
        });

        price_delta.push(fields.price_delta_pct);
        volume_delta.push(fields.volume_delta_pct);
        elasticity.push(fields.price_elasticity);
        revenue_before.push(fields.revenue_before);
        revenue_after.push(fields.revenue_after);
        revenue_loss.push(fields.revenue_loss);
        volume_driven.push(fields.volume_driven_revenue_loss);
    }

    let mut output = df.clone();
    output.hstack_mut(&mut [
        Series::new(PRICE_DELTA_PCT.into(), price_delta).into(),
        Series::new(VOLUME_DELTA_PCT.into(), volume_delta).into(),
        Series::new(PRICE_ELASTICITY.into(), elasticity).into(),
        Series::new(REVENUE_BEFORE.into(), revenue_before).into(),
        Series::new(REVENUE_AFTER.into(), revenue_after).into(),
        Series::new(REVENUE_LOSS.into(), revenue_loss).into(),
        Series::new(VOLUME_DRIVEN_REVENUE_LOSS.into(), volume_driven).into(),
    ])?;

    Ok(output)
}

/// Derives the economic fields for a single row. Never fails: a zero base yields `None`.
pub fn derive_row(input: PriceVolume) -> EconomicFields {
    let PriceVolume {
        price_before,
        price_after,
        units_before,
        units_after,
    } = input;

    // A zero price change is treated as undefined so elasticity can never divide by zero.
    let price_delta_pct = pct_change(price_before, price_after).filter(|delta| *delta != 0.0);
    let volume_delta_pct = pct_change(units_before, units_after);

    let price_elasticity = match (volume_delta_pct, price_delta_pct) {
        (Some(volume), Some(price)) => finite(volume / price),
        _ => None,
    };

    let revenue_before = product(units_before, price_before);
    let revenue_after = product(units_after, price_after);
    let revenue_loss = match (revenue_before, revenue_after) {
        (Some(before), Some(after)) => Some(before - after),
        _ => None,
    };

    let volume_driven_revenue_loss = match (units_before, units_after, price_after) {
        (Some(before), Some(after), Some(price)) => Some((before - after) * price),
        _ => None,
    };

    EconomicFields {
        price_delta_pct,
        volume_delta_pct,
        price_elasticity,
        revenue_before,
        revenue_after,
        revenue_loss,
        volume_driven_revenue_loss,
    }
}

fn pct_change(before: Option<f64>, after: Option<f64>) -> Option<f64> {
    match (before, after) {
        (Some(before), Some(after)) if before != 0.0 => finite((after - before) / before),
        _ => None,
    }
}

fn product(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a * b),
        _ => None,
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
