use polars::prelude::*;
use tariff_core::economics::apply_economic_derivation;

fn df_with_prices() -> DataFrame {
    df!(
        "country" => &["China", "USA", "Chile", "Atlantis"],
        "price_before_USD" => &[Some(200.0f64), Some(150.0), Some(0.0), None],
        "price_after_USD" => &[Some(250.0f64), Some(165.0), Some(12.0), Some(10.0)],
        "units_sold_before" => &[Some(1000.0f64), Some(0.0), Some(300.0), Some(20.0)],
        "units_sold_after" => &[Some(800.0f64), Some(25.0), Some(290.0), Some(18.0)],
    )
    .unwrap()
}

#[test]
fn derivation_appends_columns_after_existing_ones() -> PolarsResult<()> {
    let df = apply_economic_derivation(&df_with_prices())?;

    let names: Vec<&str> = df
        .get_column_names()
        .iter()
        .map(|name| name.as_str())
        .collect();
    assert_eq!(
        &names[5..],
        &[
            "Price_Delta_Pct",
            "Volume_Delta_Pct",
            "Price_Elasticity_of_Demand",
            "Revenue_Before",
            "Revenue_After",
            "Revenue_Loss",
            "Volume_Driven_Revenue_Loss",
        ]
    );
    assert_eq!(df.height(), 4);

    Ok(())
}

#[test]
fn derivation_is_row_local_and_partial() -> PolarsResult<()> {
    let df = apply_economic_derivation(&df_with_prices())?;

    let price_delta = df.column("Price_Delta_Pct")?.f64()?;
    let volume_delta = df.column("Volume_Delta_Pct")?.f64()?;
    let elasticity = df.column("Price_Elasticity_of_Demand")?.f64()?;
    let revenue_before = df.column("Revenue_Before")?.f64()?;
    let revenue_after = df.column("Revenue_After")?.f64()?;
    let volume_driven = df.column("Volume_Driven_Revenue_Loss")?.f64()?;

    assert!((elasticity.get(0).unwrap() + 0.8).abs() < 1e-12);

    // No sales before the tariff: volume change and elasticity undefined, revenue still computed.
    assert_eq!(volume_delta.get(1), None);
    assert_eq!(elasticity.get(1), None);
    assert_eq!(revenue_before.get(1), Some(0.0));
    assert_eq!(revenue_after.get(1), Some(4125.0));

    // Free before the tariff: price change undefined.
    assert_eq!(price_delta.get(2), None);
    assert_eq!(elasticity.get(2), None);
    assert_eq!(volume_driven.get(2), Some(120.0));

    // Blank price: everything that depends on it is null, the rest survives.
    assert_eq!(price_delta.get(3), None);
    assert_eq!(revenue_before.get(3), None);
    assert_eq!(revenue_after.get(3), Some(180.0));
    assert_eq!(volume_driven.get(3), Some(20.0));

    for value in elasticity.into_iter().flatten() {
        assert!(value.is_finite());
    }

    Ok(())
}

#[test]
fn derivation_requires_numeric_columns() {
    let df = df!(
        "price_before_USD" => &["200"],
        "price_after_USD" => &["250"],
        "units_sold_before" => &["10"],
        "units_sold_after" => &["8"],
    )
    .unwrap();

    assert!(apply_economic_derivation(&df).is_err());
}
