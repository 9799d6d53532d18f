use polars::prelude::*;
use tariff_core::macro_indicators::{join_macro_indicators, MacroIndicators, MacroReference};
use tariff_core::summary::summarize;
use tariff_core::trade_list::{apply_trade_list_classification, TradeListRules};

fn countries() -> DataFrame {
    df!(
        "country" => &[Some("USA"), Some("Narnia"), None, Some("China")],
        "product_type" => &[Some("Furniture"), Some("Electronics"), Some("Toys"), Some("Toys")],
    )
    .unwrap()
}

#[test]
fn builtin_reference_joins_known_countries() -> PolarsResult<()> {
    let df = join_macro_indicators(&countries(), &MacroReference::builtin())?;

    let gdp = df.column("GDP_Trillions")?.f64()?;
    let cpi = df.column("CPI_Pct")?.f64()?;

    assert_eq!(gdp.get(0), Some(25.4));
    assert_eq!(cpi.get(0), Some(3.2));
    assert_eq!(gdp.get(1), None);
    assert_eq!(cpi.get(1), None);
    assert_eq!(gdp.get(2), None);
    assert_eq!(gdp.get(3), Some(17.9));

    Ok(())
}

#[test]
fn injected_reference_replaces_builtin_values() -> PolarsResult<()> {
    let reference = MacroReference::new(
        "test-fixture",
        vec![(
            "Narnia".to_string(),
            MacroIndicators {
                gdp_trillions: 0.01,
                cpi_pct: 99.0,
            },
        )],
    )
    .expect("valid reference");

    let df = join_macro_indicators(&countries(), &reference)?;
    let gdp = df.column("GDP_Trillions")?.f64()?;

    assert_eq!(gdp.get(0), None);
    assert_eq!(gdp.get(1), Some(0.01));

    Ok(())
}

#[test]
fn summary_lists_each_unmatched_country_once() -> PolarsResult<()> {
    let mut events = countries();
    events.vstack_mut(&countries())?;
    let events = events.hstack(&[
        Series::new("Price_Elasticity_of_Demand".into(), vec![Some(-0.5f64); 8]).into(),
        Series::new("Revenue_Loss".into(), vec![Some(10.0f64); 8]).into(),
        Series::new("Volume_Driven_Revenue_Loss".into(), vec![Some(4.0f64); 8]).into(),
    ])?;

    let joined = join_macro_indicators(&events, &MacroReference::builtin())?;
    let classified = apply_trade_list_classification(&joined, &TradeListRules::default())?;
    let summary = summarize(&classified)?;

    assert_eq!(summary.unmatched_countries, vec!["Narnia".to_string()]);
    assert_eq!(summary.total_revenue_loss, 80.0);
    assert_eq!(summary.total_volume_driven_revenue_loss, 32.0);
    assert_eq!(summary.mean_elasticity, Some(-0.5));
    assert_eq!(summary.trade_list_counts.get("Section 301"), Some(&2));
    assert_eq!(summary.trade_list_counts.get("Standard"), Some(&4));

    Ok(())
}
