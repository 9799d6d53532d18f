use std::path::PathBuf;

use polars::prelude::*;

use crate::errors::LoadError;
use crate::schema::{PRICE_BEFORE, PRODUCT_TYPE, UNITS_BEFORE, UNITS_AFTER};
use crate::{load_enriched, load_events};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.as_str().to_string())
        .collect()
}

#[test]
fn loads_sample_with_typed_numeric_columns() {
    let df = load_events(&fixture("tariff_events_sample.csv")).expect("sample should load");

    assert_eq!(df.height(), 6);
    assert_eq!(
        column_names(&df),
        vec![
            "country",
            "product_type",
            "product_name",
            "date",
            "price_before_USD",
            "price_after_USD",
            "units_sold_before",
            "units_sold_after",
            "latitude",
            "longitude",
            "tariff_rate",
        ]
    );

    let price_before = df.column(PRICE_BEFORE).unwrap().f64().unwrap();
    assert_eq!(price_before.get(0), Some(200.0));
    assert_eq!(price_before.get(4), Some(0.0));

    let units_before = df.column(UNITS_BEFORE).unwrap().f64().unwrap();
    assert_eq!(units_before.get(5), Some(0.0));

    let latitude = df.column("latitude").unwrap().f64().unwrap();
    assert_eq!(latitude.get(4), None);
    assert_eq!(latitude.get(2), Some(37.09));
}

#[test]
fn dates_and_unknown_columns_stay_text() {
    let df = load_events(&fixture("tariff_events_sample.csv")).unwrap();

    let dates = df.column("date").unwrap().str().unwrap();
    assert_eq!(dates.get(0), Some("01/03/2021"));
    assert_eq!(dates.get(4), Some("2021-06-30"));

    let tariff_rate = df.column("tariff_rate").unwrap().str().unwrap();
    assert_eq!(tariff_rate.get(0), Some("0.25"));
    assert_eq!(tariff_rate.get(3), None);
}

#[test]
fn missing_file_is_reported_as_input_not_found() {
    let err = load_events(&fixture("does_not_exist.csv")).unwrap_err();
    assert!(matches!(err, LoadError::InputNotFound { .. }));
}

#[test]
fn missing_columns_are_all_named() {
    let err = load_events(&fixture("tariff_events_missing_columns.csv")).unwrap_err();
    let missing = err.missing_columns().expect("schema error expected");

    assert_eq!(
        missing,
        &[PRODUCT_TYPE.to_string(), UNITS_AFTER.to_string()]
    );
    assert!(err.to_string().contains("product_type"));
}

#[test]
fn non_numeric_cell_reports_row_and_column() {
    let err = load_events(&fixture("tariff_events_bad_number.csv")).unwrap_err();
    match err {
        LoadError::InvalidValue {
            column, row_index, ..
        } => {
            assert_eq!(column, UNITS_BEFORE);
            assert_eq!(row_index, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn header_only_file_loads_empty_table() {
    let df = load_events(&fixture("tariff_events_header_only.csv")).unwrap();
    assert_eq!(df.height(), 0);
    assert!(df.column(PRICE_BEFORE).is_ok());
}

#[test]
fn headers_are_trimmed_before_schema_check() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("padded.csv");
    std::fs::write(
        &path,
        " country , product_type,date,price_before_USD,price_after_USD,units_sold_before,units_sold_after\n\
         China,Electronics,01/03/2021,1,2,3,4\n",
    )
    .unwrap();

    let df = load_events(&path).unwrap();
    assert_eq!(
        df.column("country").unwrap().str().unwrap().get(0),
        Some("China")
    );
}

#[test]
fn repeated_header_names_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("repeated.csv");
    std::fs::write(
        &path,
        "country,product_type,date,price_before_USD,price_after_USD,units_sold_before,units_sold_after, country\n\
         China,Electronics,01/03/2021,1,2,3,4,China\n",
    )
    .unwrap();

    match load_events(&path).unwrap_err() {
        LoadError::DuplicateColumns { duplicated } => {
            assert_eq!(duplicated, vec!["country".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn enriched_reader_restores_dates_and_year() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("enriched.csv");
    std::fs::write(
        &path,
        "country,product_type,date,price_before_USD,price_after_USD,units_sold_before,units_sold_after,\
Price_Delta_Pct,Volume_Delta_Pct,Price_Elasticity_of_Demand,Revenue_Before,Revenue_After,Revenue_Loss,\
Volume_Driven_Revenue_Loss,GDP_Trillions,CPI_Pct,Trade_List_Status,Year\n\
Chile,Furniture,2021-11-05,80.0,80.0,50.0,45.0,,-0.1,,4000.0,3600.0,400.0,400.0,0.3,7.6,Standard,2021\n",
    )
    .unwrap();

    let df = load_enriched(&path).unwrap();

    assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
    assert_eq!(df.column("Year").unwrap().i32().unwrap().get(0), Some(2021));
    assert_eq!(
        df.column("Price_Delta_Pct").unwrap().f64().unwrap().get(0),
        None
    );
    assert_eq!(
        df.column("Trade_List_Status").unwrap().str().unwrap().get(0),
        Some("Standard")
    );
}

#[test]
fn enriched_reader_requires_derived_columns() {
    let err = load_enriched(&fixture("tariff_events_sample.csv")).unwrap_err();
    let missing = err.missing_columns().unwrap();
    assert!(missing.iter().any(|name| name == "Revenue_Loss"));
    assert!(missing.iter().any(|name| name == "Year"));
}
