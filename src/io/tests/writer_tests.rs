//! Tests for result table output

use crate::error::AirqError;
use crate::io::loader::read_csv;
use crate::io::writer::{OutputFormat, write_table};
use crate::models::{StatisticKind, StatisticTable};
use polars::prelude::{ParquetReader, SerReader};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use tempfile::TempDir;

fn sample_table() -> StatisticTable {
    StatisticTable {
        stations: vec!["S1".to_string(), "S2".to_string()],
        columns: vec![
            (StatisticKind::Mean, vec![20.0, f64::NAN]),
            (StatisticKind::Max, vec![30.0, f64::NAN]),
            (StatisticKind::Quantile99, vec![29.8, f64::NAN]),
        ],
    }
}

#[test]
fn test_output_format_from_path() {
    assert_eq!(OutputFormat::from_path(Path::new("out.parquet")), OutputFormat::Parquet);
    assert_eq!(OutputFormat::from_path(Path::new("out.PQ")), OutputFormat::Parquet);
    assert_eq!(OutputFormat::from_path(Path::new("out.csv")), OutputFormat::Csv);
    assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Csv);
}

#[test]
fn test_output_format_from_str() {
    assert_eq!(OutputFormat::from_str("CSV").unwrap(), OutputFormat::Csv);
    assert_eq!(OutputFormat::from_str("parquet").unwrap(), OutputFormat::Parquet);
    assert!(matches!(
        OutputFormat::from_str("xlsx").unwrap_err(),
        AirqError::InvalidOption { .. }
    ));
}

#[test]
fn test_write_csv_creates_parent_dirs() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("results").join("2023").join("no2.csv");

    write_table(&sample_table(), &path, OutputFormat::Csv).unwrap();

    let df = read_csv(&path, b',').unwrap();
    let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(
        names,
        vec!["stations", "mean_valid_year", "max_valid", "quant99_valid"]
    );
    assert_eq!(df.height(), 2);

    let stations = df.column("stations").unwrap().str().unwrap();
    assert_eq!(stations.get(1), Some("S2"));
    let max = df.column("max_valid").unwrap().str().unwrap();
    assert_eq!(max.get(0).map(|v| v.parse::<f64>().unwrap()), Some(30.0));
}

#[test]
fn test_write_parquet_keeps_nan() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("no2.parquet");

    write_table(&sample_table(), &path, OutputFormat::Parquet).unwrap();

    let df = ParquetReader::new(File::open(&path).unwrap())
        .finish()
        .unwrap();
    assert_eq!(df.height(), 2);

    let mean = df.column("mean_valid_year").unwrap().f64().unwrap();
    assert_eq!(mean.get(0), Some(20.0));
    assert!(mean.get(1).unwrap().is_nan());
}

#[test]
fn test_write_empty_table() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.csv");
    let table = StatisticTable {
        stations: Vec::new(),
        columns: vec![(StatisticKind::Mean, Vec::new())],
    };

    write_table(&table, &path, OutputFormat::Csv).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.trim(), "stations,mean_valid_year");
}
