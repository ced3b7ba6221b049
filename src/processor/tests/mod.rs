//! Integration tests for the processor module
//!
//! Tests the complete decode, group and aggregate pipeline on in-memory
//! records and small export files.

pub mod multi_station;

use crate::models::{EeaRecord, MadridRecord, RawRecord};
use crate::error::Result;

/// Madrid record from (value, flag) pairs; missing hours are `(0, "N")`
pub fn madrid(row: usize, station: &str, hours: &[(f64, &str)]) -> Result<RawRecord> {
    let values = (0..24)
        .map(|h| hours.get(h).map(|(v, _)| *v).unwrap_or(0.0))
        .collect();
    let flags = (0..24)
        .map(|h| hours.get(h).map(|(_, f)| f.to_string()).unwrap_or_else(|| "N".to_string()))
        .collect();
    Ok(RawRecord::Madrid(MadridRecord::new(row, station, values, flags)))
}

pub fn eea(row: usize, station: &str, concentration: f64, validity: i64) -> Result<RawRecord> {
    Ok(RawRecord::Eea(EeaRecord {
        row,
        timestamp: format!("2023-01-01 {:02}:00:00", row % 24),
        pollutant: "NO2".to_string(),
        station: station.to_string(),
        concentration: Some(concentration),
        validity,
    }))
}

/// Madrid rows holding the readings 1..=100 for one station, 24 per row
pub fn one_to_hundred_rows(first_row: usize, station: &str) -> Vec<Result<RawRecord>> {
    let readings: Vec<f64> = (1..=100).map(|v| v as f64).collect();
    readings
        .chunks(24)
        .enumerate()
        .map(|(i, chunk)| {
            let hours: Vec<(f64, &str)> = chunk.iter().map(|v| (*v, "V")).collect();
            madrid(first_row + i, station, &hours)
        })
        .collect()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
