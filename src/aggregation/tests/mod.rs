//! Tests for station grouping and statistic aggregation

mod grouper_tests;

use crate::models::DecodedRow;

pub fn decoded_row(row: usize, station: &str, valid_readings: &[f64], invalid_count: usize) -> DecodedRow {
    DecodedRow {
        row,
        station: station.to_string(),
        valid_readings: valid_readings.to_vec(),
        invalid_count,
        rejected_count: 0,
    }
}

/// Assert two floats match within a small tolerance
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
