//! Tests for station grouping

use super::decoded_row;
use crate::aggregation::StationGrouper;
use crate::models::{DecodedRow, ValidMeasurement};
use chrono::{TimeZone, Utc};

#[test]
fn test_rows_of_same_station_are_concatenated() {
    let rows = vec![
        decoded_row(0, "S1", &[1.0, 2.0], 22),
        decoded_row(1, "S2", &[5.0], 23),
        decoded_row(2, "S1", &[3.0], 23),
    ];

    let groups = StationGrouper::group_decoded_rows(&rows);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups.get("S1").unwrap().readings, vec![1.0, 2.0, 3.0]);
    assert_eq!(groups.get("S2").unwrap().readings, vec![5.0]);
    assert_eq!(groups.total_readings(), 4);
}

#[test]
fn test_stations_keep_first_seen_order() {
    let rows = vec![
        decoded_row(0, "S9", &[1.0], 23),
        decoded_row(1, "S1", &[1.0], 23),
        decoded_row(2, "S9", &[1.0], 23),
        decoded_row(3, "S5", &[1.0], 23),
    ];

    let groups = StationGrouper::group_decoded_rows(&rows);

    assert_eq!(groups.stations(), vec!["S9", "S1", "S5"]);
}

#[test]
fn test_station_without_valid_readings_is_kept() {
    let rows = vec![
        decoded_row(0, "S1", &[4.0], 23),
        decoded_row(1, "S2", &[], 24),
        decoded_row(2, "S2", &[], 24),
    ];

    let groups = StationGrouper::group_decoded_rows(&rows);

    let empty = groups.get("S2").unwrap();
    assert!(empty.is_empty());
    assert_eq!(groups.empty_stations(), 1);
}

#[test]
fn test_registered_station_appears_without_readings() {
    let mut grouper = StationGrouper::new();
    grouper.register_station("A");
    grouper.add_readings("B", &[1.0]);
    grouper.add_readings("A", &[]);

    let groups = grouper.finish();

    assert_eq!(groups.stations(), vec!["A", "B"]);
    assert!(groups.get("A").unwrap().is_empty());
}

#[test]
fn test_group_measurements() {
    let timestamp = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let measurements: Vec<ValidMeasurement> = [("ES1", 10.0), ("ES2", 20.0), ("ES1", 30.0)]
        .iter()
        .enumerate()
        .map(|(row, (station, concentration))| ValidMeasurement {
            row,
            station: station.to_string(),
            pollutant: "NO2".to_string(),
            concentration: *concentration,
            timestamp,
        })
        .collect();

    let groups = StationGrouper::group_measurements(&measurements);

    assert_eq!(groups.stations(), vec!["ES1", "ES2"]);
    assert_eq!(groups.get("ES1").unwrap().readings, vec![10.0, 30.0]);
}

#[test]
fn test_empty_input() {
    let groups = StationGrouper::group_decoded_rows(&Vec::<DecodedRow>::new());

    assert!(groups.is_empty());
    assert_eq!(groups.total_readings(), 0);
}
