//! Multi-station grouping, filtering and hour-window tests

use super::*;
use crate::config::AirqConfig;
use crate::error::Result;
use crate::models::{HourWindow, MadridRecord, RawRecord, SourceFormat, StatisticKind};
use crate::processor::StatsProcessor;

#[test]
fn test_stations_keep_first_seen_order() {
    let records = vec![
        madrid(0, "28079008", &[(5.0, "V")]),
        madrid(1, "28079004", &[(7.0, "V")]),
        madrid(2, "28079008", &[(9.0, "V")]),
        madrid(3, "28079035", &[(1.0, "V")]),
    ];

    let output = StatsProcessor::new(AirqConfig::new(SourceFormat::Madrid))
        .unwrap()
        .process_records(records)
        .unwrap();

    assert_eq!(
        output.table.stations,
        vec!["28079008", "28079004", "28079035"]
    );
    assert_eq!(output.groups.get("28079008").unwrap().readings, vec![5.0, 9.0]);
}

#[test]
fn test_readings_pooled_across_rows() {
    let records = vec![
        madrid(0, "S1", &[(10.0, "V"), (20.0, "V")]),
        madrid(1, "S2", &[(100.0, "V")]),
        madrid(2, "S1", &[(30.0, "V"), (40.0, "N")]),
    ];

    let output = StatsProcessor::new(AirqConfig::new(SourceFormat::Madrid))
        .unwrap()
        .process_records(records)
        .unwrap();

    // Pooled, not averaged per row: (10 + 20 + 30) / 3
    assert_close(output.table.get("S1", StatisticKind::Mean).unwrap(), 20.0);
    assert_close(output.table.get("S2", StatisticKind::Quantile99).unwrap(), 100.0);
}

#[test]
fn test_madrid_pollutant_filter() {
    let with_pollutant = |row: usize, station: &str, code: Option<&str>, value: f64| -> Result<RawRecord> {
        let mut record = MadridRecord::new(
            row,
            station,
            std::iter::once(value).chain(std::iter::repeat(0.0).take(23)).collect(),
            std::iter::once("V".to_string())
                .chain(std::iter::repeat("N".to_string()).take(23))
                .collect(),
        );
        if let Some(code) = code {
            record = record.with_pollutant(code);
        }
        Ok(RawRecord::Madrid(record))
    };

    let records = vec![
        with_pollutant(0, "S1", Some("8"), 40.0),
        with_pollutant(1, "S1", Some("1"), 900.0),
        with_pollutant(2, "S2", Some("10"), 15.0),
        with_pollutant(3, "S1", None, 700.0),
        with_pollutant(4, "S1", Some(" 8 "), 60.0),
    ];

    let output = StatsProcessor::new(AirqConfig::new(SourceFormat::Madrid).with_pollutant("8"))
        .unwrap()
        .process_records(records)
        .unwrap();

    assert_eq!(output.table.stations, vec!["S1"]);
    assert_eq!(output.groups.get("S1").unwrap().readings, vec![40.0, 60.0]);
    assert_eq!(output.stats.records_discarded, 3);
}

#[test]
fn test_eea_pollutant_filter() {
    let mut pm10 = match eea(1, "ES2", 80.0, 1).unwrap() {
        RawRecord::Eea(record) => record,
        other => panic!("Expected EEA record, got {:?}", other),
    };
    pm10.pollutant = "PM10".to_string();

    let records = vec![
        eea(0, "ES1", 12.0, 1),
        Ok(RawRecord::Eea(pm10)),
        eea(2, "ES1", 18.0, 1),
    ];

    let output = StatsProcessor::new(AirqConfig::new(SourceFormat::Eea).with_pollutant("NO2"))
        .unwrap()
        .process_records(records)
        .unwrap();

    assert_eq!(output.table.stations, vec!["ES1"]);
    assert_eq!(output.table.get("ES1", StatisticKind::Max), Some(18.0));
    assert_eq!(output.stats.records_discarded, 1);
}

#[test]
fn test_night_and_day_windows() {
    // Hour h carries the value h, all flagged valid
    let hours: Vec<(f64, &str)> = (1..=24).map(|h| (h as f64, "V")).collect();
    let run = |window: HourWindow| {
        StatsProcessor::new(AirqConfig::new(SourceFormat::Madrid).with_hour_window(window))
            .unwrap()
            .process_records(vec![madrid(0, "S1", &hours)])
            .unwrap()
    };

    let night = run(HourWindow::Night);
    let night_readings: Vec<f64> = (1..=12).chain(23..=24).map(|h| h as f64).collect();
    assert_eq!(night.groups.get("S1").unwrap().readings, night_readings);
    assert_eq!(night.table.get("S1", StatisticKind::Max), Some(24.0));

    let day = run(HourWindow::Day);
    let day_readings: Vec<f64> = (13..=22).map(|h| h as f64).collect();
    assert_eq!(day.groups.get("S1").unwrap().readings, day_readings);
    assert_close(day.table.get("S1", StatisticKind::Mean).unwrap(), 17.5);
    assert_eq!(day.stats.valid_readings, 10);
    assert_eq!(day.stats.invalid_readings, 0);

    let all = run(HourWindow::All);
    assert_eq!(all.stats.valid_readings, 24);
}

#[test]
fn test_selected_statistics_only() {
    let output = StatsProcessor::new(
        AirqConfig::new(SourceFormat::Madrid)
            .with_statistics(vec![StatisticKind::Max, StatisticKind::Mean]),
    )
    .unwrap()
    .process_records(vec![madrid(0, "S1", &[(4.0, "V"), (8.0, "V")])])
    .unwrap();

    let kinds: Vec<StatisticKind> = output.table.columns.iter().map(|(k, _)| *k).collect();
    assert_eq!(kinds, vec![StatisticKind::Max, StatisticKind::Mean]);
    assert!(output.table.column(StatisticKind::Quantile99).is_none());
    assert_close(output.table.get("S1", StatisticKind::Mean).unwrap(), 6.0);
}

#[test]
fn test_pollutant_codes_recorded() {
    let with_code = |row: usize, code: &str, value: f64| -> Result<RawRecord> {
        let mut record = MadridRecord::new(row, "S1", vec![value; 24], vec!["V".to_string(); 24]);
        record = record.with_pollutant(code);
        Ok(RawRecord::Madrid(record))
    };
    let records = || vec![with_code(0, "8", 40.0), with_code(1, "10", 15.0), with_code(2, "8", 60.0)];

    // Without a filter every code is pooled into the station group
    let pooled = StatsProcessor::new(AirqConfig::new(SourceFormat::Madrid))
        .unwrap()
        .process_records(records())
        .unwrap();
    assert_eq!(pooled.stats.pollutant_codes, vec!["8", "10"]);
    assert_eq!(pooled.groups.get("S1").unwrap().readings.len(), 72);

    let filtered = StatsProcessor::new(AirqConfig::new(SourceFormat::Madrid).with_pollutant("10"))
        .unwrap()
        .process_records(records())
        .unwrap();
    assert_eq!(filtered.stats.pollutant_codes, vec!["8", "10"]);
    assert_eq!(filtered.table.get("S1", StatisticKind::Max), Some(15.0));

    let eea_output = StatsProcessor::new(AirqConfig::new(SourceFormat::Eea))
        .unwrap()
        .process_records(vec![eea(0, "ES1", 1.0, 1), eea(1, "ES1", 2.0, 1)])
        .unwrap();
    assert_eq!(eea_output.stats.pollutant_codes, vec!["NO2"]);
}
