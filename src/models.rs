//! Core data structures and types for air-quality processing.
//!
//! Defines the source formats and selectors, the typed raw records of both
//! exports, decoded rows, station statistics and processing statistics.

use crate::aggregation::statistics;
use crate::constants::{self, HOURS_PER_DAY, MADRID_HOURLY_FIELDS};
use crate::error::{AirqError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Source export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Madrid open-data portal: one row per station and day, 24 value/flag pairs
    Madrid,
    /// European Environment Agency: one row per station and hour
    Eea,
}

impl SourceFormat {
    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Madrid => "madrid",
            SourceFormat::Eea => "eea",
        }
    }

    pub fn default_separator(&self) -> u8 {
        match self {
            SourceFormat::Madrid => constants::madrid::CSV_SEPARATOR,
            SourceFormat::Eea => constants::eea::CSV_SEPARATOR,
        }
    }
}

impl FromStr for SourceFormat {
    type Err = AirqError;

    /// Accepts the format names and the legacy numeric options (1 = Madrid, 2 = EEA)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "madrid" | "1" => Ok(SourceFormat::Madrid),
            "eea" | "2" => Ok(SourceFormat::Eea),
            other => Err(AirqError::invalid_option(
                "source format",
                other,
                &["madrid", "eea", "1", "2"],
            )),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which hours of a Madrid row take part in decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HourWindow {
    All,
    Night,
    Day,
}

impl HourWindow {
    pub fn name(&self) -> &'static str {
        match self {
            HourWindow::All => "all",
            HourWindow::Night => "night",
            HourWindow::Day => "day",
        }
    }
}

impl FromStr for HourWindow {
    type Err = AirqError;

    /// Accepts the window names and the legacy numeric options (1 = all, 2 = night, 3 = day)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "1" => Ok(HourWindow::All),
            "night" | "nighttime" | "2" => Ok(HourWindow::Night),
            "day" | "daytime" | "3" => Ok(HourWindow::Day),
            other => Err(AirqError::invalid_option(
                "hour window",
                other,
                &["all", "night", "day", "1", "2", "3"],
            )),
        }
    }
}

impl fmt::Display for HourWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-station statistics computed over valid readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatisticKind {
    Mean,
    Max,
    Quantile99,
}

impl StatisticKind {
    pub const ALL: [StatisticKind; 3] = [
        StatisticKind::Mean,
        StatisticKind::Max,
        StatisticKind::Quantile99,
    ];

    /// Column name in the output table
    pub fn column_name(&self) -> &'static str {
        match self {
            StatisticKind::Mean => constants::output::MEAN,
            StatisticKind::Max => constants::output::MAX,
            StatisticKind::Quantile99 => constants::output::QUANTILE_99,
        }
    }

    /// Compute this statistic over a reading collection (NaN when empty)
    pub fn compute(&self, readings: &[f64]) -> f64 {
        match self {
            StatisticKind::Mean => statistics::mean(readings),
            StatisticKind::Max => statistics::max(readings),
            StatisticKind::Quantile99 => {
                statistics::quantile(readings, constants::DEFAULT_QUANTILE)
            }
        }
    }
}

impl FromStr for StatisticKind {
    type Err = AirqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mean" | "mean_valid_year" => Ok(StatisticKind::Mean),
            "max" | "max_valid" => Ok(StatisticKind::Max),
            "p99" | "quantile99" | "percentile99" | "quant99_valid" => {
                Ok(StatisticKind::Quantile99)
            }
            other => Err(AirqError::invalid_option(
                "statistic",
                other,
                &["mean", "max", "p99"],
            )),
        }
    }
}

/// One row of the Madrid export, with value and flag sequences kept apart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MadridRecord {
    /// 0-based row index in the source table
    pub row: usize,
    pub station: String,
    pub pollutant: Option<String>,
    pub date: Option<NaiveDate>,
    /// Hourly values, hour 1 first
    pub values: Vec<f64>,
    /// Hourly flags, aligned with `values`
    pub flags: Vec<String>,
    /// Hours (1-based) whose value cell was not numeric, with the raw text;
    /// their slot in `values` holds NaN
    pub unparsed: Vec<(usize, String)>,
}

impl MadridRecord {
    pub fn new(row: usize, station: impl Into<String>, values: Vec<f64>, flags: Vec<String>) -> Self {
        Self {
            row,
            station: station.into(),
            pollutant: None,
            date: None,
            values,
            flags,
            unparsed: Vec::new(),
        }
    }

    /// Build a record from the 48 positional fields `value1, flag1, ..., value24, flag24`
    ///
    /// Only the field count is checked here. Non-numeric values are kept as
    /// unparsed cells and reported by the decoder if their hour is used.
    pub fn from_fields<S: AsRef<str>>(row: usize, station: impl Into<String>, fields: &[S]) -> Result<Self> {
        if fields.len() != MADRID_HOURLY_FIELDS {
            return Err(AirqError::Format {
                row,
                reason: format!(
                    "expected {} hourly fields, found {}",
                    MADRID_HOURLY_FIELDS,
                    fields.len()
                ),
            });
        }

        let mut values = Vec::with_capacity(HOURS_PER_DAY);
        let mut flags = Vec::with_capacity(HOURS_PER_DAY);
        let mut unparsed = Vec::new();

        for (hour_index, pair) in fields.chunks_exact(2).enumerate() {
            let raw_value = pair[0].as_ref().trim();
            match raw_value.parse::<f64>() {
                Ok(value) => values.push(value),
                Err(_) => {
                    values.push(f64::NAN);
                    unparsed.push((hour_index + 1, raw_value.to_string()));
                }
            }
            flags.push(pair[1].as_ref().to_string());
        }

        let mut record = Self::new(row, station, values, flags);
        record.unparsed = unparsed;
        Ok(record)
    }

    /// Raw text of `hour` (1-based) when its value cell was not numeric
    pub fn unparsed_value(&self, hour: usize) -> Option<&str> {
        self.unparsed
            .iter()
            .find(|(h, _)| *h == hour)
            .map(|(_, raw)| raw.as_str())
    }

    pub fn with_pollutant(mut self, pollutant: impl Into<String>) -> Self {
        self.pollutant = Some(pollutant.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// One row of the EEA export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EeaRecord {
    pub row: usize,
    /// Raw `DatetimeBegin` text, parsed during decoding
    pub timestamp: String,
    pub pollutant: String,
    pub station: String,
    pub concentration: Option<f64>,
    pub validity: i64,
}

/// A typed source record of either export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawRecord {
    Madrid(MadridRecord),
    Eea(EeaRecord),
}

impl RawRecord {
    pub fn row(&self) -> usize {
        match self {
            RawRecord::Madrid(record) => record.row,
            RawRecord::Eea(record) => record.row,
        }
    }

    pub fn station(&self) -> &str {
        match self {
            RawRecord::Madrid(record) => &record.station,
            RawRecord::Eea(record) => &record.station,
        }
    }

    pub fn format(&self) -> SourceFormat {
        match self {
            RawRecord::Madrid(_) => SourceFormat::Madrid,
            RawRecord::Eea(_) => SourceFormat::Eea,
        }
    }

    /// Trimmed pollutant code, if the record carries a non-empty one
    pub fn pollutant(&self) -> Option<&str> {
        let code = match self {
            RawRecord::Madrid(record) => record.pollutant.as_deref(),
            RawRecord::Eea(record) => Some(record.pollutant.as_str()),
        };
        code.map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Outcome of decoding one Madrid row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedRow {
    pub row: usize,
    pub station: String,
    /// Strictly positive readings of hours flagged valid, in hour order
    pub valid_readings: Vec<f64>,
    /// Hours flagged invalid
    pub invalid_count: usize,
    /// Hours flagged valid whose value was not strictly positive
    pub rejected_count: usize,
}

impl DecodedRow {
    /// Number of hours this row was decoded over
    pub fn hours_decoded(&self) -> usize {
        self.valid_readings.len() + self.invalid_count + self.rejected_count
    }

    pub fn valid_count(&self) -> usize {
        self.valid_readings.len()
    }

    pub fn daily_mean(&self) -> f64 {
        statistics::mean(&self.valid_readings)
    }

    pub fn daily_max(&self) -> f64 {
        statistics::max(&self.valid_readings)
    }

    pub fn daily_quantile(&self, q: f64) -> f64 {
        statistics::quantile(&self.valid_readings, q)
    }
}

/// A valid EEA measurement with its parsed timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidMeasurement {
    pub row: usize,
    pub station: String,
    pub pollutant: String,
    pub concentration: f64,
    pub timestamp: DateTime<Utc>,
}

/// One statistic for one station; NaN when the station had no valid readings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationStatistic {
    pub station: String,
    pub kind: StatisticKind,
    pub value: f64,
}

impl StationStatistic {
    pub fn is_undefined(&self) -> bool {
        self.value.is_nan()
    }
}

/// Per-station result table, one row per station in first-seen order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticTable {
    pub stations: Vec<String>,
    /// One column per requested statistic, each aligned with `stations`
    pub columns: Vec<(StatisticKind, Vec<f64>)>,
}

impl StatisticTable {
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn column(&self, kind: StatisticKind) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, values)| values.as_slice())
    }

    /// Look up one statistic for one station
    pub fn get(&self, station: &str, kind: StatisticKind) -> Option<f64> {
        let index = self.stations.iter().position(|s| s == station)?;
        self.column(kind).and_then(|values| values.get(index).copied())
    }

    /// Flatten into per-station statistics of one kind
    pub fn statistics(&self, kind: StatisticKind) -> Vec<StationStatistic> {
        self.column(kind)
            .map(|values| {
                self.stations
                    .iter()
                    .zip(values)
                    .map(|(station, value)| StationStatistic {
                        station: station.clone(),
                        kind,
                        value: *value,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Convert into a polars DataFrame keyed by the `stations` column
    pub fn to_dataframe(&self) -> Result<polars::prelude::DataFrame> {
        use polars::prelude::{Column, DataFrame};

        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::new(
            constants::output::STATIONS.into(),
            self.stations.clone(),
        ));
        for (kind, values) in &self.columns {
            columns.push(Column::new(kind.column_name().into(), values.clone()));
        }

        Ok(DataFrame::new(columns)?)
    }
}

/// Processing statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub format: Option<SourceFormat>,
    pub rows_read: usize,
    pub rows_decoded: usize,
    pub rows_skipped: usize,
    /// EEA records dropped because their validity was not 1 or their pollutant was filtered
    pub records_discarded: usize,
    pub valid_readings: usize,
    pub invalid_readings: usize,
    pub rejected_readings: usize,
    pub stations: usize,
    pub stations_without_readings: usize,
    /// Distinct pollutant codes seen in the input, first-seen order
    pub pollutant_codes: Vec<String>,
    pub error_messages: Vec<String>,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    pub fn new(format: SourceFormat) -> Self {
        Self {
            format: Some(format),
            ..Default::default()
        }
    }

    pub fn add_pollutant(&mut self, code: &str) {
        if !self.pollutant_codes.iter().any(|c| c == code) {
            self.pollutant_codes.push(code.to_string());
        }
    }

    pub fn add_skipped(&mut self, message: String) {
        self.rows_skipped += 1;
        self.error_messages.push(message);
    }

    /// Share of decoded hourly outcomes that were valid, as a percentage
    pub fn valid_rate(&self) -> f64 {
        let total = self.valid_readings + self.invalid_readings + self.rejected_readings;
        if total == 0 {
            0.0
        } else {
            (self.valid_readings as f64 / total as f64) * 100.0
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Processing Summary: {} rows -> {} decoded, {} skipped, {} discarded | \
             {} valid / {} invalid / {} rejected readings ({:.1}% valid) | \
             {} stations ({} without readings)",
            self.rows_read,
            self.rows_decoded,
            self.rows_skipped,
            self.records_discarded,
            self.valid_readings,
            self.invalid_readings,
            self.rejected_readings,
            self.valid_rate(),
            self.stations,
            self.stations_without_readings
        )
    }
}
