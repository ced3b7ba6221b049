//! Configuration management and validation.
//!
//! Provides the processing configuration, the hour-window table that maps
//! each window to the hours it covers, and the decode-error policy.

use crate::constants::{self, HOURS_PER_DAY};
use crate::error::{AirqError, Result};
use crate::models::{HourWindow, SourceFormat, StatisticKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Mapping from hour window to the 1-based hours it selects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourWindowTable {
    pub all: BTreeSet<usize>,
    pub night: BTreeSet<usize>,
    pub day: BTreeSet<usize>,
}

impl Default for HourWindowTable {
    fn default() -> Self {
        Self {
            all: hours_from_ranges(constants::hour_windows::ALL),
            night: hours_from_ranges(constants::hour_windows::NIGHT),
            day: hours_from_ranges(constants::hour_windows::DAY),
        }
    }
}

fn hours_from_ranges(ranges: &[(usize, usize)]) -> BTreeSet<usize> {
    ranges
        .iter()
        .flat_map(|&(start, end)| start..=end)
        .collect()
}

impl HourWindowTable {
    /// Build a table from inclusive hour ranges; every hour must lie in 1..=24
    pub fn from_ranges(
        night: &[(usize, usize)],
        day: &[(usize, usize)],
    ) -> Result<Self> {
        let table = Self {
            all: hours_from_ranges(constants::hour_windows::ALL),
            night: hours_from_ranges(night),
            day: hours_from_ranges(day),
        };
        table.validate()?;
        Ok(table)
    }

    /// Hours selected by `window`
    pub fn hours(&self, window: HourWindow) -> &BTreeSet<usize> {
        match window {
            HourWindow::All => &self.all,
            HourWindow::Night => &self.night,
            HourWindow::Day => &self.day,
        }
    }

    /// 24 booleans, index 0 = hour 1, telling whether each hour is selected
    pub fn mask(&self, window: HourWindow) -> [bool; HOURS_PER_DAY] {
        let mut mask = [false; HOURS_PER_DAY];
        for &hour in self.hours(window) {
            if (1..=HOURS_PER_DAY).contains(&hour) {
                mask[hour - 1] = true;
            }
        }
        mask
    }

    pub fn validate(&self) -> Result<()> {
        for (window, hours) in [
            (HourWindow::All, &self.all),
            (HourWindow::Night, &self.night),
            (HourWindow::Day, &self.day),
        ] {
            if let Some(bad) = hours.iter().find(|&&h| h == 0 || h > HOURS_PER_DAY) {
                return Err(AirqError::invalid_option(
                    format!("{} window hour", window),
                    bad.to_string(),
                    &["1..=24"],
                ));
            }
        }
        Ok(())
    }
}

/// What to do with a row that fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeErrorPolicy {
    /// Stop the batch at the first bad row
    Abort,
    /// Record the error and continue with the next row
    Skip,
}

/// Global configuration for air-quality processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirqConfig {
    pub format: SourceFormat,

    /// Hours of a Madrid row that take part in decoding
    pub hour_window: HourWindow,

    pub hour_windows: HourWindowTable,

    /// Station identifier column; defaults to the format's standard column when unset
    pub station_column: Option<String>,

    /// Keep only records of this pollutant code
    pub pollutant: Option<String>,

    /// Field separator of input files; defaults to the format's usual separator
    pub separator: Option<u8>,

    pub on_decode_error: DecodeErrorPolicy,

    /// Statistics to compute, in output column order
    pub statistics: Vec<StatisticKind>,

    /// Aggregate stations on blocking worker tasks
    pub parallel: bool,

    /// Number of concurrent aggregation workers
    pub workers: usize,
}

impl Default for AirqConfig {
    fn default() -> Self {
        Self {
            format: SourceFormat::Madrid,
            hour_window: HourWindow::All,
            hour_windows: HourWindowTable::default(),
            station_column: None,
            pollutant: None,
            separator: None,
            on_decode_error: DecodeErrorPolicy::Abort,
            statistics: StatisticKind::ALL.to_vec(),
            parallel: false,
            workers: num_cpus::get(),
        }
    }
}

impl AirqConfig {
    pub fn new(format: SourceFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub fn with_hour_window(mut self, window: HourWindow) -> Self {
        self.hour_window = window;
        self
    }

    pub fn with_hour_windows(mut self, table: HourWindowTable) -> Self {
        self.hour_windows = table;
        self
    }

    pub fn with_station_column(mut self, column: impl Into<String>) -> Self {
        self.station_column = Some(column.into());
        self
    }

    pub fn with_pollutant(mut self, pollutant: impl Into<String>) -> Self {
        self.pollutant = Some(pollutant.into());
        self
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = Some(separator);
        self
    }

    pub fn with_decode_error_policy(mut self, policy: DecodeErrorPolicy) -> Self {
        self.on_decode_error = policy;
        self
    }

    pub fn with_statistics(mut self, statistics: Vec<StatisticKind>) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn with_parallel(mut self, workers: usize) -> Self {
        self.parallel = true;
        self.workers = workers;
        self
    }

    /// Station identifier column for the configured format
    pub fn station_column(&self) -> &str {
        match (&self.station_column, self.format) {
            (Some(column), _) => column,
            (None, SourceFormat::Madrid) => constants::madrid::STATION,
            (None, SourceFormat::Eea) => constants::eea::STATION,
        }
    }

    pub fn separator(&self) -> u8 {
        self.separator
            .unwrap_or_else(|| self.format.default_separator())
    }

    /// Check options before any row is processed
    pub fn validate(&self) -> Result<()> {
        self.hour_windows.validate()?;

        if self.statistics.is_empty() {
            return Err(AirqError::invalid_option(
                "statistic",
                "<none>",
                &["mean", "max", "p99"],
            ));
        }

        if self.parallel && self.workers == 0 {
            return Err(AirqError::invalid_option("workers", "0", &[">= 1"]));
        }

        if self.format == SourceFormat::Eea && self.hour_window != HourWindow::All {
            debug!(
                "Hour window '{}' has no effect on EEA input",
                self.hour_window
            );
        }

        Ok(())
    }
}
