//! Station grouping of decoded readings
//!
//! Readings of the same station are concatenated in input order, never
//! averaged. Stations keep the order in which they were first seen.

use crate::models::{DecodedRow, ValidMeasurement};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Every valid reading of one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationGroup {
    pub station: String,
    pub readings: Vec<f64>,
}

impl StationGroup {
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

/// Ordered collection of station groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationGroups {
    groups: Vec<StationGroup>,
}

impl StationGroups {
    pub fn groups(&self) -> &[StationGroup] {
        &self.groups
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StationGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, station: &str) -> Option<&StationGroup> {
        self.groups.iter().find(|g| g.station == station)
    }

    pub fn stations(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.station.clone()).collect()
    }

    pub fn total_readings(&self) -> usize {
        self.groups.iter().map(|g| g.readings.len()).sum()
    }

    /// Stations present in the input that ended up with no valid reading
    pub fn empty_stations(&self) -> usize {
        self.groups.iter().filter(|g| g.is_empty()).count()
    }
}

impl<'a> IntoIterator for &'a StationGroups {
    type Item = &'a StationGroup;
    type IntoIter = std::slice::Iter<'a, StationGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Accumulates readings per station
#[derive(Debug, Default)]
pub struct StationGrouper {
    index: HashMap<String, usize>,
    groups: Vec<StationGroup>,
}

impl StationGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a station appears in the output, even without readings
    pub fn register_station(&mut self, station: &str) -> usize {
        if let Some(&position) = self.index.get(station) {
            return position;
        }

        let position = self.groups.len();
        self.index.insert(station.to_string(), position);
        self.groups.push(StationGroup {
            station: station.to_string(),
            readings: Vec::new(),
        });
        position
    }

    pub fn add_readings(&mut self, station: &str, readings: &[f64]) {
        let position = self.register_station(station);
        self.groups[position].readings.extend_from_slice(readings);
    }

    pub fn add_decoded_row(&mut self, row: &DecodedRow) {
        self.add_readings(&row.station, &row.valid_readings);
    }

    pub fn add_measurement(&mut self, measurement: &ValidMeasurement) {
        self.add_readings(&measurement.station, &[measurement.concentration]);
    }

    pub fn finish(self) -> StationGroups {
        StationGroups {
            groups: self.groups,
        }
    }

    /// Group decoded Madrid rows
    pub fn group_decoded_rows<'a>(rows: impl IntoIterator<Item = &'a DecodedRow>) -> StationGroups {
        let mut grouper = Self::new();
        for row in rows {
            grouper.add_decoded_row(row);
        }
        grouper.finish()
    }

    /// Group EEA measurements
    pub fn group_measurements<'a>(
        measurements: impl IntoIterator<Item = &'a ValidMeasurement>,
    ) -> StationGroups {
        let mut grouper = Self::new();
        for measurement in measurements {
            grouper.add_measurement(measurement);
        }
        grouper.finish()
    }
}
