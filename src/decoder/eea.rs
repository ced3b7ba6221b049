//! Validity filtering for EEA export records
//!
//! EEA rows carry an explicit validity code, so there is nothing to count:
//! a record is either kept as a [`ValidMeasurement`] or dropped.

use crate::constants::{
    EEA_DATE_FORMAT, EEA_NAIVE_DATETIME_FORMATS, EEA_OFFSET_DATETIME_FORMATS, eea,
};
use crate::error::{AirqError, Result};
use crate::models::{EeaRecord, ValidMeasurement};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

#[derive(Debug, Clone, Copy, Default)]
pub struct EeaRowDecoder;

impl EeaRowDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode one record; `Ok(None)` means the record was discarded
    ///
    /// The timestamp is parsed before the validity check so a malformed
    /// timestamp is reported even on records that would be dropped.
    pub fn decode(&self, record: &EeaRecord) -> Result<Option<ValidMeasurement>> {
        let timestamp = parse_timestamp(&record.timestamp).ok_or_else(|| {
            AirqError::TimestampParse {
                row: record.row,
                value: record.timestamp.clone(),
            }
        })?;

        if record.validity != eea::VALID {
            return Ok(None);
        }

        let concentration = record.concentration.ok_or_else(|| AirqError::Format {
            row: record.row,
            reason: format!("valid record without {}", eea::CONCENTRATION),
        })?;

        Ok(Some(ValidMeasurement {
            row: record.row,
            station: record.station.clone(),
            pollutant: record.pollutant.clone(),
            concentration,
            timestamp,
        }))
    }
}

/// Parse an EEA `DatetimeBegin` value into UTC
///
/// Offset-aware forms are converted to UTC; naive forms are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in EEA_OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in EEA_NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, EEA_DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
