//! Conversion of export tables into typed records
//!
//! Table-level problems (missing columns) fail the whole load. Row-level
//! problems are returned per row so the pipeline can apply its decode-error
//! policy to them like any other decode failure.

use crate::constants::{HOURS_PER_DAY, eea, madrid};
use crate::error::{AirqError, Result};
use crate::models::{EeaRecord, MadridRecord, RawRecord, SourceFormat};
use chrono::NaiveDate;
use polars::prelude::*;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

/// Read a delimited export file with every column kept as text
pub fn read_csv(path: &Path, separator: u8) -> Result<DataFrame> {
    if !path.exists() {
        return Err(AirqError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|options| options.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    info!(
        "Read {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );

    Ok(df)
}

/// Names of the hourly value and flag columns, hour 1 first
#[derive(Debug, Clone, PartialEq)]
pub struct MadridColumns {
    pub values: Vec<String>,
    pub flags: Vec<String>,
}

impl MadridColumns {
    /// Find the `H1..H24` / `V1..V24` columns by name
    pub fn discover(column_names: &[&str]) -> Result<Self> {
        let value_pattern = Regex::new(madrid::VALUE_COLUMN_PATTERN)?;
        let flag_pattern = Regex::new(madrid::FLAG_COLUMN_PATTERN)?;

        let mut values: Vec<Option<String>> = vec![None; HOURS_PER_DAY];
        let mut flags: Vec<Option<String>> = vec![None; HOURS_PER_DAY];

        for name in column_names {
            let trimmed = name.trim();
            if let Some(hour) = hour_of(&value_pattern, trimmed) {
                values[hour - 1] = Some(name.to_string());
            } else if let Some(hour) = hour_of(&flag_pattern, trimmed) {
                flags[hour - 1] = Some(name.to_string());
            }
        }

        Ok(Self {
            values: require_all(values, 'H')?,
            flags: require_all(flags, 'V')?,
        })
    }
}

fn hour_of(pattern: &Regex, name: &str) -> Option<usize> {
    pattern
        .captures(name)
        .and_then(|captures| captures.get(1))
        .and_then(|hour| hour.as_str().parse().ok())
}

fn require_all(columns: Vec<Option<String>>, prefix: char) -> Result<Vec<String>> {
    columns
        .into_iter()
        .enumerate()
        .map(|(index, column)| {
            column.ok_or_else(|| AirqError::MissingColumn {
                column: format!("{}{:02}", prefix, index + 1),
                format: SourceFormat::Madrid.to_string(),
            })
        })
        .collect()
}

/// Column as text, whatever its stored type
fn text_column(df: &DataFrame, name: &str, format: SourceFormat) -> Result<StringChunked> {
    let column = df
        .column(name)
        .map_err(|_| AirqError::MissingColumn {
            column: name.to_string(),
            format: format.to_string(),
        })?
        .cast(&DataType::String)?;
    Ok(column.str()?.clone())
}

fn optional_text_column(df: &DataFrame, name: &str, format: SourceFormat) -> Result<Option<StringChunked>> {
    if df.get_column_index(name).is_some() {
        text_column(df, name, format).map(Some)
    } else {
        Ok(None)
    }
}

fn cell(column: &StringChunked, row: usize) -> Option<&str> {
    column.get(row).map(str::trim).filter(|s| !s.is_empty())
}

/// Convert a Madrid export table into records, one result per row
pub fn madrid_records(df: &DataFrame, station_column: &str) -> Result<Vec<Result<RawRecord>>> {
    let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    let layout = MadridColumns::discover(&names)?;
    debug!("Madrid hourly columns: {:?} / {:?}", layout.values, layout.flags);

    let format = SourceFormat::Madrid;
    let station = text_column(df, station_column, format)?;
    let pollutant = optional_text_column(df, madrid::MAGNITUDE, format)?;
    let year = optional_text_column(df, madrid::YEAR, format)?;
    let month = optional_text_column(df, madrid::MONTH, format)?;
    let day = optional_text_column(df, madrid::DAY, format)?;

    let values = layout
        .values
        .iter()
        .map(|name| text_column(df, name, format))
        .collect::<Result<Vec<_>>>()?;
    let flags = layout
        .flags
        .iter()
        .map(|name| text_column(df, name, format))
        .collect::<Result<Vec<_>>>()?;

    let records = (0..df.height())
        .map(|row| -> Result<RawRecord> {
            let station_id = cell(&station, row).ok_or_else(|| AirqError::Format {
                row,
                reason: format!("missing station identifier in '{}'", station_column),
            })?;

            // Bad cells are left to the decoder, which only looks at selected hours
            let mut hourly_values = Vec::with_capacity(HOURS_PER_DAY);
            let mut unparsed = Vec::new();
            for (hour_index, column) in values.iter().enumerate() {
                let raw = cell(column, row).unwrap_or("");
                match raw.parse::<f64>() {
                    Ok(value) => hourly_values.push(value),
                    Err(_) => {
                        hourly_values.push(f64::NAN);
                        unparsed.push((hour_index + 1, raw.to_string()));
                    }
                }
            }

            let hourly_flags = flags
                .iter()
                .map(|column| column.get(row).unwrap_or("").to_string())
                .collect();

            let mut record = MadridRecord::new(row, station_id, hourly_values, hourly_flags);
            record.unparsed = unparsed;
            if let Some(code) = pollutant.as_ref().and_then(|c| cell(c, row)) {
                record = record.with_pollutant(code);
            }
            if let (Some(y), Some(m), Some(d)) = (&year, &month, &day) {
                if let Some(date) = parse_date(cell(y, row), cell(m, row), cell(d, row)) {
                    record = record.with_date(date);
                }
            }

            Ok(RawRecord::Madrid(record))
        })
        .collect();

    Ok(records)
}

fn parse_date(year: Option<&str>, month: Option<&str>, day: Option<&str>) -> Option<NaiveDate> {
    let year = year?.parse::<i32>().ok()?;
    let month = month?.parse::<u32>().ok()?;
    let day = day?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Convert an EEA export table into records, one result per row
pub fn eea_records(df: &DataFrame, station_column: &str) -> Result<Vec<Result<RawRecord>>> {
    let format = SourceFormat::Eea;
    for required in eea::REQUIRED_COLUMNS {
        if *required != eea::STATION && df.get_column_index(required).is_none() {
            return Err(AirqError::MissingColumn {
                column: required.to_string(),
                format: format.to_string(),
            });
        }
    }

    let timestamp = text_column(df, eea::DATETIME_BEGIN, format)?;
    let pollutant = text_column(df, eea::AIR_POLLUTANT, format)?;
    let station = text_column(df, station_column, format)?;
    let concentration = text_column(df, eea::CONCENTRATION, format)?;
    let validity = text_column(df, eea::VALIDITY, format)?;

    let records = (0..df.height())
        .map(|row| -> Result<RawRecord> {
            let station_id = cell(&station, row).ok_or_else(|| AirqError::Format {
                row,
                reason: format!("missing station identifier in '{}'", station_column),
            })?;

            let concentration = match cell(&concentration, row) {
                None => None,
                Some(raw) => Some(raw.parse::<f64>().map_err(|_| AirqError::ValueParse {
                    row,
                    field: eea::CONCENTRATION.to_string(),
                    value: raw.to_string(),
                })?),
            };

            let raw_validity = cell(&validity, row).unwrap_or("");
            let validity = raw_validity
                .parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0)
                .map(|v| v as i64)
                .ok_or_else(|| AirqError::ValueParse {
                    row,
                    field: eea::VALIDITY.to_string(),
                    value: raw_validity.to_string(),
                })?;

            Ok(RawRecord::Eea(EeaRecord {
                row,
                timestamp: timestamp.get(row).unwrap_or("").to_string(),
                pollutant: cell(&pollutant, row).unwrap_or("").to_string(),
                station: station_id.to_string(),
                concentration,
                validity,
            }))
        })
        .collect();

    Ok(records)
}
