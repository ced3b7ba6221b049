//! Validity decoding for Madrid open-data rows
//!
//! Each hour carries a value and a one-character flag. `V` maps to a +1
//! coefficient and `N` to -1; an hour counts as a valid reading only when its
//! flag is `V` and the signed value is strictly positive. Hours outside the
//! window are never inspected, neither their flag nor their value.

use crate::config::HourWindowTable;
use crate::constants::{HOURS_PER_DAY, flags};
use crate::error::{AirqError, Result};
use crate::models::{DecodedRow, HourWindow, MadridRecord};
use tracing::debug;

/// Decoder for one hour window of Madrid rows
#[derive(Debug, Clone)]
pub struct MadridRowDecoder {
    window: HourWindow,
    mask: [bool; HOURS_PER_DAY],
}

impl MadridRowDecoder {
    pub fn new(window: HourWindow, table: &HourWindowTable) -> Self {
        Self {
            window,
            mask: table.mask(window),
        }
    }

    pub fn window(&self) -> HourWindow {
        self.window
    }

    /// Number of hours each decoded row covers
    pub fn selected_hours(&self) -> usize {
        self.mask.iter().filter(|&&selected| selected).count()
    }

    /// Decode one row into valid readings and invalid/rejected tallies
    pub fn decode(&self, record: &MadridRecord) -> Result<DecodedRow> {
        if record.values.len() != HOURS_PER_DAY || record.flags.len() != HOURS_PER_DAY {
            return Err(AirqError::Format {
                row: record.row,
                reason: format!(
                    "expected {} values and {} flags, found {} and {}",
                    HOURS_PER_DAY,
                    HOURS_PER_DAY,
                    record.values.len(),
                    record.flags.len()
                ),
            });
        }

        let mut decoded = DecodedRow {
            row: record.row,
            station: record.station.clone(),
            valid_readings: Vec::with_capacity(self.selected_hours()),
            invalid_count: 0,
            rejected_count: 0,
        };

        let hours = record.values.iter().zip(&record.flags).zip(self.mask);
        for (hour_index, ((&value, flag), selected)) in hours.enumerate() {
            if !selected {
                continue;
            }

            let coefficient = flag_coefficient(flag).ok_or_else(|| AirqError::FlagDecode {
                row: record.row,
                hour: hour_index + 1,
                flag: flag.clone(),
            })?;

            if coefficient > 0.0 {
                // Only valid-flagged hours use their value
                if let Some(raw) = record.unparsed_value(hour_index + 1) {
                    return Err(AirqError::ValueParse {
                        row: record.row,
                        field: format!("hour {}", hour_index + 1),
                        value: raw.to_string(),
                    });
                }

                let reading = value * coefficient;
                if reading > 0.0 {
                    decoded.valid_readings.push(reading);
                } else {
                    decoded.rejected_count += 1;
                }
            } else {
                decoded.invalid_count += 1;
            }
        }

        if decoded.rejected_count > 0 {
            debug!(
                "Row {} ({}): {} valid-flagged hours with non-positive values",
                record.row, record.station, decoded.rejected_count
            );
        }

        Ok(decoded)
    }
}

/// Coefficient of a flag: +1 for valid, -1 for invalid, `None` for anything else
pub fn flag_coefficient(flag: &str) -> Option<f64> {
    let mut chars = flag.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(flags::VALID), None) => Some(1.0),
        (Some(flags::INVALID), None) => Some(-1.0),
        _ => None,
    }
}
