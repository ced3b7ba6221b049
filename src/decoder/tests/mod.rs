//! Tests for the Madrid and EEA row decoders


use crate::models::{EeaRecord, MadridRecord};

/// Build a Madrid record from (value, flag) pairs, padding missing hours with `(0, "N")`
pub fn madrid_record(row: usize, station: &str, hours: &[(f64, &str)]) -> MadridRecord {
    let mut values = Vec::with_capacity(24);
    let mut flags = Vec::with_capacity(24);
    for hour in 0..24 {
        let (value, flag) = hours.get(hour).copied().unwrap_or((0.0, "N"));
        values.push(value);
        flags.push(flag.to_string());
    }
    MadridRecord::new(row, station, values, flags)
}

/// A Madrid record with every hour flagged valid and value `hour * 10`
pub fn all_valid_record(row: usize, station: &str) -> MadridRecord {
    let hours: Vec<(f64, &str)> = (1..=24).map(|h| (h as f64 * 10.0, "V")).collect();
    madrid_record(row, station, &hours)
}

pub fn eea_record(row: usize, station: &str, concentration: Option<f64>, validity: i64) -> EeaRecord {
    EeaRecord {
        row,
        timestamp: "2023-01-01 00:00:00 +01:00".to_string(),
        pollutant: "NO2".to_string(),
        station: station.to_string(),
        concentration,
        validity,
    }
}
