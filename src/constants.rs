//! Application constants for the air-quality statistics pipeline
//!
//! Column names of the two supported exports, flag markers, hour-window
//! boundaries and output column names.

// =============================================================================
// Madrid open-data export
// =============================================================================

/// Number of hourly (value, flag) pairs in one Madrid row
pub const HOURS_PER_DAY: usize = 24;

/// Number of positional hourly fields in one Madrid row (value and flag per hour)
pub const MADRID_HOURLY_FIELDS: usize = HOURS_PER_DAY * 2;

pub mod madrid {
    /// Default station identifier column
    pub const STATION: &str = "ESTACION";

    /// Pollutant (magnitude) code column
    pub const MAGNITUDE: &str = "MAGNITUD";

    /// Date component columns
    pub const YEAR: &str = "ANO";
    pub const MONTH: &str = "MES";
    pub const DAY: &str = "DIA";

    /// Hourly value column pattern (H1..H24, leading zero optional)
    pub const VALUE_COLUMN_PATTERN: &str = r"^H0?([1-9]|1[0-9]|2[0-4])$";

    /// Hourly flag column pattern (V1..V24, leading zero optional)
    pub const FLAG_COLUMN_PATTERN: &str = r"^V0?([1-9]|1[0-9]|2[0-4])$";

    /// Separator used by the open-data portal CSV files
    pub const CSV_SEPARATOR: u8 = b';';
}

/// Hourly validity markers used by the Madrid export
pub mod flags {
    /// Validated measurement
    pub const VALID: char = 'V';

    /// Not validated
    pub const INVALID: char = 'N';
}

// =============================================================================
// Hour windows (1-based hour indices, inclusive ranges)
// =============================================================================

pub mod hour_windows {
    pub const ALL: &[(usize, usize)] = &[(1, 24)];

    /// Night wraps around midnight
    pub const NIGHT: &[(usize, usize)] = &[(1, 12), (23, 24)];

    pub const DAY: &[(usize, usize)] = &[(13, 22)];
}

// =============================================================================
// EEA export
// =============================================================================

pub mod eea {
    pub const DATETIME_BEGIN: &str = "DatetimeBegin";
    pub const AIR_POLLUTANT: &str = "AirPollutant";
    pub const STATION: &str = "AirQualityStationEoICode";
    pub const CONCENTRATION: &str = "Concentration";
    pub const VALIDITY: &str = "Validity";

    /// Validity code of a measurement that may be used
    pub const VALID: i64 = 1;

    pub const REQUIRED_COLUMNS: &[&str] =
        &[DATETIME_BEGIN, AIR_POLLUTANT, STATION, CONCENTRATION, VALIDITY];

    pub const CSV_SEPARATOR: u8 = b',';
}

/// Timestamp formats accepted for EEA `DatetimeBegin`, tried in order after RFC 3339
pub const EEA_OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %:z", "%Y-%m-%d %H:%M:%S %z"];
pub const EEA_NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
pub const EEA_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Output table
// =============================================================================

pub mod output {
    pub const STATIONS: &str = "stations";
    pub const MEAN: &str = "mean_valid_year";
    pub const MAX: &str = "max_valid";
    pub const QUANTILE_99: &str = "quant99_valid";
}

/// Quantile reported by the percentile statistic
pub const DEFAULT_QUANTILE: f64 = 0.99;
