//! Error handling for air-quality decoding and aggregation.
//!
//! Decode failures carry the source row index and the offending field so the
//! caller can locate the bad record. Empty station groups are not errors; they
//! surface as NaN statistics.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AirqError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid column pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Format error at row {row}: {reason}")]
    Format { row: usize, reason: String },

    #[error("Missing column '{column}' for {format} input")]
    MissingColumn { column: String, format: String },

    #[error("Invalid flag '{flag}' at row {row}, hour {hour} (expected 'V' or 'N')")]
    FlagDecode { row: usize, hour: usize, flag: String },

    #[error("Unparsable timestamp '{value}' at row {row}")]
    TimestampParse { row: usize, value: String },

    #[error("Unparsable value '{value}' for {field} at row {row}")]
    ValueParse {
        row: usize,
        field: String,
        value: String,
    },

    #[error("Invalid {option} option: '{value}' (expected one of: {expected})")]
    InvalidOption {
        option: String,
        value: String,
        expected: String,
    },

    #[error("Aggregation worker failed: {reason}")]
    Worker { reason: String },
}

impl AirqError {
    /// Source row of a per-row decode failure, if any
    pub fn row(&self) -> Option<usize> {
        match self {
            AirqError::Format { row, .. }
            | AirqError::FlagDecode { row, .. }
            | AirqError::TimestampParse { row, .. }
            | AirqError::ValueParse { row, .. } => Some(*row),
            _ => None,
        }
    }

    /// Whether a skip policy may drop the offending row and continue
    ///
    /// Format errors always abort: a shape mismatch means the table itself is wrong.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            AirqError::FlagDecode { .. }
                | AirqError::TimestampParse { .. }
                | AirqError::ValueParse { .. }
        )
    }

    pub(crate) fn invalid_option(
        option: impl Into<String>,
        value: impl Into<String>,
        expected: &[&str],
    ) -> Self {
        AirqError::InvalidOption {
            option: option.into(),
            value: value.into(),
            expected: expected.join(", "),
        }
    }
}

pub type Result<T> = std::result::Result<T, AirqError>;
