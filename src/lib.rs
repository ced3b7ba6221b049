//! Air-Quality Statistics Library
//!
//! Computes yearly per-station statistics (mean, maximum and 99th percentile)
//! of valid hourly pollutant concentrations from two public export formats:
//! the Madrid open-data portal and the European Environment Agency (EEA).
//!
//! This library provides tools for:
//! - Decoding Madrid rows of 24 value/flag pairs under a selectable hour window
//! - Filtering EEA rows by their validity code
//! - Pooling valid readings per station in first-seen order
//! - Computing mean, maximum and interpolated quantiles, NaN for empty stations
//! - Reading export CSV files and writing result tables as CSV or Parquet

pub mod aggregation;
pub mod cli;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod io;
pub mod models;
pub mod processor;

// Re-export commonly used types
pub use aggregation::{StationGroup, StationGrouper, StationGroups, StatisticAggregator};
pub use config::{AirqConfig, DecodeErrorPolicy, HourWindowTable};
pub use decoder::{EeaRowDecoder, MadridRowDecoder};
pub use error::{AirqError, Result};
pub use models::{
    DecodedRow, EeaRecord, HourWindow, MadridRecord, ProcessingStats, RawRecord, SourceFormat,
    StationStatistic, StatisticKind, StatisticTable, ValidMeasurement,
};
pub use processor::{ProcessingOutput, StatsProcessor};
