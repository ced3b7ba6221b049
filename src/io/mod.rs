//! Table input and output around the decoding core
//!
//! - [`loader`] - reads export files into polars DataFrames and converts
//!   DataFrames into typed records
//! - [`writer`] - saves result tables as CSV or Parquet

pub mod loader;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use loader::{MadridColumns, eea_records, madrid_records, read_csv};
pub use writer::{OutputFormat, write_table};
