//! Result table output
//!
//! Writes a [`StatisticTable`] through polars. Undefined statistics are
//! written as NaN.

use crate::error::{AirqError, Result};
use crate::models::StatisticTable;
use polars::prelude::{CsvWriter, ParquetCompression, ParquetWriter, SerWriter};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Supported output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    /// Pick the format from the file extension, CSV by default
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("parquet") | Some("pq") => OutputFormat::Parquet,
            _ => OutputFormat::Csv,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AirqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "parquet" => Ok(OutputFormat::Parquet),
            other => Err(AirqError::invalid_option(
                "output format",
                other,
                &["csv", "parquet"],
            )),
        }
    }
}

/// Write the table to `path`, creating parent directories as needed
pub fn write_table(table: &StatisticTable, path: &Path, format: OutputFormat) -> Result<()> {
    let mut df = table.to_dataframe()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = std::fs::File::create(path)?;
    match format {
        OutputFormat::Csv => {
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df)?;
        }
        OutputFormat::Parquet => {
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)?;
        }
    }

    info!(
        "Wrote {} station rows to {} ({:?})",
        table.len(),
        path.display(),
        format
    );

    Ok(())
}
