//! Command-line interface components.

use crate::config::{AirqConfig, DecodeErrorPolicy};
use crate::error::{AirqError, Result};
use crate::io::OutputFormat;
use crate::models::{HourWindow, SourceFormat, StatisticKind};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "airq_stats")]
#[command(about = "Yearly per-station air-quality statistics from Madrid and EEA hourly exports")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Export file to process
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Source format (madrid, eea, or the legacy 1/2)
    #[arg(short, long, default_value = "madrid")]
    pub format: String,

    /// Hours of Madrid rows to use (all, night, day, or the legacy 1/2/3)
    #[arg(short, long, default_value = "all")]
    pub window: String,

    /// Write the result table here (.csv, .parquet); printed when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Force the output format instead of deriving it from the extension
    #[arg(long)]
    pub output_format: Option<String>,

    /// Field separator of the input file (defaults to ';' for Madrid, ',' for EEA)
    #[arg(long)]
    pub separator: Option<char>,

    /// Station identifier column
    #[arg(long)]
    pub station_column: Option<String>,

    /// Keep only records of this pollutant code
    #[arg(long)]
    pub pollutant: Option<String>,

    /// Statistics to compute, comma separated (mean, max, p99)
    #[arg(long, value_delimiter = ',', default_value = "mean,max,p99")]
    pub statistics: Vec<String>,

    /// Skip rows with unknown flags or unparsable timestamps and values instead of aborting
    #[arg(long)]
    pub skip_bad_rows: bool,

    /// Aggregate stations on parallel worker tasks
    #[arg(long)]
    pub parallel: bool,

    /// Number of aggregation workers (defaults to the number of CPUs)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Build the processing configuration; invalid option values fail here
    pub fn to_config(&self) -> Result<AirqConfig> {
        let format: SourceFormat = self.format.parse()?;
        let window: HourWindow = self.window.parse()?;
        let statistics = self
            .statistics
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<StatisticKind>())
            .collect::<Result<Vec<_>>>()?;

        let mut config = AirqConfig::new(format)
            .with_hour_window(window)
            .with_statistics(statistics);

        if let Some(column) = &self.station_column {
            config = config.with_station_column(column);
        }
        if let Some(pollutant) = &self.pollutant {
            config = config.with_pollutant(pollutant);
        }
        if let Some(separator) = self.separator {
            if !separator.is_ascii() {
                return Err(AirqError::invalid_option(
                    "separator",
                    separator.to_string(),
                    &["a single ASCII character"],
                ));
            }
            config = config.with_separator(separator as u8);
        }
        if self.skip_bad_rows {
            config = config.with_decode_error_policy(DecodeErrorPolicy::Skip);
        }
        if self.parallel {
            let workers = self.workers.unwrap_or(config.workers);
            config = config.with_parallel(workers);
        }

        config.validate()?;
        Ok(config)
    }

    /// Output format for `--output`, from the flag or the file extension
    pub fn get_output_format(&self) -> Result<Option<OutputFormat>> {
        let Some(path) = &self.output else {
            return Ok(None);
        };
        match &self.output_format {
            Some(name) => name.parse().map(Some),
            None => Ok(Some(OutputFormat::from_path(path))),
        }
    }
}
