//! Main processing engine.
//!
//! Orchestrates the complete workflow: typed records are decoded with the
//! decoder matching the configured source format, valid readings are pooled
//! per station, and the statistic table is computed over the pooled groups.
//! The whole input is decoded and grouped before any statistic is computed.

#[cfg(test)]
pub mod tests;

use crate::aggregation::{StationGrouper, StationGroups, StatisticAggregator};
use crate::config::{AirqConfig, DecodeErrorPolicy};
use crate::decoder::{EeaRowDecoder, MadridRowDecoder};
use crate::error::{AirqError, Result};
use crate::io::loader::{eea_records, madrid_records, read_csv};
use crate::models::{
    DecodedRow, MadridRecord, ProcessingStats, RawRecord, SourceFormat, StatisticTable,
};
use polars::prelude::DataFrame;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::{debug, info, warn};

/// Everything produced by one processing run
#[derive(Debug, Clone)]
pub struct ProcessingOutput {
    pub table: StatisticTable,
    pub groups: StationGroups,
    pub stats: ProcessingStats,
}

/// Processor for one source format and configuration
#[derive(Debug, Clone)]
pub struct StatsProcessor {
    config: AirqConfig,
    madrid: MadridRowDecoder,
    eea: EeaRowDecoder,
    aggregator: StatisticAggregator,
}

impl StatsProcessor {
    /// Create a processor; invalid options fail here, before any row is read
    pub fn new(config: AirqConfig) -> Result<Self> {
        config.validate()?;

        let madrid = MadridRowDecoder::new(config.hour_window, &config.hour_windows);
        let aggregator = StatisticAggregator::new(config.statistics.clone());

        debug!(
            "Processor ready: format={}, window={} ({} hours), statistics={:?}",
            config.format,
            config.hour_window,
            madrid.selected_hours(),
            config.statistics
        );

        Ok(Self {
            config,
            madrid,
            eea: EeaRowDecoder::new(),
            aggregator,
        })
    }

    pub fn config(&self) -> &AirqConfig {
        &self.config
    }

    /// Decode every record and pool valid readings per station
    ///
    /// Stations whose records were all invalid, or all skipped under the skip
    /// policy, still get an (empty) group.
    pub fn group_records<I>(&self, records: I, stats: &mut ProcessingStats) -> Result<StationGroups>
    where
        I: IntoIterator<Item = Result<RawRecord>>,
    {
        let mut grouper = StationGrouper::new();

        for record in records {
            stats.rows_read += 1;

            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    self.handle_row_error(e, stats)?;
                    continue;
                }
            };

            if record.format() != self.config.format {
                return Err(AirqError::Format {
                    row: record.row(),
                    reason: format!(
                        "{} record in {} input",
                        record.format(),
                        self.config.format
                    ),
                });
            }

            if let Some(code) = record.pollutant() {
                stats.add_pollutant(code);
            }

            if !self.matches_pollutant(&record) {
                stats.records_discarded += 1;
                continue;
            }

            match &record {
                RawRecord::Madrid(madrid) => match self.madrid.decode(madrid) {
                    Ok(row) => {
                        stats.rows_decoded += 1;
                        stats.valid_readings += row.valid_count();
                        stats.invalid_readings += row.invalid_count;
                        stats.rejected_readings += row.rejected_count;
                        grouper.add_decoded_row(&row);
                    }
                    Err(e) => {
                        self.handle_row_error(e, stats)?;
                        grouper.register_station(&madrid.station);
                    }
                },
                RawRecord::Eea(eea) => match self.eea.decode(eea) {
                    Ok(Some(measurement)) => {
                        stats.rows_decoded += 1;
                        stats.valid_readings += 1;
                        grouper.add_measurement(&measurement);
                    }
                    Ok(None) => {
                        stats.rows_decoded += 1;
                        stats.records_discarded += 1;
                        grouper.register_station(&eea.station);
                    }
                    Err(e) => {
                        self.handle_row_error(e, stats)?;
                        grouper.register_station(&eea.station);
                    }
                },
            }
        }

        if self.config.pollutant.is_none() && stats.pollutant_codes.len() > 1 {
            warn!(
                "Readings of {} pollutant codes ({}) are pooled per station; set a pollutant filter to separate them",
                stats.pollutant_codes.len(),
                stats.pollutant_codes.join(", ")
            );
        }

        let groups = grouper.finish();
        stats.stations = groups.len();
        stats.stations_without_readings = groups.empty_stations();

        info!(
            "Grouped {} valid readings into {} stations ({} without readings)",
            groups.total_readings(),
            groups.len(),
            stats.stations_without_readings
        );

        Ok(groups)
    }

    /// Decode Madrid rows one by one, keeping the per-row (daily) outcome
    pub fn decode_madrid_rows(
        &self,
        records: &[MadridRecord],
        stats: &mut ProcessingStats,
    ) -> Result<Vec<DecodedRow>> {
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            stats.rows_read += 1;
            match self.madrid.decode(record) {
                Ok(row) => {
                    stats.rows_decoded += 1;
                    rows.push(row);
                }
                Err(e) => self.handle_row_error(e, stats)?,
            }
        }
        Ok(rows)
    }

    /// Decode, group and aggregate on the calling thread
    pub fn process_records<I>(&self, records: I) -> Result<ProcessingOutput>
    where
        I: IntoIterator<Item = Result<RawRecord>>,
    {
        let start_time = Instant::now();
        let mut stats = ProcessingStats::new(self.config.format);

        let groups = self.group_records(records, &mut stats)?;
        let table = self.aggregator.aggregate_table(&groups);

        stats.processing_time_ms = start_time.elapsed().as_millis();
        info!("{}", stats.summary());

        Ok(ProcessingOutput {
            table,
            groups,
            stats,
        })
    }

    /// Decode and group, then aggregate on worker tasks when configured
    pub async fn process_records_async<I>(&self, records: I) -> Result<ProcessingOutput>
    where
        I: IntoIterator<Item = Result<RawRecord>>,
    {
        if !self.config.parallel {
            return self.process_records(records);
        }

        let start_time = Instant::now();
        let mut stats = ProcessingStats::new(self.config.format);

        let groups = Arc::new(self.group_records(records, &mut stats)?);
        let table = self
            .aggregator
            .aggregate_table_parallel(Arc::clone(&groups), self.config.workers)
            .await?;

        stats.processing_time_ms = start_time.elapsed().as_millis();
        info!("{}", stats.summary());

        let groups = Arc::try_unwrap(groups).unwrap_or_else(|shared| (*shared).clone());

        Ok(ProcessingOutput {
            table,
            groups,
            stats,
        })
    }

    /// Convert a table of the configured format into records
    pub fn load_records(&self, df: &DataFrame) -> Result<Vec<Result<RawRecord>>> {
        let station_column = self.config.station_column();
        match self.config.format {
            SourceFormat::Madrid => madrid_records(df, station_column),
            SourceFormat::Eea => eea_records(df, station_column),
        }
    }

    pub fn process_dataframe(&self, df: &DataFrame) -> Result<ProcessingOutput> {
        let records = self.load_records(df)?;
        self.process_records(records)
    }

    /// Read an export file and process it
    pub async fn process_file(&self, path: &Path) -> Result<ProcessingOutput> {
        let file_path = path.to_path_buf();
        let separator = self.config.separator();

        let df = task::spawn_blocking(move || read_csv(&file_path, separator))
            .await
            .map_err(|e| AirqError::Worker {
                reason: e.to_string(),
            })??;

        let records = self.load_records(&df)?;
        self.process_records_async(records).await
    }

    fn matches_pollutant(&self, record: &RawRecord) -> bool {
        let Some(wanted) = &self.config.pollutant else {
            return true;
        };
        record.pollutant() == Some(wanted.trim())
    }

    fn handle_row_error(&self, error: AirqError, stats: &mut ProcessingStats) -> Result<()> {
        if self.config.on_decode_error == DecodeErrorPolicy::Skip && error.is_skippable() {
            warn!("Skipping row: {}", error);
            stats.add_skipped(error.to_string());
            Ok(())
        } else {
            Err(error)
        }
    }
}
