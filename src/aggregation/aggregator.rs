//! Per-station statistic aggregation
//!
//! Turns [`StationGroups`] into one statistic value per station and kind.
//! Stations are independent, so the parallel path splits them into
//! contiguous chunks and computes each chunk on a blocking worker task.
//! Chunks are collected in order, so both paths produce identical tables.

use super::grouper::{StationGroup, StationGroups};
use crate::error::{AirqError, Result};
use crate::models::{StationStatistic, StatisticKind, StatisticTable};
use futures::stream::{self, StreamExt};
use std::ops::Range;
use std::sync::Arc;
use tokio::task;
use tracing::debug;

/// Computes statistics over station groups
#[derive(Debug, Clone)]
pub struct StatisticAggregator {
    kinds: Vec<StatisticKind>,
}

impl Default for StatisticAggregator {
    fn default() -> Self {
        Self::new(StatisticKind::ALL.to_vec())
    }
}

impl StatisticAggregator {
    pub fn new(kinds: Vec<StatisticKind>) -> Self {
        Self { kinds }
    }

    pub fn kinds(&self) -> &[StatisticKind] {
        &self.kinds
    }

    /// One statistic per station, in group order
    pub fn aggregate(groups: &StationGroups, kind: StatisticKind) -> Vec<StationStatistic> {
        groups
            .iter()
            .map(|group| StationStatistic {
                station: group.station.clone(),
                kind,
                value: kind.compute(&group.readings),
            })
            .collect()
    }

    /// Result table with one column per configured statistic
    pub fn aggregate_table(&self, groups: &StationGroups) -> StatisticTable {
        let rows: Vec<Vec<f64>> = groups
            .iter()
            .map(|group| station_row(group, &self.kinds))
            .collect();

        debug!(
            "Aggregated {} statistics for {} stations",
            self.kinds.len(),
            groups.len()
        );

        assemble_table(groups.stations(), rows, &self.kinds)
    }

    /// Same table as [`Self::aggregate_table`], computed on up to `workers` blocking tasks
    pub async fn aggregate_table_parallel(
        &self,
        groups: Arc<StationGroups>,
        workers: usize,
    ) -> Result<StatisticTable> {
        let workers = workers.max(1);
        let ranges = chunk_ranges(groups.len(), workers);
        let kinds: Arc<[StatisticKind]> = Arc::from(self.kinds.as_slice());

        debug!(
            "Aggregating {} stations in {} chunks on {} workers",
            groups.len(),
            ranges.len(),
            workers
        );

        let chunks: Vec<Result<Vec<Vec<f64>>>> = stream::iter(ranges)
            .map(|range| {
                let groups = Arc::clone(&groups);
                let kinds = Arc::clone(&kinds);
                async move {
                    task::spawn_blocking(move || {
                        groups.groups()[range]
                            .iter()
                            .map(|group| station_row(group, &kinds))
                            .collect::<Vec<_>>()
                    })
                    .await
                    .map_err(|e| AirqError::Worker {
                        reason: e.to_string(),
                    })
                }
            })
            .buffered(workers)
            .collect()
            .await;

        let mut rows = Vec::with_capacity(groups.len());
        for chunk in chunks {
            rows.extend(chunk?);
        }

        Ok(assemble_table(groups.stations(), rows, &self.kinds))
    }
}

fn station_row(group: &StationGroup, kinds: &[StatisticKind]) -> Vec<f64> {
    kinds.iter().map(|kind| kind.compute(&group.readings)).collect()
}

/// Contiguous index ranges covering `0..len` in at most `chunks` pieces
fn chunk_ranges(len: usize, chunks: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let chunk_size = len.div_ceil(chunks.max(1));
    (0..len)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(len))
        .collect()
}

fn assemble_table(
    stations: Vec<String>,
    rows: Vec<Vec<f64>>,
    kinds: &[StatisticKind],
) -> StatisticTable {
    let mut columns: Vec<(StatisticKind, Vec<f64>)> = kinds
        .iter()
        .map(|&kind| (kind, Vec::with_capacity(rows.len())))
        .collect();

    for row in rows {
        for ((_, column), value) in columns.iter_mut().zip(row) {
            column.push(value);
        }
    }

    StatisticTable { stations, columns }
}
