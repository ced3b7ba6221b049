//! Per-station grouping and statistics
//!
//! - [`grouper`] - pools every valid reading of a station across all rows
//! - [`statistics`] - mean, maximum and interpolated quantile over a reading slice
//! - [`aggregator`] - builds the per-station result table, sequentially or
//!   spread over blocking worker tasks
//!
//! Station groups are immutable once built. Statistics of an empty group are
//! NaN rather than errors, so stations without valid readings still get a row.

pub mod aggregator;
pub mod grouper;
pub mod statistics;

#[cfg(test)]
pub mod tests;

pub use aggregator::StatisticAggregator;
pub use grouper::{StationGroup, StationGrouper, StationGroups};
