//! Max-tile aggregation over a batch of finished games.
//!
//! This module provides:
//! - [`TileHistogram`]: dense counts over the 16 tile codes.
//! - [`Aggregator`]: turns decoded maxima into a [`Report`] of per-code rows
//!   and "reached at least" threshold rows, according to an
//!   [`AggregateConfig`].
//! - [`summarize`]: reduces [`GameRecord`]s to [`GameSummary`]s in parallel.
//!
//! Histogram counting is associative and commutative, so large batches are
//! split into chunks on the rayon pool and the partial histograms are merged.
//!
//! Quick start
//! ```
//! use tile_stats::stats::{AggregateConfig, Aggregator, RowOrder};
//!
//! let config = AggregateConfig::default()
//!     .with_thresholds([11, 13])
//!     .unwrap()
//!     .with_order(RowOrder::Ascending);
//! let report = Aggregator::new(config).aggregate([11, 11, 13, 15]).unwrap();
//! assert_eq!(report.games(), 4);
//! assert_eq!(report.rows()[0].percent, 50.0);
//! assert_eq!(report.thresholds()[1].reached, 2);
//! ```

use std::ops::RangeInclusive;

use rayon::prelude::*;

use crate::board::{decode, TileCode};
use crate::error::StatsError;
use crate::record::{GameRecord, GameSummary};

mod histogram;
mod report;

pub use histogram::TileHistogram;
pub use report::{Report, RowOrder, ThresholdRow, TileRow};

/// Thresholds reported when none are configured: 2048 through 32768.
pub const DEFAULT_THRESHOLDS: RangeInclusive<u8> = 11..=15;

const PAR_CHUNK: usize = 4096;

/// Knobs for building a [`Report`].
///
/// - `thresholds`: codes used as lower bounds for cumulative counts, kept
///   sorted ascending without duplicates.
/// - `order`: order of the per-code rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateConfig {
    thresholds: Vec<TileCode>,
    order: RowOrder,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            thresholds: TileCode::all()
                .filter(|code| DEFAULT_THRESHOLDS.contains(&code.get()))
                .collect(),
            order: RowOrder::default(),
        }
    }
}

impl AggregateConfig {
    /// Replace the thresholds. Each must be a valid tile code.
    pub fn with_thresholds<I>(mut self, thresholds: I) -> Result<Self, StatsError>
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        let mut codes = thresholds
            .into_iter()
            .map(|t| TileCode::try_from(t.into()))
            .collect::<Result<Vec<_>, _>>()?;
        codes.sort_unstable();
        codes.dedup();
        self.thresholds = codes;
        Ok(self)
    }

    pub fn with_order(mut self, order: RowOrder) -> Self {
        self.order = order;
        self
    }

    pub fn thresholds(&self) -> &[TileCode] {
        &self.thresholds
    }

    pub fn order(&self) -> RowOrder {
        self.order
    }
}

/// Builds [`Report`]s under a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregateConfig,
}

impl Aggregator {
    pub fn new(config: AggregateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregateConfig {
        &self.config
    }

    /// Aggregate unchecked per-game maxima.
    ///
    /// Fails with [`StatsError::Range`] on the first value outside `0..=15`
    /// and with [`StatsError::EmptyBatch`] when there are no games.
    pub fn aggregate<I>(&self, maxima: I) -> Result<Report, StatsError>
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        let mut histogram = TileHistogram::new();
        for code in maxima {
            histogram.record_raw(code)?;
        }
        self.aggregate_histogram(histogram)
    }

    pub fn aggregate_codes<I>(&self, maxima: I) -> Result<Report, StatsError>
    where
        I: IntoIterator<Item = TileCode>,
    {
        self.aggregate_histogram(maxima.into_iter().collect())
    }

    /// Report from an already reduced histogram of per-game maxima.
    pub fn aggregate_histogram(&self, histogram: TileHistogram) -> Result<Report, StatsError> {
        Report::build(histogram, &self.config)
    }

    /// Decode and aggregate packed states on the rayon pool.
    pub fn aggregate_states(&self, states: &[u64]) -> Result<Report, StatsError> {
        let histogram = states
            .par_chunks(PAR_CHUNK)
            .map(|chunk| chunk.iter().map(|&state| decode(state)).collect::<TileHistogram>())
            .reduce(TileHistogram::new, |a, b| a.merge(&b));
        self.aggregate_histogram(histogram)
    }

    pub fn aggregate_summaries(&self, summaries: &[GameSummary]) -> Result<Report, StatsError> {
        self.aggregate_codes(summaries.iter().map(|s| s.max_code))
    }
}

/// Aggregate with the default configuration.
pub fn aggregate<I>(maxima: I) -> Result<Report, StatsError>
where
    I: IntoIterator,
    I::Item: Into<i64>,
{
    Aggregator::default().aggregate(maxima)
}

/// Reduce each record to its max tile code, keeping record order and
/// auxiliary fields.
pub fn summarize(records: Vec<GameRecord>) -> Vec<GameSummary> {
    records.into_par_iter().map(GameRecord::into_summary).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn code(c: u8) -> TileCode {
        TileCode::new(c).unwrap()
    }

    #[test]
    fn it_aggregate_concrete_batch() {
        let report = aggregate([11, 11, 13, 15]).unwrap();
        assert_eq!(report.games(), 4);
        assert_eq!(report.order(), RowOrder::Descending);

        let rows: Vec<(u8, u32, u64, f64)> = report
            .rows()
            .iter()
            .map(|r| (r.code.get(), r.display_value, r.count, r.percent))
            .collect();
        assert_eq!(
            rows,
            vec![(15, 32768, 1, 25.0), (13, 8192, 1, 25.0), (11, 2048, 2, 50.0)]
        );

        let at_13 = report.threshold(code(13)).unwrap();
        assert_eq!(at_13.reached, 2);
        assert_eq!(at_13.percent, 50.0);
        let at_11 = report.threshold(code(11)).unwrap();
        assert_eq!(at_11.reached, 4);
        assert_eq!(at_11.percent, 100.0);
        assert_eq!(report.thresholds().len(), 5);
    }

    #[test]
    fn it_aggregate_ascending() {
        let config = AggregateConfig::default().with_order(RowOrder::Ascending);
        let report = Aggregator::new(config).aggregate([11, 11, 13, 15]).unwrap();
        let codes: Vec<u8> = report.rows().iter().map(|r| r.code.get()).collect();
        assert_eq!(codes, vec![11, 13, 15]);
    }

    #[test]
    fn it_reject_empty_batch() {
        assert_eq!(aggregate(Vec::<i64>::new()), Err(StatsError::EmptyBatch));
        assert_eq!(
            Aggregator::default().aggregate_states(&[]),
            Err(StatsError::EmptyBatch)
        );
        assert_eq!(
            Aggregator::default().aggregate_summaries(&[]),
            Err(StatsError::EmptyBatch)
        );
    }

    #[test]
    fn it_reject_out_of_range_maxima() {
        assert_eq!(aggregate([3, 16, 4]), Err(StatsError::Range(16)));
        assert_eq!(aggregate([-1]), Err(StatsError::Range(-1)));
    }

    #[test]
    fn it_configure_thresholds() {
        let config = AggregateConfig::default().with_thresholds([13u8, 2, 13, 9]).unwrap();
        let got: Vec<u8> = config.thresholds().iter().map(|c| c.get()).collect();
        assert_eq!(got, vec![2, 9, 13]);
        assert_eq!(
            AggregateConfig::default().with_thresholds([12, 20]),
            Err(StatsError::Range(20))
        );

        let defaults: Vec<u8> = AggregateConfig::default().thresholds().iter().map(|c| c.get()).collect();
        assert_eq!(defaults, vec![11, 12, 13, 14, 15]);
    }

    #[test]
    fn it_threshold_counts_are_monotonic() {
        let config = AggregateConfig::default().with_thresholds(0..16).unwrap();
        let report = Aggregator::new(config).aggregate([0, 3, 3, 7, 11, 11, 12, 15]).unwrap();
        for pair in report.thresholds().windows(2) {
            assert!(pair[0].reached >= pair[1].reached);
        }
        assert_eq!(report.thresholds()[0].reached, 8);
    }

    #[test]
    fn it_aggregate_is_order_independent() {
        let a = aggregate([10, 11, 12, 11, 9]).unwrap();
        let b = aggregate([11, 9, 11, 12, 10]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, aggregate([10, 11, 12, 11, 9]).unwrap());
    }

    #[test]
    fn it_parallel_states_match_sequential() {
        // Spans several chunks so the reduction actually merges partials.
        let states: Vec<u64> = (0..(3 * PAR_CHUNK as u64 + 17))
            .map(|i| i.wrapping_mul(0x9e37_79b9_7f4a_7c15))
            .collect();
        let aggregator = Aggregator::default();
        let par = aggregator.aggregate_states(&states).unwrap();
        let seq = aggregator.aggregate_codes(states.iter().map(|&s| decode(s))).unwrap();
        assert_eq!(par, seq);
        assert_eq!(par.games(), states.len() as u64);
    }

    #[test]
    fn it_summarize_keeps_order_and_aux() {
        let records = vec![
            GameRecord::with_aux(Board::from_raw(0xb), vec![1200]),
            GameRecord::new(Board::from_raw(0x0)),
            GameRecord::with_aux(Board::from_raw(0xd0), vec![3400, 7]),
        ];
        let summaries = summarize(records);
        let codes: Vec<u8> = summaries.iter().map(|s| s.max_code.get()).collect();
        assert_eq!(codes, vec![11, 0, 13]);
        assert_eq!(summaries[2].aux, vec![3400, 7]);

        let report = Aggregator::default().aggregate_summaries(&summaries).unwrap();
        assert_eq!(report.games(), 3);
        assert_eq!(report.row(code(0)).unwrap().count, 1);
    }
}
