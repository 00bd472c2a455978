use serde::{Deserialize, Serialize};

use crate::board::TileCode;
use crate::error::StatsError;

use super::{AggregateConfig, TileHistogram};

/// Order of the per-code rows in a [`Report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowOrder {
    /// Most advanced tile first.
    #[default]
    Descending,
    /// Natural histogram order.
    Ascending,
}

/// Games whose highest tile was exactly `code`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TileRow {
    pub code: TileCode,
    pub display_value: u32,
    pub count: u64,
    pub percent: f64,
}

/// Games whose highest tile was at least `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdRow {
    pub threshold: TileCode,
    pub display_value: u32,
    pub reached: u64,
    pub percent: f64,
}

/// Max-tile distribution over a batch of games.
///
/// Every field is derived from integer counts, so aggregating the same batch
/// twice yields identical reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    games: u64,
    order: RowOrder,
    histogram: TileHistogram,
    rows: Vec<TileRow>,
    thresholds: Vec<ThresholdRow>,
}

impl Report {
    pub(crate) fn build(histogram: TileHistogram, config: &AggregateConfig) -> Result<Self, StatsError> {
        let games = histogram.total();
        if games == 0 {
            return Err(StatsError::EmptyBatch);
        }

        let mut rows: Vec<TileRow> = histogram
            .nonzero()
            .map(|(code, count)| TileRow {
                code,
                display_value: code.display_value(),
                count,
                percent: percent(count, games),
            })
            .collect();
        if config.order() == RowOrder::Descending {
            rows.reverse();
        }

        let thresholds = config
            .thresholds()
            .iter()
            .map(|&threshold| {
                let reached = histogram.reached_at_least(threshold);
                ThresholdRow {
                    threshold,
                    display_value: threshold.display_value(),
                    reached,
                    percent: percent(reached, games),
                }
            })
            .collect();

        Ok(Report { games, order: config.order(), histogram, rows, thresholds })
    }

    /// Number of games aggregated.
    pub fn games(&self) -> u64 {
        self.games
    }

    pub fn order(&self) -> RowOrder {
        self.order
    }

    pub fn histogram(&self) -> &TileHistogram {
        &self.histogram
    }

    /// One row per code that some game ended on, in [`Report::order`].
    pub fn rows(&self) -> &[TileRow] {
        &self.rows
    }

    /// One row per configured threshold, ascending.
    pub fn thresholds(&self) -> &[ThresholdRow] {
        &self.thresholds
    }

    pub fn row(&self, code: TileCode) -> Option<&TileRow> {
        self.rows.iter().find(|row| row.code == code)
    }

    pub fn threshold(&self, code: TileCode) -> Option<&ThresholdRow> {
        self.thresholds.iter().find(|row| row.threshold == code)
    }
}

fn percent(count: u64, games: u64) -> f64 {
    (count as f64) * 100.0 / (games as f64)
}
