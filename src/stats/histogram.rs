use serde::Serialize;

use crate::board::{TileCode, TILE_CODES};
use crate::error::StatsError;

/// Occurrence counts indexed by tile code.
///
/// Built from one board it counts cells (total 16); built from a batch of
/// per-game maxima it counts games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TileHistogram {
    counts: [u64; TILE_CODES],
}

impl TileHistogram {
    pub const fn new() -> Self {
        TileHistogram { counts: [0; TILE_CODES] }
    }

    pub const fn from_counts(counts: [u64; TILE_CODES]) -> Self {
        TileHistogram { counts }
    }

    #[inline]
    pub fn record(&mut self, code: TileCode) {
        self.counts[code.index()] += 1;
    }

    /// Validate and record an unchecked code.
    pub fn record_raw(&mut self, code: impl Into<i64>) -> Result<TileCode, StatsError> {
        let code = TileCode::try_from(code.into())?;
        self.record(code);
        Ok(code)
    }

    #[inline]
    pub fn count(&self, code: TileCode) -> u64 {
        self.counts[code.index()]
    }

    pub fn counts(&self) -> &[u64; TILE_CODES] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Element-wise sum of two partial histograms.
    pub fn merge(&self, other: &Self) -> Self {
        let mut counts = self.counts;
        for (dst, src) in counts.iter_mut().zip(other.counts.iter()) {
            *dst += src;
        }
        TileHistogram { counts }
    }

    /// Highest code with a nonzero count.
    pub fn highest(&self) -> Option<TileCode> {
        TileCode::all().rev().find(|&code| self.count(code) > 0)
    }

    /// Number of entries whose code is at least `threshold`.
    pub fn reached_at_least(&self, threshold: TileCode) -> u64 {
        self.counts[threshold.index()..].iter().sum()
    }

    /// All 16 `(code, count)` pairs, ascending by code.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (TileCode, u64)> + '_ {
        TileCode::all().map(move |code| (code, self.count(code)))
    }

    /// `(code, count)` pairs with a nonzero count, ascending by code.
    pub fn nonzero(&self) -> impl DoubleEndedIterator<Item = (TileCode, u64)> + '_ {
        self.iter().filter(|&(_, count)| count > 0)
    }
}

impl FromIterator<TileCode> for TileHistogram {
    fn from_iter<I: IntoIterator<Item = TileCode>>(iter: I) -> Self {
        let mut histogram = TileHistogram::new();
        histogram.extend(iter);
        histogram
    }
}

impl Extend<TileCode> for TileHistogram {
    fn extend<I: IntoIterator<Item = TileCode>>(&mut self, iter: I) {
        for code in iter {
            self.record(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(c: u8) -> TileCode {
        TileCode::new(c).unwrap()
    }

    #[test]
    fn it_count_and_total() {
        let hist: TileHistogram = [11, 11, 13, 15].into_iter().map(code).collect();
        assert_eq!(hist.count(code(11)), 2);
        assert_eq!(hist.count(code(13)), 1);
        assert_eq!(hist.count(code(15)), 1);
        assert_eq!(hist.count(code(12)), 0);
        assert_eq!(hist.total(), 4);
        assert_eq!(hist.highest(), Some(code(15)));
    }

    #[test]
    fn it_reached_at_least() {
        let hist: TileHistogram = [11, 11, 13, 15].into_iter().map(code).collect();
        assert_eq!(hist.reached_at_least(code(0)), 4);
        assert_eq!(hist.reached_at_least(code(11)), 4);
        assert_eq!(hist.reached_at_least(code(12)), 2);
        assert_eq!(hist.reached_at_least(code(13)), 2);
        assert_eq!(hist.reached_at_least(code(14)), 1);
        assert_eq!(hist.reached_at_least(code(15)), 1);
    }

    #[test]
    fn it_merge_partials() {
        let a: TileHistogram = [1, 2, 2].into_iter().map(code).collect();
        let b: TileHistogram = [2, 9].into_iter().map(code).collect();
        let merged = a.merge(&b);
        assert_eq!(merged.total(), 5);
        assert_eq!(merged.count(code(2)), 3);
        assert_eq!(merged, b.merge(&a));
        assert_eq!(merged.merge(&TileHistogram::new()), merged);
    }

    #[test]
    fn it_record_raw_rejects_out_of_range() {
        let mut hist = TileHistogram::new();
        assert_eq!(hist.record_raw(7u8), Ok(code(7)));
        assert_eq!(hist.record_raw(16), Err(StatsError::Range(16)));
        assert_eq!(hist.record_raw(-3), Err(StatsError::Range(-3)));
        assert_eq!(hist.total(), 1);
    }

    #[test]
    fn it_nonzero_skips_empty_codes() {
        let hist = TileHistogram::from_counts([0, 0, 0, 5, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0]);
        let pairs: Vec<(u8, u64)> = hist.nonzero().map(|(c, n)| (c.get(), n)).collect();
        assert_eq!(pairs, vec![(3, 5), (11, 1)]);
        assert!(!hist.is_empty());
        assert!(TileHistogram::new().is_empty());
        assert_eq!(TileHistogram::new().highest(), None);
    }
}
