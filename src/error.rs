use thiserror::Error;

/// Errors raised by the decoder and the aggregator.
///
/// Every variant is returned at the boundary of the offending call; nothing in
/// the library recovers from them on the caller's behalf.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("tile code {0} outside 0..=15")]
    Range(i128),
    #[error("cannot aggregate an empty batch of games")]
    EmptyBatch,
    #[error("malformed board state {value:?}: {reason}")]
    MalformedState { value: String, reason: &'static str },
}

impl StatsError {
    pub(crate) fn malformed(value: impl ToString, reason: &'static str) -> Self {
        StatsError::MalformedState { value: value.to_string(), reason }
    }
}
