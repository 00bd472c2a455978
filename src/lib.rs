//! tile-stats: end-of-game statistics for packed 2048 boards
//!
//! This crate provides:
//! - A packed `Board` type, 16 4-bit tile codes in a `u64`, with a decoder for
//!   the highest tile reached (`board` module)
//! - Histogram and threshold aggregation over a batch of games, sequential or
//!   on the rayon pool (`stats` module)
//! - A canonical `GameRecord` shape with passthrough auxiliary fields
//!   (`record` module) and line-oriented readers for result files (`input`)
//!
//! Quick start:
//! ```
//! use tile_stats::board::decode;
//! use tile_stats::stats::{self, Aggregator};
//!
//! // Decode final boards into their max tile codes
//! let states = [0x0000_0000_00b0_0021_u64, 0x0000_0000_000b_0000, 0x0d00_0000_0000_0001];
//! let maxima: Vec<u8> = states.iter().map(|&s| decode(s).get()).collect();
//! assert_eq!(maxima, vec![11, 11, 13]);
//!
//! // Aggregate; rows come out most advanced tile first by default
//! let report = stats::aggregate(maxima).unwrap();
//! assert_eq!(report.rows()[0].display_value, 8192);
//!
//! // The same, decoding in parallel
//! let par = Aggregator::default().aggregate_states(&states).unwrap();
//! assert_eq!(par, report);
//! ```
//!
pub mod board;
pub mod error;
pub mod input;
pub mod record;
pub mod stats;

pub use board::{decode, Board, TileCode, CELLS};
pub use error::StatsError;
pub use record::{GameRecord, GameSummary};
pub use stats::{aggregate, summarize, AggregateConfig, Aggregator, Report, RowOrder};
