use serde::Serialize;

use crate::board::{Board, TileCode};

/// One finished game: the final board plus passthrough fields such as the
/// number of moves played. The library never interprets `aux`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct GameRecord {
    pub state: Board,
    pub aux: Vec<u64>,
}

impl GameRecord {
    pub fn new(state: Board) -> Self {
        Self { state, aux: Vec::new() }
    }

    pub fn with_aux(state: Board, aux: Vec<u64>) -> Self {
        Self { state, aux }
    }

    #[inline]
    pub fn max_code(&self) -> TileCode {
        self.state.max_tile_code()
    }

    /// Drop the board, keeping only its max tile code and the aux fields.
    pub fn into_summary(self) -> GameSummary {
        GameSummary { max_code: self.max_code(), aux: self.aux }
    }
}

impl From<Board> for GameRecord {
    fn from(state: Board) -> Self {
        GameRecord::new(state)
    }
}

impl From<u64> for GameRecord {
    fn from(raw: u64) -> Self {
        GameRecord::new(Board::from_raw(raw))
    }
}

/// `(state, moves)` as written by the game runner.
impl From<(u64, u64)> for GameRecord {
    fn from((raw, moves): (u64, u64)) -> Self {
        GameRecord::with_aux(Board::from_raw(raw), vec![moves])
    }
}

/// A game reduced to its max tile code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub max_code: TileCode,
    pub aux: Vec<u64>,
}

impl GameSummary {
    /// Auxiliary field `idx`, if the record carried one.
    pub fn aux(&self, idx: usize) -> Option<u64> {
        self.aux.get(idx).copied()
    }
}
