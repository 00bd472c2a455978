use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use serde::Serialize;

use crate::error::StatsError;
use crate::stats::TileHistogram;

/// Number of cells on the 4x4 grid.
pub const CELLS: usize = 16;

/// Number of distinct codes a 4-bit cell can hold.
pub const TILE_CODES: usize = 16;

/// Highest code a 4-bit cell can hold (tile value 32768).
pub const MAX_TILE_CODE: u8 = 15;

const NIBBLE_BITS: usize = 4;
const NIBBLE_MASK: u64 = 0xf;
const ROW_LEN: usize = 4;
const HEX_DIGITS: &[u8; TILE_CODES] = b"0123456789abcdef";

/// Exponent stored in one cell: 0 is an empty cell, `k > 0` a tile worth `2^k`.
///
/// Always within `0..=15`; the checked constructors reject anything wider.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct TileCode(u8);

impl TileCode {
    /// The empty cell.
    pub const EMPTY: TileCode = TileCode(0);
    /// The largest representable tile.
    pub const MAX: TileCode = TileCode(MAX_TILE_CODE);

    /// Validate a raw code.
    ///
    /// ```
    /// use tile_stats::board::TileCode;
    /// assert_eq!(TileCode::new(11).unwrap().display_value(), 2048);
    /// assert!(TileCode::new(16).is_err());
    /// ```
    pub fn new(code: u8) -> Result<Self, StatsError> {
        if code > MAX_TILE_CODE {
            return Err(StatsError::Range(code as i128));
        }
        Ok(TileCode(code))
    }

    #[inline]
    fn from_nibble(nibble: u64) -> Self {
        TileCode((nibble & NIBBLE_MASK) as u8)
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The tile value shown to players, `2^code`.
    #[inline]
    pub const fn display_value(self) -> u32 {
        1 << self.0
    }

    /// Lowercase hexadecimal digit for this code.
    #[inline]
    pub fn hex_digit(self) -> char {
        HEX_DIGITS[self.index()] as char
    }

    /// Every code from 0 to 15, ascending.
    pub fn all() -> impl DoubleEndedIterator<Item = TileCode> + ExactSizeIterator {
        (0..TILE_CODES as u8).map(TileCode)
    }
}

impl fmt::Debug for TileCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileCode({})", self.0)
    }
}

impl fmt::Display for TileCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for TileCode {
    type Error = StatsError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        TileCode::new(code)
    }
}

impl TryFrom<i64> for TileCode {
    type Error = StatsError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        u8::try_from(code)
            .map_err(|_| StatsError::Range(code as i128))
            .and_then(TileCode::new)
    }
}

impl From<TileCode> for u8 {
    fn from(code: TileCode) -> Self {
        code.0
    }
}

impl From<TileCode> for i64 {
    fn from(code: TileCode) -> Self {
        code.0 as i64
    }
}

/// Packed 4x4 board as 16 4-bit nibbles in a `u64`.
///
/// Cell `i` lives in bits `[4i, 4i + 4)`, so cell 0 is the least significant
/// nibble. Reading cells in that order and slicing them into rows of four puts
/// cell 0 at the top-left of the grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Board(u64);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board(0);

    /// Construct a `Board` from its raw packed representation.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Board(raw)
    }

    /// Consume this `Board`, returning the raw packed `u64`.
    #[inline]
    pub fn into_raw(self) -> u64 {
        self.0
    }

    /// Borrow the raw packed `u64` for this `Board`.
    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Pack one code per cell, cell 0 first.
    ///
    /// ```
    /// use tile_stats::board::Board;
    /// let mut codes = [0u8; 16];
    /// codes[0] = 1;
    /// codes[5] = 3;
    /// assert_eq!(Board::from_codes(codes).unwrap().raw(), 0x30_0001);
    /// ```
    pub fn from_codes(codes: [u8; CELLS]) -> Result<Self, StatsError> {
        codes
            .iter()
            .enumerate()
            .try_fold(0u64, |packed, (idx, &raw)| {
                let code = TileCode::new(raw)?;
                Ok(packed | (code.get() as u64) << (NIBBLE_BITS * idx))
            })
            .map(Board)
    }

    /// Code stored in cell `idx` (0..16).
    #[inline]
    pub fn tile_code(self, idx: usize) -> TileCode {
        assert!(idx < CELLS, "cell index {idx} out of range");
        TileCode::from_nibble(self.0 >> (NIBBLE_BITS * idx))
    }

    /// Iterate the 16 cell codes, least significant nibble first.
    #[inline]
    pub fn tiles(self) -> Tiles {
        Tiles { raw: self.0, remaining: CELLS }
    }

    /// Count how many cells hold each code. The total is always [`CELLS`].
    pub fn tile_histogram(self) -> TileHistogram {
        self.tiles().collect()
    }

    /// Highest code present on the board; 0 for the empty board.
    pub fn max_tile_code(self) -> TileCode {
        self.tile_histogram().highest().unwrap_or(TileCode::EMPTY)
    }

    /// One hexadecimal digit per cell in grid order.
    pub fn render(self) -> [char; CELLS] {
        let mut cells = ['0'; CELLS];
        for (slot, code) in cells.iter_mut().zip(self.tiles()) {
            *slot = code.hex_digit();
        }
        cells
    }
}

/// Decode a packed state into its highest tile code.
///
/// ```
/// use tile_stats::board::decode;
/// assert_eq!(decode(0).get(), 0);
/// assert_eq!(decode(0x0000_0000_00b0_0021).get(), 11);
/// ```
#[inline]
pub fn decode(state: u64) -> TileCode {
    Board::from_raw(state).max_tile_code()
}

/// Iterator over the cells of a [`Board`].
#[derive(Clone, Debug)]
pub struct Tiles {
    raw: u64,
    remaining: usize,
}

impl Iterator for Tiles {
    type Item = TileCode;

    #[inline]
    fn next(&mut self) -> Option<TileCode> {
        if self.remaining == 0 {
            return None;
        }
        let code = TileCode::from_nibble(self.raw);
        self.raw >>= NIBBLE_BITS;
        self.remaining -= 1;
        Some(code)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Tiles {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#018x})", self.0)
    }
}

// +--+--+
// |01|23|
// |45|67|
// +--+--+
// |89|ab|
// |cd|ef|
// +--+--+
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self.render();
        writeln!(f, "+--+--+")?;
        for (row_idx, row) in cells.chunks(ROW_LEN).enumerate() {
            writeln!(f, "|{}{}|{}{}|", row[0], row[1], row[2], row[3])?;
            if row_idx % 2 == 1 {
                writeln!(f, "+--+--+")?;
            }
        }
        Ok(())
    }
}

impl From<u64> for Board {
    fn from(raw: u64) -> Self {
        Board::from_raw(raw)
    }
}

impl From<Board> for u64 {
    fn from(board: Board) -> Self {
        board.into_raw()
    }
}

impl TryFrom<i64> for Board {
    type Error = StatsError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        u64::try_from(raw)
            .map(Board)
            .map_err(|_| StatsError::malformed(raw, "negative state"))
    }
}

impl TryFrom<i128> for Board {
    type Error = StatsError;

    fn try_from(raw: i128) -> Result<Self, Self::Error> {
        if raw < 0 {
            return Err(StatsError::malformed(raw, "negative state"));
        }
        u64::try_from(raw)
            .map(Board)
            .map_err(|_| StatsError::malformed(raw, "state wider than 64 bits"))
    }
}

/// Parse a decimal state, or a hexadecimal one with a `0x` prefix.
impl FromStr for Board {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.starts_with('-') {
            return Err(StatsError::malformed(text, "negative state"));
        }
        let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => text.parse::<u64>(),
        };
        parsed.map(Board).map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow => StatsError::malformed(text, "state wider than 64 bits"),
            IntErrorKind::Empty => StatsError::malformed(text, "empty state"),
            _ => StatsError::malformed(text, "not an unsigned integer"),
        })
    }
}
