//! Dropline Board
//!
//! This crate contains the four-in-a-row grid model. It is the authoritative
//! source of truth for where a piece lands and whether a placement ends the
//! game.
//!
//! # Architecture Constraints
//!
//! The board MUST NOT:
//! - Perform I/O operations (file, network, etc.)
//! - Know about connections, sessions, or turn order
//!
//! Every operation is a pure function of the grid value it is called on.
//!
//! # Grid Conventions
//!
//! - Row 0 is the top row, row `ROWS - 1` the bottom row.
//! - Pieces fall under gravity: each column fills bottom-up.
//! - A column is full iff its row-0 cell is occupied.

#![deny(unsafe_code)]

use std::fmt;

// ============================================================================
// Fixed Parameters
// ============================================================================

/// Number of rows on the board.
pub const ROWS: usize = 6;

/// Number of columns on the board.
pub const COLS: usize = 7;

/// Contiguous run length that wins the game.
pub const WIN_LENGTH: usize = 4;

/// Scan axes as (row step, column step): horizontal, vertical, `\`, `/`.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

// ============================================================================
// Core Types
// ============================================================================

/// One of the two seats in a match.
///
/// Player one always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerNumber {
    One,
    Two,
}

impl PlayerNumber {
    /// The opposing seat.
    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Wire value (1 or 2).
    pub fn as_u32(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// Parse a wire value. Anything other than 1 or 2 is `None`.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Contents of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Taken(PlayerNumber),
}

impl Cell {
    /// Wire value: 0 for empty, otherwise the owning player number.
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Empty => 0,
            Self::Taken(player) => player.as_u32(),
        }
    }
}

/// Where a piece came to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
}

/// Reasons a piece cannot be placed.
///
/// Callers are expected to check [`Board::is_valid_move`] first, so either
/// variant indicates a caller bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("column {0} is out of range")]
    ColumnOutOfRange(usize),
}

// ============================================================================
// Board
// ============================================================================

/// A `ROWS` × `COLS` grid under gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at `(row, col)`.
    ///
    /// # Panics
    /// If `row >= ROWS` or `col >= COLS`.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Rows from top (row 0) to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; COLS]> {
        self.cells.iter()
    }

    /// True iff `col` is on the board and its top cell is still empty.
    pub fn is_valid_move(&self, col: usize) -> bool {
        col < COLS && self.cells[0][col] == Cell::Empty
    }

    /// Drop a piece for `player` into `col`.
    ///
    /// The piece lands in the lowest empty row of the column. On error the
    /// board is left unchanged.
    pub fn make_move(
        &mut self,
        col: usize,
        player: PlayerNumber,
    ) -> Result<Placement, PlacementError> {
        if col >= COLS {
            return Err(PlacementError::ColumnOutOfRange(col));
        }

        let row = (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][col] == Cell::Empty)
            .ok_or(PlacementError::ColumnFull(col))?;

        self.cells[row][col] = Cell::Taken(player);
        Ok(Placement { row, col })
    }

    /// Check whether the piece at `last` completes a run for `player`.
    ///
    /// Only the four axes through `last` are scanned; a win can only be
    /// completed by the most recent placement.
    pub fn check_win(&self, player: PlayerNumber, last: Placement) -> bool {
        let target = Cell::Taken(player);
        if last.row >= ROWS || last.col >= COLS || self.get(last.row, last.col) != target {
            return false;
        }

        AXES.iter().any(|&(dr, dc)| {
            let forward = self.run_length(last, dr, dc, target);
            let backward = self.run_length(last, -dr, -dc, target);
            1 + forward + backward >= WIN_LENGTH
        })
    }

    /// True iff every column is full.
    pub fn is_full(&self) -> bool {
        self.cells[0].iter().all(|&cell| cell != Cell::Empty)
    }

    /// Count contiguous `target` cells stepping away from `from` (exclusive).
    fn run_length(&self, from: Placement, dr: isize, dc: isize, target: Cell) -> usize {
        let mut count = 0;
        let (mut row, mut col) = (from.row as isize, from.col as isize);

        // A run longer than WIN_LENGTH - 1 on one side changes nothing.
        while count < WIN_LENGTH - 1 {
            row += dr;
            col += dc;
            if row < 0 || col < 0 || row >= ROWS as isize || col >= COLS as isize {
                break;
            }
            if self.cells[row as usize][col as usize] != target {
                break;
            }
            count += 1;
        }

        count
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
