//! The padded playing field and collision detection
//!
//! The well stores the board plus a permanent border: 2 wall columns on each
//! side and 2 floor rows at the bottom. Collision tests index straight into
//! the padded grid, so the edges never need special cases.
//!
//! Rows are numbered from the top. The first 4 rows are the spawn buffer and
//! are not part of the visible board. Callers address columns in board
//! coordinates; the well shifts them past the left wall.

use crate::intent::RowMask;
use crate::piece::Piece;
use std::collections::VecDeque;
use std::fmt;

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;
/// Hidden rows above the visible board for spawning
pub const BUFFER_HEIGHT: usize = 4;
/// Wall thickness on the left, right and bottom
pub const BORDER: usize = 2;
pub const WELL_WIDTH: usize = BOARD_WIDTH + 2 * BORDER;
pub const WELL_HEIGHT: usize = BOARD_HEIGHT + BUFFER_HEIGHT + BORDER;
/// The row directly above the visible board. Anything settled here ends the game.
pub const OVERFLOW_ROW: usize = BUFFER_HEIGHT - 1;

type Row = [Cell; WELL_WIDTH];

/// A cell in the well
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Border cell, never cleared
    Wall,
    /// Settled block carrying its shape symbol
    Block(char),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Cell::Block(_))
    }

    fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => '#',
            Cell::Block(symbol) => symbol,
        }
    }
}

/// The game well
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Well {
    /// Row 0 is the top of the spawn buffer
    rows: VecDeque<Row>,
}

impl Default for Well {
    fn default() -> Self {
        Self::new()
    }
}

impl Well {
    /// Create an empty well surrounded by its border
    pub fn new() -> Self {
        let mut rows = VecDeque::with_capacity(WELL_HEIGHT);
        for _ in 0..WELL_HEIGHT - BORDER {
            rows.push_back(empty_row());
        }
        for _ in 0..BORDER {
            rows.push_back([Cell::Wall; WELL_WIDTH]);
        }
        Self { rows }
    }

    /// Number of rows including buffer and floor. Constant for the life of the well.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get a cell by raw well coordinates (border included).
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        self.rows
            .get(row as usize)
            .and_then(|cells| cells.get(col as usize))
            .copied()
    }

    /// Get a cell by board coordinates
    pub fn cell(&self, row: i32, col: i32) -> Option<Cell> {
        if !is_interior(row, col) {
            return None;
        }
        self.get(row, col + BORDER as i32)
    }

    /// Place a single block by board coordinates.
    /// Returns false for border or out of range positions
    pub fn fill(&mut self, row: i32, col: i32, symbol: char) -> bool {
        if !is_interior(row, col) {
            return false;
        }
        self.rows[row as usize][col as usize + BORDER] = Cell::Block(symbol);
        true
    }

    /// Check whether `piece` with its bounding box at board position
    /// `(row, col)` would overlap the border or a settled block
    pub fn check_collision(&self, piece: &Piece, row: i32, col: i32) -> bool {
        let col = col + BORDER as i32;
        if row < 0 || col < 0 || row + 4 > WELL_HEIGHT as i32 || col + 4 > WELL_WIDTH as i32 {
            return true;
        }
        piece
            .cells()
            .iter()
            .any(|&(dr, dc)| !self.rows[(row + dr) as usize][(col + dc) as usize].is_empty())
    }

    /// Whether a block has settled in the row just above the visible board
    pub fn overflow(&self) -> bool {
        self.rows[OVERFLOW_ROW][BORDER..WELL_WIDTH - BORDER]
            .iter()
            .any(|cell| !cell.is_empty())
    }

    /// Stamp a resting piece into the well and remove any rows it completed.
    ///
    /// The caller guarantees the piece fits at `(row, col)` and cannot move
    /// further down. Returns which of the 4 rows of the bounding box were
    /// removed; the same number of empty rows are pushed in at the top.
    pub fn settle(&mut self, piece: &Piece, row: i32, col: i32) -> RowMask {
        assert!(
            !self.check_collision(piece, row, col),
            "settle at colliding position ({}, {})",
            row,
            col
        );
        let col = col + BORDER as i32;
        let symbol = piece.symbol();
        for (dr, dc) in piece.cells() {
            self.rows[(row + dr) as usize][(col + dc) as usize] = Cell::Block(symbol);
        }

        // Bottom first so removals don't shift rows still to be checked
        let mut cleared = RowMask::EMPTY;
        for offset in (0..4u8).rev() {
            let target = (row + offset as i32) as usize;
            if self.is_row_full(target) {
                cleared.set(offset);
                self.rows.remove(target);
            }
        }
        for _ in 0..cleared.count() {
            self.rows.push_front(empty_row());
        }
        cleared
    }

    /// Check if a playable row is completely filled
    fn is_row_full(&self, row: usize) -> bool {
        if row >= WELL_HEIGHT - BORDER {
            return false;
        }
        self.rows[row][BORDER..WELL_WIDTH - BORDER]
            .iter()
            .all(|cell| cell.is_block())
    }

    /// Check if no blocks have settled anywhere
    pub fn is_empty(&self) -> bool {
        self.rows
            .iter()
            .take(WELL_HEIGHT - BORDER)
            .all(|cells| cells[BORDER..WELL_WIDTH - BORDER].iter().all(Cell::is_empty))
    }
}

/// Whole well including the border, one line per row
impl fmt::Display for Well {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cells) in self.rows.iter().enumerate() {
            let line: String = cells.iter().map(|cell| cell.to_char()).collect();
            if i + 1 < self.rows.len() {
                writeln!(f, "{}", line)?;
            } else {
                write!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}

fn empty_row() -> Row {
    let mut cells = [Cell::Empty; WELL_WIDTH];
    cells[..BORDER].fill(Cell::Wall);
    cells[WELL_WIDTH - BORDER..].fill(Cell::Wall);
    cells
}

fn is_interior(row: i32, col: i32) -> bool {
    (0..(WELL_HEIGHT - BORDER) as i32).contains(&row) && (0..BOARD_WIDTH as i32).contains(&col)
}
