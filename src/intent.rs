//! Display intents emitted by the engine
//!
//! The engine never draws. Each command appends what changed to an ordered
//! queue and a renderer replays it. Positions are board coordinates: row 0 is
//! the top of the spawn buffer, column 0 the leftmost playable column.

use crate::piece::Piece;
use serde::Serialize;

/// Which of the 4 rows spanned by a bounding box are involved.
/// Bit `r` stands for row `first_row + r`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct RowMask(u8);

impl RowMask {
    pub const EMPTY: RowMask = RowMask(0);

    /// Only the low 4 bits are kept
    pub fn new(bits: u8) -> Self {
        RowMask(bits & 0b1111)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn contains(&self, offset: u8) -> bool {
        offset < 4 && self.0 & (1 << offset) != 0
    }

    pub fn set(&mut self, offset: u8) {
        if offset < 4 {
            self.0 |= 1 << offset;
        }
    }

    /// Absolute rows covered, top to bottom
    pub fn rows(&self, first_row: i32) -> impl Iterator<Item = i32> + use<> {
        let mask = *self;
        (0..4u8)
            .filter(move |&r| mask.contains(r))
            .map(move |r| first_row + r as i32)
    }
}

/// One change for the renderer to apply, in emission order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    /// Draw the active piece
    DisplayPiece {
        row: i32,
        col: i32,
        cells: [(i32, i32); 4],
        symbol: char,
    },
    /// Draw the landing projection of the active piece
    DisplayGhost {
        row: i32,
        col: i32,
        cells: [(i32, i32); 4],
        symbol: char,
    },
    /// Blank out cells previously drawn for a piece or ghost
    Erase {
        row: i32,
        col: i32,
        cells: [(i32, i32); 4],
    },
    /// Preview of the shape that spawns next
    Next { piece: Piece },
    /// The piece now in the hold slot
    Hold { piece: Piece },
    /// Rows completed by a settle, shown for one tick before removal
    Highlight { first_row: i32, rows: RowMask },
    /// Remove the previously highlighted rows
    Clear { first_row: i32, rows: RowMask },
}

impl Intent {
    pub fn display_piece(piece: &Piece, row: i32, col: i32) -> Self {
        Intent::DisplayPiece {
            row,
            col,
            cells: piece.cells(),
            symbol: piece.symbol(),
        }
    }

    pub fn display_ghost(piece: &Piece, row: i32, col: i32) -> Self {
        Intent::DisplayGhost {
            row,
            col,
            cells: piece.cells(),
            symbol: piece.ghost_symbol(),
        }
    }

    pub fn erase(piece: &Piece, row: i32, col: i32) -> Self {
        Intent::Erase {
            row,
            col,
            cells: piece.cells(),
        }
    }
}
