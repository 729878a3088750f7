//! A tetromino with an orientation
//!
//! A `Piece` knows nothing about where it sits in the well. Position lives
//! in the game session, and legality of a rotation is checked by the caller
//! against the well.

use crate::tetromino::{Rotation, RotationDirection, Shape};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Piece {
    /// Never changes once assigned
    pub shape: Shape,
    pub rotation: Rotation,
}

impl Piece {
    /// Create a piece at the spawn rotation
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            rotation: Rotation::North,
        }
    }

    /// Offsets of the 4 blocks inside the 4x4 bounding box
    pub fn cells(&self) -> [(i32, i32); 4] {
        self.shape.coordinates(self.rotation)
    }

    pub fn symbol(&self) -> char {
        self.shape.symbol()
    }

    pub fn ghost_symbol(&self) -> char {
        self.shape.ghost_symbol()
    }

    pub fn rotate(&mut self, direction: RotationDirection) {
        self.rotation = self.rotation.turn(direction);
    }

    /// Copy of this piece turned one step
    pub fn rotated(&self, direction: RotationDirection) -> Piece {
        let mut piece = *self;
        piece.rotate(direction);
        piece
    }

    /// Whether the bounding box cell `(row, col)` holds a block
    pub fn has_cell(&self, row: i32, col: i32) -> bool {
        self.cells().contains(&(row, col))
    }
}

/// Draws the 4x4 bounding box, blocks as the shape letter and gaps as `.`
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            for col in 0..4 {
                let ch = if self.has_cell(row, col) {
                    self.symbol()
                } else {
                    '.'
                };
                write!(f, "{}", ch)?;
            }
            if row < 3 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_piece_is_north() {
        let piece = Piece::new(Shape::L);
        assert_eq!(piece.rotation, Rotation::North);
        assert_eq!(piece.symbol(), 'L');
        assert_eq!(piece.ghost_symbol(), 'l');
    }

    #[test]
    fn test_rotate_cycles() {
        let mut piece = Piece::new(Shape::T);
        for _ in 0..4 {
            piece.rotate(RotationDirection::Clockwise);
        }
        assert_eq!(piece.rotation, Rotation::North);
        piece.rotate(RotationDirection::CounterClockwise);
        assert_eq!(piece.rotation, Rotation::West);
    }

    #[test]
    fn test_rotated_leaves_original() {
        let piece = Piece::new(Shape::S);
        let turned = piece.rotated(RotationDirection::Clockwise);
        assert_eq!(piece.rotation, Rotation::North);
        assert_eq!(turned.rotation, Rotation::East);
        assert_eq!(turned.shape, Shape::S);
    }

    #[test]
    fn test_display_t() {
        let piece = Piece::new(Shape::T);
        assert_eq!(piece.to_string(), "....\n.T..\nTTT.\n....");
    }
}
