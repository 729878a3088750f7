//! Tetromino definitions and shapes
//!
//! Every shape is described inside a 4x4 bounding box. Offsets are
//! `(row, col)` pairs where row 0 is the top of the box and rows grow
//! downward, the same orientation as the well.

use serde::Serialize;

/// The 7 tetromino shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Shape {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl Shape {
    /// Get all shapes, in bag refill order
    pub fn all() -> [Shape; 7] {
        [
            Shape::I,
            Shape::J,
            Shape::L,
            Shape::O,
            Shape::S,
            Shape::T,
            Shape::Z,
        ]
    }

    /// Canonical symbol stamped into the well for this shape
    pub fn symbol(&self) -> char {
        match self {
            Shape::I => 'I',
            Shape::J => 'J',
            Shape::L => 'L',
            Shape::O => 'O',
            Shape::S => 'S',
            Shape::T => 'T',
            Shape::Z => 'Z',
        }
    }

    /// Symbol used for the ghost projection
    pub fn ghost_symbol(&self) -> char {
        self.symbol().to_ascii_lowercase()
    }

    /// Get the four occupied cells of this shape at a given rotation
    ///
    /// ```text
    ///    0 1 2 3
    ///  0 . . . .
    ///  1 . T . .      T at North: (1,1) (2,0) (2,1) (2,2)
    ///  2 T T T .
    ///  3 . . . .
    /// ```
    pub fn coordinates(&self, rotation: Rotation) -> [(i32, i32); 4] {
        match self {
            Shape::I => match rotation {
                Rotation::North => [(1, 0), (1, 1), (1, 2), (1, 3)],
                Rotation::East => [(0, 2), (1, 2), (2, 2), (3, 2)],
                Rotation::South => [(2, 0), (2, 1), (2, 2), (2, 3)],
                Rotation::West => [(0, 1), (1, 1), (2, 1), (3, 1)],
            },
            Shape::J => match rotation {
                Rotation::North => [(1, 0), (2, 0), (2, 1), (2, 2)],
                Rotation::East => [(1, 1), (1, 2), (2, 1), (3, 1)],
                Rotation::South => [(2, 0), (2, 1), (2, 2), (3, 2)],
                Rotation::West => [(1, 1), (2, 1), (3, 0), (3, 1)],
            },
            Shape::L => match rotation {
                Rotation::North => [(1, 2), (2, 0), (2, 1), (2, 2)],
                Rotation::East => [(1, 1), (2, 1), (3, 1), (3, 2)],
                Rotation::South => [(2, 0), (2, 1), (2, 2), (3, 0)],
                Rotation::West => [(1, 0), (1, 1), (2, 1), (3, 1)],
            },
            // O looks the same at every rotation
            Shape::O => [(1, 1), (1, 2), (2, 1), (2, 2)],
            // North: .SS.   East: .S..
            //        SS..         .SS.
            //                     ..S.
            Shape::S => match rotation {
                Rotation::North => [(1, 1), (1, 2), (2, 0), (2, 1)],
                Rotation::East => [(1, 1), (2, 1), (2, 2), (3, 2)],
                Rotation::South => [(2, 1), (2, 2), (3, 0), (3, 1)],
                Rotation::West => [(1, 0), (2, 0), (2, 1), (3, 1)],
            },
            Shape::T => match rotation {
                Rotation::North => [(1, 1), (2, 0), (2, 1), (2, 2)],
                Rotation::East => [(1, 1), (2, 1), (2, 2), (3, 1)],
                Rotation::South => [(2, 0), (2, 1), (2, 2), (3, 1)],
                Rotation::West => [(1, 1), (2, 0), (2, 1), (3, 1)],
            },
            // North: ZZ..   East: ..Z.
            //        .ZZ.         .ZZ.
            //                     .Z..
            Shape::Z => match rotation {
                Rotation::North => [(1, 0), (1, 1), (2, 1), (2, 2)],
                Rotation::East => [(1, 2), (2, 1), (2, 2), (3, 1)],
                Rotation::South => [(2, 0), (2, 1), (3, 1), (3, 2)],
                Rotation::West => [(1, 1), (2, 0), (2, 1), (3, 0)],
            },
        }
    }
}

/// Rotation states, North is the spawn orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Rotation {
    #[default]
    North, // 0 degrees
    East,  // 90 degrees clockwise
    South, // 180
    West,  // 270
}

impl Rotation {
    pub fn all() -> [Rotation; 4] {
        [
            Rotation::North,
            Rotation::East,
            Rotation::South,
            Rotation::West,
        ]
    }

    /// Rotate clockwise: North → East → South → West → North
    pub fn cw(&self) -> Rotation {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise: North → West → South → East → North
    pub fn ccw(&self) -> Rotation {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Step once in the given direction
    pub fn turn(&self, direction: RotationDirection) -> Rotation {
        match direction {
            RotationDirection::Clockwise => self.cw(),
            RotationDirection::CounterClockwise => self.ccw(),
        }
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_rotation_has_four_distinct_cells_in_box() {
        for shape in Shape::all() {
            for rotation in Rotation::all() {
                let cells = shape.coordinates(rotation);
                let unique: HashSet<_> = cells.iter().collect();
                assert_eq!(unique.len(), 4, "{:?} {:?}", shape, rotation);
                for (r, c) in cells {
                    assert!((0..4).contains(&r));
                    assert!((0..4).contains(&c));
                }
            }
        }
    }

    #[test]
    fn test_four_turns_is_identity() {
        for rotation in Rotation::all() {
            let mut cw = rotation;
            let mut ccw = rotation;
            for _ in 0..4 {
                cw = cw.cw();
                ccw = ccw.ccw();
            }
            assert_eq!(cw, rotation);
            assert_eq!(ccw, rotation);
        }
    }

    #[test]
    fn test_cw_then_ccw_returns() {
        for rotation in Rotation::all() {
            assert_eq!(rotation.cw().ccw(), rotation);
            assert_eq!(
                rotation
                    .turn(RotationDirection::Clockwise)
                    .turn(RotationDirection::CounterClockwise),
                rotation
            );
        }
    }

    #[test]
    fn test_symbols() {
        assert_eq!(Shape::T.symbol(), 'T');
        assert_eq!(Shape::T.ghost_symbol(), 't');
        let symbols: HashSet<_> = Shape::all().iter().map(|s| s.symbol()).collect();
        assert_eq!(symbols.len(), 7);
    }

    #[test]
    fn test_o_is_rotation_invariant() {
        let north = Shape::O.coordinates(Rotation::North);
        for rotation in Rotation::all() {
            assert_eq!(Shape::O.coordinates(rotation), north);
        }
    }
}
