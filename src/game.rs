//! Core game state and logic
//!
//! `Game` owns the well and the bag and runs the active piece through its
//! life: spawn, move, rotate, hold, drop and settle. Settling a piece that
//! completes rows does not remove them from view straight away. The rows are
//! highlighted, the game enters `ClearPending`, and the next tick flushes
//! them and spawns the following piece.
//!
//! The engine has no clock. A scheduler calls [`Game::tick`] and an input
//! layer calls the commands; both must be serialized onto one thread of
//! control. Everything a renderer needs is queued as [`Intent`]s.

use crate::bag::Bag;
use crate::intent::{Intent, RowMask};
use crate::piece::Piece;
use crate::score::Statistics;
use crate::tetromino::{RotationDirection, Shape};
use crate::well::{BOARD_WIDTH, Well};
use serde::Serialize;

/// Bounding box origin for every new piece
pub const SPAWN_ROW: i32 = 0;
pub const SPAWN_COL: i32 = (BOARD_WIDTH as i32 - 4) / 2;

/// Rows waiting to be flushed on the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingClear {
    /// Top row of the settled piece's bounding box
    pub first_row: i32,
    pub rows: RowMask,
}

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Active,
    /// Highlighted rows are on screen; every command except `tick` is refused
    ClearPending(PendingClear),
    /// Terminal until [`Game::reset`]
    GameOver,
}

/// Directions a piece can be moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    /// (row, col) step
    fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
        }
    }
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveDown,
    RotateCw,
    RotateCcw,
    Hold,
    HardDrop,
}

/// Result of a drop or a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not allowed in the current state, nothing changed
    Rejected,
    /// The piece moved down one row
    Fell,
    /// The piece settled without completing a row; the next one spawned
    Locked,
    /// The piece settled and completed rows. The scheduler should wait one
    /// extra tick so the highlight stays visible.
    ClearPending,
    /// Highlighted rows were flushed and the next piece spawned
    Cleared,
    /// The well overflowed when the next piece tried to spawn
    GameOver,
}

impl Outcome {
    pub fn needs_delay(&self) -> bool {
        matches!(self, Outcome::ClearPending)
    }
}

/// The main game struct
pub struct Game {
    well: Well,
    bag: Bag,
    /// Seed the bag was built from, reused by `reset`
    seed: Option<u64>,
    current: Piece,
    /// Bounding box origin in board coordinates
    row: i32,
    col: i32,
    /// Row the ghost projection sits at
    ghost_row: i32,
    held: Option<Piece>,
    /// Hold already used since the last spawn
    exchanged: bool,
    state: GameState,
    stats: Statistics,
    show_ghost: bool,
    intents: Vec<Intent>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Create a new game with an entropy-seeded bag
    pub fn new() -> Self {
        Self::build(Well::new(), Bag::new(), None)
    }

    /// Create a new game whose piece sequence is fixed by `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::build(Well::new(), Bag::with_seed(seed), Some(seed))
    }

    /// Start from an existing well and bag, e.g. a pre-filled puzzle
    pub fn from_parts(well: Well, bag: Bag) -> Self {
        Self::build(well, bag, None)
    }

    fn build(well: Well, bag: Bag, seed: Option<u64>) -> Self {
        let current = Piece::new(bag.peek_next());
        let mut game = Self {
            well,
            bag,
            seed,
            current,
            row: SPAWN_ROW,
            col: SPAWN_COL,
            ghost_row: SPAWN_ROW,
            held: None,
            exchanged: false,
            state: GameState::Active,
            stats: Statistics::new(),
            show_ghost: true,
            intents: Vec::new(),
        };
        game.spawn();
        game
    }

    /// Throw away the current game and start over
    pub fn reset(&mut self) {
        self.well = Well::new();
        self.bag = match self.seed {
            Some(seed) => Bag::with_seed(seed),
            None => Bag::new(),
        };
        self.held = None;
        self.stats = Statistics::new();
        self.state = GameState::Active;
        self.intents.clear();
        tracing::debug!(seed = ?self.seed, "game reset");
        self.spawn();
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn pending_clear(&self) -> Option<PendingClear> {
        match self.state {
            GameState::ClearPending(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn well(&self) -> &Well {
        &self.well
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    /// (row, col) of the current piece's bounding box
    pub fn position(&self) -> (i32, i32) {
        (self.row, self.col)
    }

    pub fn ghost_row(&self) -> i32 {
        self.ghost_row
    }

    pub fn held(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    /// Shape shown in the next-piece preview
    pub fn next_shape(&self) -> Shape {
        self.bag.peek_next()
    }

    pub fn show_ghost(&self) -> bool {
        self.show_ghost
    }

    /// Turn the ghost projection on or off
    pub fn set_show_ghost(&mut self, show: bool) {
        if show == self.show_ghost {
            return;
        }
        // While a clear is pending the ghost sits under the settled piece
        if self.state == GameState::Active {
            let intent = if show {
                Intent::display_ghost(&self.current, self.ghost_row, self.col)
            } else {
                Intent::erase(&self.current, self.ghost_row, self.col)
            };
            self.intents.push(intent);
            // The ghost may overlap the piece, which is always drawn on top
            self.intents
                .push(Intent::display_piece(&self.current, self.row, self.col));
        }
        self.show_ghost = show;
    }

    /// Drain the queued intents in emission order
    pub fn take_intents(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.intents)
    }

    /// Process an input action. Returns false if it was refused.
    pub fn process_action(&mut self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_piece(Direction::Left),
            Action::MoveRight => self.move_piece(Direction::Right),
            Action::MoveDown => self.move_piece(Direction::Down),
            Action::RotateCw => self.rotate(RotationDirection::Clockwise),
            Action::RotateCcw => self.rotate(RotationDirection::CounterClockwise),
            Action::Hold => self.hold(),
            Action::HardDrop => self.hard_drop() != Outcome::Rejected,
        }
    }

    /// Advance one scheduler step: flush a pending clear, otherwise apply gravity
    pub fn tick(&mut self) -> Outcome {
        match self.state {
            GameState::ClearPending(_) => self.clear_flush(),
            _ => self.gravity_tick(),
        }
    }

    /// Move down one row, settling the piece if it cannot
    pub fn gravity_tick(&mut self) -> Outcome {
        if self.state != GameState::Active {
            return Outcome::Rejected;
        }
        if self.move_piece(Direction::Down) {
            Outcome::Fell
        } else {
            self.settle()
        }
    }

    /// Remove the highlighted rows and spawn the next piece
    pub fn clear_flush(&mut self) -> Outcome {
        let GameState::ClearPending(pending) = self.state else {
            return Outcome::Rejected;
        };
        self.intents.push(Intent::Clear {
            first_row: pending.first_row,
            rows: pending.rows,
        });
        self.stats.record_clear(pending.rows.count());
        tracing::debug!(
            first_row = pending.first_row,
            rows = pending.rows.bits(),
            lines = pending.rows.count(),
            "rows flushed"
        );
        self.state = GameState::Active;
        if self.spawn() {
            Outcome::Cleared
        } else {
            Outcome::GameOver
        }
    }

    /// Try to move the current piece one cell
    pub fn move_piece(&mut self, direction: Direction) -> bool {
        if self.state != GameState::Active {
            tracing::trace!(?direction, state = ?self.state, "move refused");
            return false;
        }
        let (dr, dc) = direction.offset();
        if self.well.check_collision(&self.current, self.row + dr, self.col + dc) {
            return false;
        }
        self.erase();
        self.row += dr;
        self.col += dc;
        self.display();
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.move_piece(Direction::Left)
    }

    pub fn move_right(&mut self) -> bool {
        self.move_piece(Direction::Right)
    }

    pub fn move_down(&mut self) -> bool {
        self.move_piece(Direction::Down)
    }

    /// Try to rotate in place. There are no wall kicks: if the turned piece
    /// overlaps anything the rotation is simply refused.
    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        if self.state != GameState::Active {
            tracing::trace!(?direction, state = ?self.state, "rotate refused");
            return false;
        }
        let turned = self.current.rotated(direction);
        if self.well.check_collision(&turned, self.row, self.col) {
            return false;
        }
        self.erase();
        self.current = turned;
        self.display();
        true
    }

    /// Swap the current piece with the hold slot, once per spawned piece.
    /// With an empty slot the current piece is stored and the next one spawns.
    pub fn hold(&mut self) -> bool {
        if self.state != GameState::Active || self.exchanged {
            tracing::trace!(exchanged = self.exchanged, "hold refused");
            return false;
        }
        self.erase();
        match self.held.replace(self.current) {
            None => {
                self.spawn();
            }
            Some(piece) => {
                // Keeps whatever rotation it was held with
                self.current = piece;
                self.row = SPAWN_ROW;
                self.col = SPAWN_COL;
                self.display();
            }
        }
        self.exchanged = true;
        if let (GameState::Active, Some(held)) = (self.state, self.held) {
            self.intents.push(Intent::Hold { piece: held });
        }
        true
    }

    /// Drop the current piece as far as it goes and settle it
    pub fn hard_drop(&mut self) -> Outcome {
        if self.state != GameState::Active {
            return Outcome::Rejected;
        }
        self.erase();
        while !self
            .well
            .check_collision(&self.current, self.row + 1, self.col)
        {
            self.row += 1;
        }
        self.display();
        self.settle()
    }

    /// Commit the resting piece to the well
    fn settle(&mut self) -> Outcome {
        let rows = self.well.settle(&self.current, self.row, self.col);
        tracing::debug!(
            shape = ?self.current.shape,
            row = self.row,
            col = self.col,
            rows = rows.bits(),
            "piece settled"
        );
        if rows.is_empty() {
            return if self.spawn() {
                Outcome::Locked
            } else {
                Outcome::GameOver
            };
        }
        self.intents.push(Intent::Highlight {
            first_row: self.row,
            rows,
        });
        self.state = GameState::ClearPending(PendingClear {
            first_row: self.row,
            rows,
        });
        Outcome::ClearPending
    }

    /// Bring in the next piece from the bag. Returns false, and ends the
    /// game, if the well has overflowed.
    fn spawn(&mut self) -> bool {
        if self.well.overflow() {
            self.state = GameState::GameOver;
            tracing::info!(stats = ?self.stats, "well overflowed, game over");
            return false;
        }
        self.current = Piece::new(self.bag.take_next());
        self.row = SPAWN_ROW;
        self.col = SPAWN_COL;
        self.display();
        self.intents.push(Intent::Next {
            piece: Piece::new(self.bag.peek_next()),
        });
        self.stats.pieces_dropped += 1;
        self.exchanged = false;
        self.state = GameState::Active;
        tracing::debug!(
            shape = ?self.current.shape,
            next = ?self.bag.peek_next(),
            "spawned"
        );
        true
    }

    /// Recompute the ghost and queue the piece (and ghost) for display
    fn display(&mut self) {
        self.ghost_row = self.row;
        while !self
            .well
            .check_collision(&self.current, self.ghost_row + 1, self.col)
        {
            self.ghost_row += 1;
        }
        if self.show_ghost {
            self.intents
                .push(Intent::display_ghost(&self.current, self.ghost_row, self.col));
        }
        self.intents
            .push(Intent::display_piece(&self.current, self.row, self.col));
    }

    /// Queue the piece (and ghost) for erasing at their current positions
    fn erase(&mut self) {
        if self.show_ghost {
            self.intents
                .push(Intent::erase(&self.current, self.ghost_row, self.col));
        }
        self.intents
            .push(Intent::erase(&self.current, self.row, self.col));
    }
}
