//! TETRIWELL - a falling-block puzzle engine
//!
//! The engine owns a padded well, a shuffled bag and the active piece. It has
//! no clock and draws nothing: callers feed it ticks and commands, then drain
//! the display intents it queued.

pub mod bag;
pub mod cadence;
pub mod game;
pub mod input;
pub mod intent;
pub mod piece;
pub mod score;
pub mod session;
pub mod settings;
pub mod tetromino;
pub mod well;

pub use game::{Action, Game, GameState, Outcome};
pub use intent::{Intent, RowMask};
pub use piece::Piece;
pub use score::{Scoreboard, Statistics, Summary};
pub use session::{Report, Session};
pub use settings::Settings;
pub use tetromino::{Rotation, RotationDirection, Shape};
pub use well::Well;
