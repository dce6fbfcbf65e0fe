pub mod board;
pub mod cell;
pub mod clock;
pub mod difficulty;
pub mod error;
pub mod game;
pub mod generator;
pub mod position;
pub mod score;

pub use board::Board;
pub use cell::{Cell, CellContent};
pub use clock::{GameClock, Ticker};
pub use difficulty::Difficulty;
pub use error::{GameError, ScoreError, UnknownDifficulty};
pub use game::{Action, Game, GameState};
pub use generator::create_field;
pub use position::Position;
pub use score::{Score, ScoreStore, ScoreTable};
