use crate::Position;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Position {0} is out of bounds")]
    OutOfBounds(Position),
    #[error("Game is over, no further moves are accepted")]
    GameOver,
    #[error("Invalid board size {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("Too many mines ({mines}) for board size {width}x{height}")]
    TooManyMines { width: i32, height: i32, mines: u32 },
    #[error("A board needs at least one mine")]
    NoMines,
}

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Score line {line:?} has too few fields")]
    MissingFields { line: String },
    #[error("Score line {line:?} has an invalid time {value:?}")]
    InvalidTime { line: String, value: String },
    #[error("Score line {line:?} has an unknown difficulty {difficulty:?}")]
    UnknownDifficulty { line: String, difficulty: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown difficulty {0:?}, expected easy, medium or expert")]
pub struct UnknownDifficulty(pub String);
