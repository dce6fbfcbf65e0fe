mod store;
mod table;

pub use store::{parse_line, ScoreStore, SCORE_FILE};
pub use table::{Score, ScoreTable, MAX_SCORES};
