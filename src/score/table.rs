use crate::Difficulty;
use std::fmt;

/// Number of entries kept per difficulty.
pub const MAX_SCORES: usize = 10;

/// A finished game's time in seconds, one decimal place.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    name: String,
    time: f64,
}

impl Score {
    /// `time` is rounded to tenths, the precision the score file keeps.
    pub fn new(name: impl Into<String>, time: f64) -> Self {
        Self {
            name: name.into(),
            time: (time * 10.0).round() / 10.0,
        }
    }

    /// Finite and not negative. Anything else cannot be read back from the
    /// score file.
    pub fn is_valid_time(time: f64) -> bool {
        time.is_finite() && time >= 0.0
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time(&self) -> f64 {
        self.time
    }
}

/// Best times for one difficulty, fastest first, at most [`MAX_SCORES`] long.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    difficulty: Difficulty,
    scores: Vec<Score>,
}

impl ScoreTable {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            scores: Vec::with_capacity(MAX_SCORES + 1),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Whether `time` would earn a place in the table.
    pub fn is_high_score(&self, time: f64) -> bool {
        if !Score::is_valid_time(time) {
            return false;
        }
        let time = Score::new("", time).time;
        self.scores.len() < MAX_SCORES || self.scores.iter().any(|score| time < score.time)
    }

    /// Inserts the score ahead of the first strictly slower entry and drops
    /// whatever falls off the end. Returns the rank it landed on, if any.
    /// Negative or non-finite times are refused.
    pub fn add_score(&mut self, name: impl Into<String>, time: f64) -> Option<usize> {
        if !Score::is_valid_time(time) {
            log::warn!("refusing score with time {}", time);
            return None;
        }

        let score = Score::new(name, time);
        let rank = self
            .scores
            .iter()
            .position(|existing| score.time < existing.time)
            .unwrap_or(self.scores.len());
        if rank >= MAX_SCORES {
            return None;
        }

        self.scores.insert(rank, score);
        self.scores.truncate(MAX_SCORES);
        Some(rank)
    }
}

/// One `difficulty;name;time` line per entry.
impl fmt::Display for ScoreTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for score in &self.scores {
            writeln!(f, "{};{};{:.1}", self.difficulty, score.name, score.time)?;
        }
        Ok(())
    }
}
