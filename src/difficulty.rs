use crate::UnknownDifficulty;
use std::fmt;
use std::str::FromStr;

/// Fixed board presets. The string key doubles as the score file tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    Easy,
    Medium,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Expert];

    /// `(width, height)` of the preset.
    pub fn dimensions(self) -> (i32, i32) {
        match self {
            Difficulty::Easy => (9, 9),
            Difficulty::Medium => (16, 16),
            Difficulty::Expert => (30, 16),
        }
    }

    pub fn mines(self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 40,
            Difficulty::Expert => 99,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.key() == s)
            .ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}
