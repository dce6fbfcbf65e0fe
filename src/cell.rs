use crate::Position;

/// What a cell holds. `Adjacent(n)` always has `n` in `1..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellContent {
    Mine,
    Empty,
    Adjacent(u8),
}

impl CellContent {
    pub(crate) fn from_count(count: u8) -> Self {
        match count {
            0 => CellContent::Empty,
            n => CellContent::Adjacent(n),
        }
    }

    /// Number of adjacent mines, or `None` for a mine.
    pub fn adjacent_mines(&self) -> Option<u8> {
        match self {
            CellContent::Mine => None,
            CellContent::Empty => Some(0),
            CellContent::Adjacent(n) => Some(*n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    content: CellContent,
    flagged: bool,
    revealed: bool,
}

impl Cell {
    pub(crate) fn new(position: Position) -> Self {
        Self {
            position,
            content: CellContent::Empty,
            flagged: false,
            revealed: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn content(&self) -> CellContent {
        self.content
    }

    pub fn is_mine(&self) -> bool {
        self.content == CellContent::Mine
    }

    pub fn is_empty(&self) -> bool {
        self.content == CellContent::Empty
    }

    pub fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub(crate) fn set_content(&mut self, content: CellContent) {
        self.content = content;
    }

    pub(crate) fn set_flagged(&mut self, flagged: bool) {
        debug_assert!(!(flagged && self.revealed), "revealed cell cannot be flagged");
        self.flagged = flagged;
    }

    pub(crate) fn set_revealed(&mut self) {
        debug_assert!(!self.flagged, "flagged cell cannot be revealed");
        self.revealed = true;
    }
}
