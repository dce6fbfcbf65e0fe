use crate::{Cell, CellContent, GameError, Position};
use ndarray::Array2;
use rand::Rng;

/// The minefield: a fixed-size grid of cells indexed by `(x, y)`.
#[derive(Debug, Clone)]
pub struct Board {
    cells: Array2<Cell>,
    width: i32,
    height: i32,
    mines_count: u32,
}

impl Board {
    /// Checks the field parameters before any grid is built.
    pub fn validate(width: i32, height: i32, mines_count: u32) -> Result<(), GameError> {
        if width <= 0 || height <= 0 {
            return Err(GameError::InvalidDimensions { width, height });
        }
        if mines_count == 0 {
            return Err(GameError::NoMines);
        }
        if i64::from(mines_count) >= i64::from(width) * i64::from(height) {
            return Err(GameError::TooManyMines {
                width,
                height,
                mines: mines_count,
            });
        }
        Ok(())
    }

    /// Builds a board with mines at exactly the given positions.
    /// Duplicate positions count once.
    pub fn from_mines(width: i32, height: i32, mines: &[Position]) -> Result<Self, GameError> {
        if width <= 0 || height <= 0 {
            return Err(GameError::InvalidDimensions { width, height });
        }

        let mut board = Board::blank(width, height);
        for &pos in mines {
            board.place_mine(pos)?;
        }
        Board::validate(width, height, board.mines_count)?;
        board.set_adjacent_mines();
        Ok(board)
    }

    /// An all-empty grid. Callers must place mines and run the adjacency pass.
    pub(crate) fn blank(width: i32, height: i32) -> Self {
        let cells = Array2::from_shape_fn((width as usize, height as usize), |(x, y)| {
            Cell::new(Position::new(x as i32, y as i32))
        });
        Board {
            cells,
            width,
            height,
            mines_count: 0,
        }
    }

    pub(crate) fn place_mine(&mut self, pos: Position) -> Result<(), GameError> {
        let cell = self.cell_mut(pos)?;
        if !cell.is_mine() {
            cell.set_content(CellContent::Mine);
            self.mines_count += 1;
        }
        Ok(())
    }

    /// Recomputes the content of every non-mine cell from its neighbourhood.
    pub(crate) fn set_adjacent_mines(&mut self) {
        let counts = Array2::from_shape_fn(self.cells.dim(), |(x, y)| {
            self.count_adjacent_mines(Position::new(x as i32, y as i32))
        });
        for (cell, &count) in self.cells.iter_mut().zip(counts.iter()) {
            if !cell.is_mine() {
                cell.set_content(CellContent::from_count(count));
            }
        }
    }

    /// Moves the mine at `from` to a uniformly chosen mine-free cell and
    /// recomputes adjacency for the whole grid. Returns the new location.
    pub(crate) fn move_mine<R: Rng>(
        &mut self,
        from: Position,
        rng: &mut R,
    ) -> Result<Position, GameError> {
        let mut target = from;
        while self.get_cell(target)?.is_mine() {
            target = Position::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height));
        }

        self.cell_mut(target)?.set_content(CellContent::Mine);
        self.cell_mut(from)?.set_content(CellContent::Empty);
        self.set_adjacent_mines();
        log::debug!("moved mine from {} to {}", from, target);
        Ok(target)
    }

    pub fn is_within_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: Position) -> Result<[usize; 2], GameError> {
        if self.is_within_bounds(pos) {
            Ok([pos.x as usize, pos.y as usize])
        } else {
            Err(GameError::OutOfBounds(pos))
        }
    }

    pub fn get_cell(&self, pos: Position) -> Result<&Cell, GameError> {
        let index = self.index(pos)?;
        Ok(&self.cells[index])
    }

    pub(crate) fn cell_mut(&mut self, pos: Position) -> Result<&mut Cell, GameError> {
        let index = self.index(pos)?;
        Ok(&mut self.cells[index])
    }

    /// In-bounds neighbours of `pos`.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbors().filter(move |p| self.is_within_bounds(*p))
    }

    fn count_adjacent(&self, pos: Position, predicate: impl Fn(&Cell) -> bool) -> u8 {
        self.neighbors(pos)
            .filter(|p| self.get_cell(*p).map_or(false, &predicate))
            .count() as u8
    }

    pub fn count_adjacent_mines(&self, pos: Position) -> u8 {
        self.count_adjacent(pos, Cell::is_mine)
    }

    pub fn count_adjacent_flags(&self, pos: Position) -> u8 {
        self.count_adjacent(pos, Cell::is_flagged)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn total_cells(&self) -> u32 {
        self.cells.len() as u32
    }

    pub fn mines_count(&self) -> u32 {
        self.mines_count
    }
}
