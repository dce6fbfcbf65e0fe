use crate::{generator, Board, Cell, CellContent, Difficulty, GameError, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Unfinished,
    Won,
    Lost,
}

impl GameState {
    pub fn is_finished(self) -> bool {
        matches!(self, GameState::Won | GameState::Lost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Reveal,
    Flag,
    Chord,
}

/// One game session: the field plus the counters that drive the win/loss
/// state machine.
///
/// `remaining_mines` is the player-facing countdown, always
/// `mines_count - flag_count`. Flagging is refused once it reaches zero.
#[derive(Debug)]
pub struct Game<R = StdRng> {
    board: Board,
    rng: R,
    state: GameState,
    remaining_mines: u32,
    unrevealed_count: u32,
    flag_count: u32,
    first_move: bool,
}

impl Game<StdRng> {
    pub fn new(width: i32, height: i32, mines_count: u32) -> Result<Self, GameError> {
        Self::with_rng(width, height, mines_count, StdRng::from_entropy())
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(
        width: i32,
        height: i32,
        mines_count: u32,
        mut rng: R,
    ) -> Result<Self, GameError> {
        let board = generator::create_field(width, height, mines_count, &mut rng)?;
        Ok(Self::from_board(board, rng))
    }

    pub fn for_difficulty(difficulty: Difficulty, rng: R) -> Result<Self, GameError> {
        let (width, height) = difficulty.dimensions();
        Self::with_rng(width, height, difficulty.mines(), rng)
    }

    /// Starts a session on an existing field. `rng` is used for mine relocation.
    pub fn from_board(board: Board, rng: R) -> Self {
        let unrevealed_count = board.cells().filter(|c| !c.is_revealed()).count() as u32;
        let flag_count = board.cells().filter(|c| c.is_flagged()).count() as u32;
        Self {
            remaining_mines: board.mines_count().saturating_sub(flag_count),
            board,
            rng,
            state: GameState::Unfinished,
            unrevealed_count,
            flag_count,
            first_move: true,
        }
    }

    pub fn perform_action(&mut self, pos: Position, action: Action) -> Result<GameState, GameError> {
        match action {
            Action::Reveal => self.left_click(pos),
            Action::Flag => self.right_click(pos),
            Action::Chord => self.chord_reveal(pos),
        }
    }

    /// Reveals `pos`. On the very first click a mine under the cursor is
    /// moved elsewhere before anything is revealed.
    pub fn left_click(&mut self, pos: Position) -> Result<GameState, GameError> {
        self.check_unfinished()?;

        if self.first_move && self.board.get_cell(pos)?.is_mine() {
            self.board.move_mine(pos, &mut self.rng)?;
        }
        self.first_move = false;

        self.reveal(pos)?;
        Ok(self.check_win_state())
    }

    /// Toggles the flag on an unrevealed cell.
    pub fn right_click(&mut self, pos: Position) -> Result<GameState, GameError> {
        self.check_unfinished()?;

        let cell = self.board.cell_mut(pos)?;
        if cell.is_revealed() {
            return Ok(self.state);
        }

        if cell.is_flagged() {
            cell.set_flagged(false);
            self.flag_count -= 1;
            self.remaining_mines += 1;
        } else if self.remaining_mines > 0 {
            cell.set_flagged(true);
            self.flag_count += 1;
            self.remaining_mines -= 1;
        }

        Ok(self.check_win_state())
    }

    /// Reveals every unflagged neighbour of a numbered cell whose count
    /// matches its flagged neighbours. Otherwise does nothing.
    pub fn chord_reveal(&mut self, pos: Position) -> Result<GameState, GameError> {
        self.check_unfinished()?;

        let CellContent::Adjacent(count) = self.board.get_cell(pos)?.content() else {
            return Ok(self.state);
        };
        if count != self.board.count_adjacent_flags(pos) {
            return Ok(self.state);
        }

        let targets: Vec<Position> = self
            .board
            .neighbors(pos)
            .filter(|p| self.board.get_cell(*p).map_or(false, |c| !c.is_flagged()))
            .collect();
        for target in targets {
            self.reveal(target)?;
        }

        Ok(self.check_win_state())
    }

    /// Gives up the current game. The field is left as it was.
    pub fn surrender(&mut self) -> GameState {
        self.lose();
        self.state
    }

    /// Reveals `pos`, flooding outwards from empty cells. A flagged cell loses
    /// its flag before being revealed.
    fn reveal(&mut self, pos: Position) -> Result<(), GameError> {
        let mut pending = vec![pos];

        while let Some(current) = pending.pop() {
            let cell = self.board.cell_mut(current)?;
            if cell.is_revealed() {
                continue;
            }

            if cell.is_flagged() {
                cell.set_flagged(false);
                self.flag_count -= 1;
                self.remaining_mines += 1;
            }

            match cell.content() {
                CellContent::Mine => self.lose(),
                CellContent::Empty => {
                    cell.set_revealed();
                    self.unrevealed_count -= 1;
                    pending.extend(self.board.neighbors(current).filter(|p| {
                        self.board.get_cell(*p).map_or(false, |c| !c.is_revealed())
                    }));
                }
                CellContent::Adjacent(_) => {
                    cell.set_revealed();
                    self.unrevealed_count -= 1;
                }
            }
        }

        Ok(())
    }

    fn lose(&mut self) {
        if self.state != GameState::Lost {
            log::info!("game lost");
        }
        self.state = GameState::Lost;
    }

    fn check_win_state(&mut self) -> GameState {
        if self.state != GameState::Lost && self.unrevealed_count == self.flag_count {
            if self.state != GameState::Won {
                log::info!("game won");
            }
            self.state = GameState::Won;
        }
        self.state
    }

    fn check_unfinished(&self) -> Result<(), GameError> {
        if self.state.is_finished() {
            Err(GameError::GameOver)
        } else {
            Ok(())
        }
    }
}

impl<R> Game<R> {
    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn get_cell(&self, pos: Position) -> Result<&Cell, GameError> {
        self.board.get_cell(pos)
    }

    pub fn remaining_mines(&self) -> u32 {
        self.remaining_mines
    }

    pub fn unrevealed_count(&self) -> u32 {
        self.unrevealed_count
    }

    pub fn flag_count(&self) -> u32 {
        self.flag_count
    }

    pub fn is_first_move(&self) -> bool {
        self.first_move
    }

    pub fn dimensions(&self) -> (i32, i32) {
        self.board.dimensions()
    }
}
