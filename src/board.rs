use anyhow::{anyhow, Result};

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::{CONNECT, HEIGHT, WIDTH};

/// One of the two players
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Side {
    Red,
    Yellow,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Yellow,
            Side::Yellow => Side::Red,
        }
    }

    pub fn cell(self) -> Cell {
        match self {
            Side::Red => Cell::Red,
            Side::Yellow => Cell::Yellow,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Red => "Red",
            Side::Yellow => "Yellow",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    Red,
    Yellow,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Cell::Red => Some(Side::Red),
            Cell::Yellow => Some(Side::Yellow),
            Cell::Empty => None,
        }
    }
}

/// The result of a finished game
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Outcome {
    Win(Side),
    Draw,
}

/// A 6x7 Connect 4 grid
///
/// Row 0 is the top of the board and row `HEIGHT - 1` the bottom, so tokens
/// fall towards higher row indices.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    cells: [[Cell; WIDTH]; HEIGHT],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; WIDTH]; HEIGHT],
        }
    }

    /// Builds a position from a string of 1-indexed column digits, with the
    /// sides alternating and Red moving first
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();
        let mut side = Side::Red;

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => {
                    if board.outcome().is_some() {
                        return Err(anyhow!("Invalid position, game is over"));
                    }
                    if !board.drop(column - 1, side) {
                        return Err(anyhow!("Invalid move, column {} full", column));
                    }
                    side = side.opponent();
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
            }
        }
        Ok(board)
    }

    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.cells[row][column]
    }

    pub fn playable(&self, column: usize) -> bool {
        column < WIDTH && self.cells[0][column].is_empty()
    }

    /// Every column with room for another token, in ascending order
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..WIDTH).filter(|&column| self.playable(column)).collect()
    }

    /// Number of tokens stacked in `column`
    pub fn column_height(&self, column: usize) -> usize {
        (0..HEIGHT)
            .rev()
            .take_while(|&row| !self.cells[row][column].is_empty())
            .count()
    }

    pub fn token_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// Places a token for `side` in the lowest empty cell of `column`.
    ///
    /// Returns `false` and leaves the board untouched if the column is full.
    ///
    /// # Panics
    /// If `column` is outside the board.
    pub fn drop(&mut self, column: usize, side: Side) -> bool {
        assert!(column < WIDTH, "column {} out of range", column);
        for row in (0..HEIGHT).rev() {
            if self.cells[row][column].is_empty() {
                self.cells[row][column] = side.cell();
                return true;
            }
        }
        false
    }

    /// Removes the topmost token of `column`.
    ///
    /// # Panics
    /// If `column` is outside the board or holds no tokens.
    pub fn undo(&mut self, column: usize) {
        assert!(column < WIDTH, "column {} out of range", column);
        match (0..HEIGHT).find(|&row| !self.cells[row][column].is_empty()) {
            Some(row) => self.cells[row][column] = Cell::Empty,
            None => panic!("undo on empty column {}", column),
        }
    }

    /// Drops a token and returns a guard that takes it back when dropped
    ///
    /// Returns `None` if the column is full.
    pub fn play_scoped(&mut self, column: usize, side: Side) -> Option<PlayedMove<'_>> {
        if self.drop(column, side) {
            Some(PlayedMove {
                board: self,
                column,
            })
        } else {
            None
        }
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }

    /// Checks every window of four cells for an alignment of `side`
    pub fn has_won(&self, side: Side) -> bool {
        let cell = side.cell();
        let aligned = |row: usize, column: usize, dy: isize, dx: isize| {
            (0..CONNECT as isize).all(|i| {
                let r = (row as isize + i * dy) as usize;
                let c = (column as isize + i * dx) as usize;
                self.cells[r][c] == cell
            })
        };

        // horizontal
        for column in 0..=WIDTH - CONNECT {
            for row in 0..HEIGHT {
                if aligned(row, column, 0, 1) {
                    return true;
                }
            }
        }

        // vertical
        for column in 0..WIDTH {
            for row in 0..=HEIGHT - CONNECT {
                if aligned(row, column, 1, 0) {
                    return true;
                }
            }
        }

        // diagonal, down and to the right
        for column in 0..=WIDTH - CONNECT {
            for row in 0..=HEIGHT - CONNECT {
                if aligned(row, column, 1, 1) {
                    return true;
                }
            }
        }

        // diagonal, up and to the right
        for column in 0..=WIDTH - CONNECT {
            for row in CONNECT - 1..HEIGHT {
                if aligned(row, column, -1, 1) {
                    return true;
                }
            }
        }

        false
    }

    pub fn outcome(&self) -> Option<Outcome> {
        if self.has_won(Side::Red) {
            Some(Outcome::Win(Side::Red))
        } else if self.has_won(Side::Yellow) {
            Some(Outcome::Win(Side::Yellow))
        } else if self.is_full() {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.cells = [[Cell::Empty; WIDTH]; HEIGHT];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.iter() {
            for cell in row.iter() {
                let symbol = match cell {
                    Cell::Red => 'R',
                    Cell::Yellow => 'Y',
                    Cell::Empty => '.',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A token dropped through [`Board::play_scoped`]
///
/// Dereferences to the board it was played on and removes the token again
/// when it goes out of scope.
pub struct PlayedMove<'a> {
    board: &'a mut Board,
    column: usize,
}

impl PlayedMove<'_> {
    pub fn column(&self) -> usize {
        self.column
    }
}

impl Deref for PlayedMove<'_> {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl DerefMut for PlayedMove<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.board
    }
}

impl Drop for PlayedMove<'_> {
    fn drop(&mut self) {
        self.board.undo(self.column);
    }
}
