//! N×N board model.
//!
//! A [`Board`] is a row-major sequence of [`Cell`]s whose length is a
//! perfect square. The side length is always derived from the cell count,
//! never stored. Boards are values: move generation builds new boards and
//! leaves the parent untouched.
//!
//! The canonical serialization is one symbol per cell in index order
//! (`' '`, `'X'`, `'O'`), produced by `Display` and parsed by
//! [`from_string`] / `FromStr`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::cell::{Cell, Mark, MoveError};
use crate::constants::{DRAW_SCORE, RENDER_EMPTY, WIN_SCORE};

/// Reasons a serialized board is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("invalid board: length {len} is not a perfect square")]
    NotSquare { len: usize },
    #[error("invalid board: unknown symbol {symbol:?} at index {index}")]
    UnknownSymbol { symbol: char, index: usize },
}

/// Terminal status of a board, in the priority order win > draw > ongoing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Ongoing,
}

/// A row, column, or full diagonal read off a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    marks: Vec<Mark>,
}

impl Line {
    fn new(marks: Vec<Mark>) -> Self {
        Self { marks }
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Whether the whole line is one player's symbol.
    pub fn is_win(&self) -> bool {
        check_line(&self.marks)
    }

    /// Share of the line's cells holding either player's mark.
    pub fn filled_fraction(&self) -> f64 {
        if self.marks.is_empty() {
            return 0.0;
        }
        let filled = self.marks.iter().filter(|m| !m.is_empty()).count();
        filled as f64 / self.marks.len() as f64
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mark in &self.marks {
            write!(f, "{mark}")?;
        }
        Ok(())
    }
}

/// True iff `line` is non-empty and every mark is the same non-empty symbol.
pub fn check_line(line: &[Mark]) -> bool {
    match line.split_first() {
        Some((first, rest)) => !first.is_empty() && rest.iter().all(|m| m == first),
        None => false,
    }
}

/// A blank board of `side_len * side_len` empty cells.
pub fn blank(side_len: usize) -> Board {
    Board {
        cells: (0..side_len * side_len)
            .map(|i| Cell::new(i, Mark::Empty))
            .collect(),
    }
}

/// Parse the canonical serialization.
pub fn from_string(s: &str) -> Result<Board, BoardError> {
    let len = s.chars().count();
    let side = len.isqrt();
    if side * side != len {
        return Err(BoardError::NotSquare { len });
    }

    let cells = s
        .chars()
        .enumerate()
        .map(|(index, symbol)| {
            Mark::from_symbol(symbol)
                .map(|mark| Cell::new(index, mark))
                .ok_or(BoardError::UnknownSymbol { symbol, index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Board { cells })
}

/// Board state: `side_len²` cells in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    /// Total number of cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn side_len(&self) -> usize {
        self.size().isqrt()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).map(Cell::state)
    }

    fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|c| c.state() == mark).count()
    }

    /// Whether `X` places the next mark. Recomputed from the marks on the board.
    pub fn x_has_next_turn(&self) -> bool {
        self.count(Mark::X) <= self.count(Mark::O)
    }

    /// `(next mover, other player)`.
    pub fn symbols_in_turn_order(&self) -> (Mark, Mark) {
        if self.x_has_next_turn() {
            (Mark::X, Mark::O)
        } else {
            (Mark::O, Mark::X)
        }
    }

    /// One child per empty cell, in increasing cell index, each with that
    /// cell set to the current mover's symbol.
    pub fn children(&self) -> Vec<Board> {
        let (mover, _) = self.symbols_in_turn_order();
        self.cells
            .iter()
            .filter(|c| c.is_empty())
            .map(|c| {
                let mut child = self.clone();
                child.cells[c.index()] = Cell::new(c.index(), mover);
                child
            })
            .collect()
    }

    fn line(&self, indices: impl Iterator<Item = usize>) -> Line {
        Line::new(indices.map(|i| self.cells[i].state()).collect())
    }

    pub fn row_lines(&self) -> Vec<Line> {
        let side = self.side_len();
        (0..side)
            .map(|row| self.line(row * side..(row + 1) * side))
            .collect()
    }

    pub fn col_lines(&self) -> Vec<Line> {
        let side = self.side_len();
        (0..side)
            .map(|col| self.line((0..side).map(|row| row * side + col)))
            .collect()
    }

    /// Top-left to bottom-right diagonal, wrapped in a `Vec` like rows and columns.
    pub fn zig_line(&self) -> Vec<Line> {
        let side = self.side_len();
        vec![self.line((0..side).map(|i| i * (side + 1)))]
    }

    /// Bottom-left to top-right diagonal, wrapped in a `Vec` like rows and columns.
    pub fn zag_line(&self) -> Vec<Line> {
        let side = self.side_len();
        vec![self.line((0..side).map(|i| (side - 1 - i) * side + i))]
    }

    /// Rows, then columns, then zig, then zag.
    pub fn all_lines(&self) -> Vec<Line> {
        let mut lines = self.row_lines();
        lines.extend(self.col_lines());
        lines.extend(self.zig_line());
        lines.extend(self.zag_line());
        lines
    }

    pub fn is_win(&self) -> bool {
        self.all_lines().iter().any(Line::is_win)
    }

    /// Every cell is marked. Also true for a full board with a winning line;
    /// check [`Board::is_win`] first.
    pub fn is_draw(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    pub fn outcome(&self) -> Outcome {
        if self.is_win() {
            Outcome::Win
        } else if self.is_draw() {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        }
    }

    /// `Some(1.0)` for a win (for whoever just moved), `Some(0.0)` for a
    /// draw, `None` while the game goes on.
    pub fn is_leaf_and_score(&self) -> Option<f64> {
        match self.outcome() {
            Outcome::Win => Some(WIN_SCORE),
            Outcome::Draw => Some(DRAW_SCORE),
            Outcome::Ongoing => None,
        }
    }

    /// Largest filled fraction over all lines, counting both players' marks.
    pub fn heur_score(&self) -> f64 {
        self.all_lines()
            .iter()
            .map(Line::filled_fraction)
            .fold(0.0, f64::max)
    }

    /// Mark `index` in place with `mark`, through the cell's guard.
    pub fn mark(&mut self, index: usize, mark: Mark) -> Result<(), MoveError> {
        let size = self.size();
        match self.cells.get_mut(index) {
            Some(cell) => cell.set_state(mark),
            None => {
                let error = MoveError::OutOfRange { index, size };
                warn!(index, size, "{error}");
                Err(error)
            }
        }
    }

    /// Mark `index` with the current mover's symbol. Returns the symbol placed.
    pub fn play(&mut self, index: usize) -> Result<Mark, MoveError> {
        let (mover, _) = self.symbols_in_turn_order();
        self.mark(index, mover)?;
        Ok(mover)
    }

    /// Grid rendering for humans, one row per line, `.` for empty cells.
    pub fn render(&self) -> String {
        self.row_lines()
            .iter()
            .map(|row| {
                row.marks()
                    .iter()
                    .map(|m| match m {
                        Mark::Empty => RENDER_EMPTY,
                        other => other.symbol(),
                    })
                    .map(String::from)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell.state())?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_string(s)
    }
}
