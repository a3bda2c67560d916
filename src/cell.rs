//! A single grid position and the guard on marking it.
//!
//! A cell is marked at most once. The only mutating operation,
//! [`Cell::set_state_with`], checks the guard first and reports every
//! attempt, accepted or rejected, to a [`CellObserver`]. The search engine
//! never calls it; it only ever builds fresh boards.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::constants::{EMPTY_SYMBOL, O_SYMBOL, X_SYMBOL};

/// The state of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Empty,
    X,
    O,
}

impl Mark {
    /// Canonical serialization symbol.
    #[inline]
    pub const fn symbol(self) -> char {
        match self {
            Mark::Empty => EMPTY_SYMBOL,
            Mark::X => X_SYMBOL,
            Mark::O => O_SYMBOL,
        }
    }

    /// Parse a canonical symbol. Returns `None` for anything else.
    #[inline]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            EMPTY_SYMBOL => Some(Mark::Empty),
            X_SYMBOL => Some(Mark::X),
            O_SYMBOL => Some(Mark::O),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Mark::Empty)
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Result of a rejected move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Cell already carries a mark
    #[error("invalid move: cell {index} is already marked '{state}'")]
    Occupied { index: usize, state: Mark },
    /// Attempt to "mark" a cell with the empty symbol
    #[error("invalid move: cell {index} cannot be marked empty")]
    EmptyMark { index: usize },
    /// Index outside the board
    #[error("invalid move: cell {index} is outside a board of {size} cells")]
    OutOfRange { index: usize, size: usize },
}

/// Receives every state change attempted on a cell.
pub trait CellObserver {
    /// Called after `mark` was written to the cell at `index`.
    fn on_marked(&mut self, index: usize, mark: Mark);

    /// Called when writing `attempted` was refused; the cell is unchanged.
    fn on_rejected(&mut self, index: usize, attempted: Mark, error: &MoveError);
}

/// Observer that writes each event to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceObserver;

impl CellObserver for TraceObserver {
    fn on_marked(&mut self, index: usize, mark: Mark) {
        info!(index, mark = %mark, "setting cell {index} to state '{mark}'");
    }

    fn on_rejected(&mut self, index: usize, attempted: Mark, error: &MoveError) {
        warn!(index, attempted = %attempted, "{error}");
    }
}

/// One grid position: a fixed row-major index and its mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    index: usize,
    state: Mark,
}

impl Cell {
    pub const fn new(index: usize, state: Mark) -> Self {
        Self { index, state }
    }

    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub const fn state(&self) -> Mark {
        self.state
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Mark this cell, logging the attempt through [`TraceObserver`].
    pub fn set_state(&mut self, state: Mark) -> Result<(), MoveError> {
        self.set_state_with(state, &mut TraceObserver)
    }

    /// Mark this cell, reporting the attempt to `observer`.
    ///
    /// Only an empty cell may be marked, and only with `X` or `O`. On
    /// rejection the cell is left untouched.
    pub fn set_state_with<O>(&mut self, state: Mark, observer: &mut O) -> Result<(), MoveError>
    where
        O: CellObserver + ?Sized,
    {
        let rejection = if !self.state.is_empty() {
            Some(MoveError::Occupied {
                index: self.index,
                state: self.state,
            })
        } else if state.is_empty() {
            Some(MoveError::EmptyMark { index: self.index })
        } else {
            None
        };

        if let Some(error) = rejection {
            observer.on_rejected(self.index, state, &error);
            return Err(error);
        }

        self.state = state;
        observer.on_marked(self.index, state);
        Ok(())
    }
}
