//! Tictac-Rust: a minimax engine for N×N Tic-Tac-Toe.
//!
//! Given a board, the engine returns the board after its best next move.
//! Boards up to 3×3 are searched exhaustively; larger boards are searched
//! one move pair deep and then scored by how full their fullest line is.
//!
//! ## Modules
//!
//! - [`constants`] - Symbols, search limits and defaults
//! - [`cell`] - Cell marks and the guard on marking a cell
//! - [`board`] - Board model: lines, outcomes, move generation
//! - [`search`] - Minimax and alpha-beta search with memoization
//! - [`protocol`] - Line-based text protocol around the search
//! - [`session`] - Win/draw/loss tallies and engine-vs-random games
//!
//! ## Example
//!
//! ```
//! use tictac_rust::board::from_string;
//! use tictac_rust::search::Searcher;
//!
//! let board = from_string("XX OO    ").unwrap();
//! let mut searcher = Searcher::new();
//! let result = searcher.best_move(&board);
//! assert_eq!(result.best.to_string(), "XXXOO    ");
//! ```

pub mod board;
pub mod cell;
pub mod constants;
pub mod protocol;
pub mod search;
pub mod session;
