//! Game sessions between the engine and another player.
//!
//! A [`Session`] holds the running win/draw/loss tally from the point of
//! view of the engine's opponent. It is plain state owned by whoever runs
//! the games; nothing here is global.
//!
//! The arena pits the engine against a random mover. The opponent's moves
//! go through [`Board::play`] and so through the cell guard, like a human's
//! would; the engine's moves come back from the search as whole boards.

use fastrand::Rng;
use tracing::{debug, info};

use crate::board::{Board, Outcome, blank};
use crate::cell::MoveError;
use crate::search::Searcher;

/// How a finished game went for the engine's opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Win,
    Draw,
    Loss,
}

/// Running tally of finished games.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: GameResult) {
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Draw => self.draws += 1,
            GameResult::Loss => self.losses += 1,
        }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.draws + self.losses
    }
}

/// Pick a uniformly random empty cell, or `None` on a full board.
pub fn random_move(board: &Board, rng: &mut Rng) -> Option<usize> {
    let empty: Vec<usize> = board
        .cells()
        .iter()
        .filter(|c| c.is_empty())
        .map(|c| c.index())
        .collect();
    if empty.is_empty() {
        None
    } else {
        Some(empty[rng.usize(..empty.len())])
    }
}

/// Play one game on a blank board and return it from the opponent's side,
/// together with the final board.
pub fn play_game(
    searcher: &mut Searcher,
    rng: &mut Rng,
    side_len: usize,
    opponent_first: bool,
) -> Result<(GameResult, Board), MoveError> {
    let mut board = blank(side_len);
    let mut opponent_to_move = opponent_first;

    loop {
        match board.outcome() {
            Outcome::Ongoing => {}
            // The side that just moved completed a line
            Outcome::Win => {
                let result = if opponent_to_move {
                    GameResult::Loss
                } else {
                    GameResult::Win
                };
                return Ok((result, board));
            }
            Outcome::Draw => return Ok((GameResult::Draw, board)),
        }

        if opponent_to_move {
            if let Some(index) = random_move(&board, rng) {
                board.play(index)?;
            }
        } else {
            board = searcher.best_move(&board).best;
        }
        debug!(board = %board, "move played");
        opponent_to_move = !opponent_to_move;
    }
}

/// Play `games` games, alternating who moves first, starting with the opponent.
pub fn run_arena(
    searcher: &mut Searcher,
    rng: &mut Rng,
    side_len: usize,
    games: usize,
) -> Result<Session, MoveError> {
    let mut session = Session::new();
    for game in 0..games {
        let opponent_first = game % 2 == 0;
        let (result, board) = play_game(searcher, rng, side_len, opponent_first)?;
        info!(game, opponent_first, ?result, board = %board, "game over");
        session.record(result);
    }
    Ok(session)
}
