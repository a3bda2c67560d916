//! Minimax search with alpha-beta pruning and memoization.
//!
//! Two variants share one cache:
//! - [`Searcher::minimax`] - exhaustive, no depth bound, no pruning
//! - [`Searcher::alpha_beta`] - depth-bounded with a heuristic fallback
//!
//! Scores are seen from the root mover, who is always the minimizing
//! player: `-1.0` is a win for the root mover, `1.0` a loss, `0.0` a draw.
//! A leaf is scored by its outcome from the perspective of whoever just
//! moved, then sign-flipped for the frame evaluating it.
//!
//! Every result carries the *immediate* child chosen at that frame, never a
//! deeper descendant, so the board returned from the root is always exactly
//! one move ahead of the input. Searching a leaf returns the leaf itself.

use hashbrown::HashMap;
use tracing::debug;

use crate::board::{Board, BoardError, from_string};
use crate::constants::{
    MAX_DEPTH_LARGE_BOARD, MAX_DEPTH_SMALL_BOARD, ROOT_ALPHA, ROOT_BETA, SMALL_BOARD_CUTOFF,
};

/// Score, chosen next board, and the board the score belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Signed score of `board`
    pub score: f64,
    /// Child of `board` to move to, or `board` itself when it is a leaf
    pub best: Board,
    /// The board that was searched
    pub board: Board,
}

impl SearchResult {
    fn terminal(score: f64, board: &Board) -> Self {
        Self {
            score,
            best: board.clone(),
            board: board.clone(),
        }
    }
}

/// Search counters, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions evaluated (cache misses that ran the search body)
    pub nodes: u64,
    /// Lookups answered from the cache
    pub cache_hits: u64,
    /// Lookups that fell through to a fresh evaluation
    pub cache_misses: u64,
    /// Frames that stopped early on an alpha-beta cutoff
    pub cutoffs: u64,
}

impl SearchStats {
    /// Cache hit rate in percent
    pub fn hit_rate(&self) -> f64 {
        let probes = self.cache_hits + self.cache_misses;
        if probes == 0 {
            0.0
        } else {
            self.cache_hits as f64 / probes as f64 * 100.0
        }
    }
}

/// Memoization key: the serialized board plus the scalar search arguments.
///
/// The serialization fixes the board size, so boards of different sizes
/// never collide. Bounds are keyed by their bit patterns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Minimax {
        board: String,
        is_min_turn: bool,
    },
    AlphaBeta {
        board: String,
        is_min_turn: bool,
        alpha: u64,
        beta: u64,
        depth: usize,
    },
}

impl CacheKey {
    fn minimax(board: &Board, is_min_turn: bool) -> Self {
        CacheKey::Minimax {
            board: board.to_string(),
            is_min_turn,
        }
    }

    fn alpha_beta(board: &Board, is_min_turn: bool, alpha: f64, beta: f64, depth: usize) -> Self {
        CacheKey::AlphaBeta {
            board: board.to_string(),
            is_min_turn,
            alpha: alpha.to_bits(),
            beta: beta.to_bits(),
            depth,
        }
    }
}

/// Unbounded memo of solved positions. Entries are never evicted.
#[derive(Debug, Default)]
pub struct SearchCache {
    entries: HashMap<CacheKey, SearchResult>,
}

impl SearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&SearchResult> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: CacheKey, result: SearchResult) {
        self.entries.insert(key, result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Deepest frame still expanded for `board`; frames past it use the heuristic.
pub fn max_depth(board: &Board) -> usize {
    if board.side_len() > SMALL_BOARD_CUTOFF {
        MAX_DEPTH_LARGE_BOARD
    } else {
        MAX_DEPTH_SMALL_BOARD
    }
}

/// Sign applied to mover-relative scores in a frame.
#[inline]
fn perspective(is_min_turn: bool) -> f64 {
    if is_min_turn { 1.0 } else { -1.0 }
}

/// Whether `score` strictly improves on `best` for the frame. Ties keep the
/// earlier child.
#[inline]
fn improves(is_min_turn: bool, score: f64, best: f64) -> bool {
    if is_min_turn { score < best } else { score > best }
}

/// Search engine owning its memoization cache.
///
/// All methods take `&mut self`: a searcher is confined to one thread. Give
/// each worker its own searcher rather than sharing one.
#[derive(Debug, Default)]
pub struct Searcher {
    cache: SearchCache,
    stats: SearchStats,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn lookup(&mut self, key: &CacheKey) -> Option<SearchResult> {
        match self.cache.get(key) {
            Some(hit) => {
                self.stats.cache_hits += 1;
                Some(hit.clone())
            }
            None => {
                self.stats.cache_misses += 1;
                None
            }
        }
    }

    /// Exhaustive minimax over every continuation of `board`.
    pub fn minimax(&mut self, board: &Board, is_min_turn: bool) -> SearchResult {
        let key = CacheKey::minimax(board, is_min_turn);
        if let Some(hit) = self.lookup(&key) {
            return hit;
        }
        let result = self.minimax_uncached(board, is_min_turn);
        self.cache.insert(key, result.clone());
        result
    }

    fn minimax_uncached(&mut self, board: &Board, is_min_turn: bool) -> SearchResult {
        self.stats.nodes += 1;

        if let Some(score) = board.is_leaf_and_score() {
            return SearchResult::terminal(perspective(is_min_turn) * score, board);
        }

        let mut best: Option<(f64, Board)> = None;
        for child in board.children() {
            let result = self.minimax(&child, !is_min_turn);
            let better = match &best {
                Some((best_score, _)) => improves(is_min_turn, result.score, *best_score),
                None => true,
            };
            if better {
                best = Some((result.score, result.board));
            }
        }

        match best {
            Some((score, child)) => SearchResult {
                score,
                best: child,
                board: board.clone(),
            },
            // A non-leaf always has an empty cell, hence a child.
            None => SearchResult::terminal(0.0, board),
        }
    }

    /// Depth-bounded minimax with alpha-beta pruning.
    ///
    /// `alpha` is the best score the minimizer can guarantee so far, `beta`
    /// the best the maximizer can. Each child is searched with the bounds as
    /// they stand when it is reached. Once `alpha <= beta` the frame stops
    /// and returns the bound together with the child that caused the cutoff.
    pub fn alpha_beta(
        &mut self,
        board: &Board,
        is_min_turn: bool,
        alpha: f64,
        beta: f64,
        depth: usize,
    ) -> SearchResult {
        let key = CacheKey::alpha_beta(board, is_min_turn, alpha, beta, depth);
        if let Some(hit) = self.lookup(&key) {
            return hit;
        }
        let result = self.alpha_beta_uncached(board, is_min_turn, alpha, beta, depth);
        self.cache.insert(key, result.clone());
        result
    }

    fn alpha_beta_uncached(
        &mut self,
        board: &Board,
        is_min_turn: bool,
        mut alpha: f64,
        mut beta: f64,
        depth: usize,
    ) -> SearchResult {
        self.stats.nodes += 1;
        let sign = perspective(is_min_turn);

        if let Some(score) = board.is_leaf_and_score() {
            return SearchResult::terminal(sign * score, board);
        }

        if depth > max_depth(board) {
            return SearchResult::terminal(sign * board.heur_score(), board);
        }

        let mut best: Option<(f64, Board)> = None;
        for child in board.children() {
            let result = self.alpha_beta(&child, !is_min_turn, alpha, beta, depth + 1);

            if is_min_turn {
                if result.score < alpha {
                    alpha = result.score;
                }
            } else if result.score > beta {
                beta = result.score;
            }

            if alpha <= beta {
                self.stats.cutoffs += 1;
                return SearchResult {
                    score: if is_min_turn { alpha } else { beta },
                    best: result.board,
                    board: board.clone(),
                };
            }

            let better = match &best {
                Some((best_score, _)) => improves(is_min_turn, result.score, *best_score),
                None => true,
            };
            if better {
                best = Some((result.score, result.board));
            }
        }

        match best {
            Some((score, child)) => SearchResult {
                score,
                best: child,
                board: board.clone(),
            },
            None => SearchResult::terminal(0.0, board),
        }
    }

    /// Best next board for the player to move, from a fresh root.
    pub fn best_move(&mut self, board: &Board) -> SearchResult {
        let result = self.alpha_beta(board, true, ROOT_ALPHA, ROOT_BETA, 0);
        debug!(
            board = %board,
            best = %result.best,
            score = result.score,
            nodes = self.stats.nodes,
            cache_hits = self.stats.cache_hits,
            cutoffs = self.stats.cutoffs,
            "search finished"
        );
        result
    }

    /// Serialized board in, serialized next board out.
    pub fn next_move(&mut self, serialized: &str) -> Result<String, BoardError> {
        let board = from_string(serialized)?;
        Ok(self.best_move(&board).best.to_string())
    }
}
