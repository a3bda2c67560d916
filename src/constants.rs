//! Constants for board symbols, search limits, and front-end defaults.
//!
//! The board size is not fixed at compile time: every board carries its own
//! side length, derived from its cell count. What is fixed here is how the
//! search treats boards of different sizes.

// =============================================================================
// Symbols
// =============================================================================

/// Empty cell.
pub const EMPTY_SYMBOL: char = ' ';

/// Player A, who moves first on a blank board.
pub const X_SYMBOL: char = 'X';

/// Player B.
pub const O_SYMBOL: char = 'O';

/// Symbol used for empty cells when rendering a board for humans.
pub const RENDER_EMPTY: char = '.';

// =============================================================================
// Scores
// =============================================================================

/// Outcome score of a won board, from the perspective of the player who just moved.
pub const WIN_SCORE: f64 = 1.0;

/// Outcome score of a drawn board.
pub const DRAW_SCORE: f64 = 0.0;

// =============================================================================
// Search Limits
// =============================================================================

/// Boards with a side length up to this value are searched to `MAX_DEPTH_SMALL_BOARD`.
pub const SMALL_BOARD_CUTOFF: usize = 3;

/// Maximum search depth for small boards (exhaustive on 3x3).
pub const MAX_DEPTH_SMALL_BOARD: usize = 9;

/// Maximum search depth for boards larger than `SMALL_BOARD_CUTOFF`.
pub const MAX_DEPTH_LARGE_BOARD: usize = 1;

/// Initial alpha: the best score the minimizer can guarantee.
pub const ROOT_ALPHA: f64 = 1.0;

/// Initial beta: the best score the maximizer can guarantee.
pub const ROOT_BETA: f64 = -1.0;

// =============================================================================
// Front End
// =============================================================================

/// Default side length for arena games.
pub const DEFAULT_SIDE_LEN: usize = 3;

/// Default number of arena games.
pub const DEFAULT_ARENA_GAMES: usize = 10;
