//! Integration tests for tictac-rust
//!
//! The board tables hold seven positions on 3x3 and 4x4 boards with known
//! turn order, outcome and lines.

use tictac_rust::board::{Board, BoardError, blank, from_string};
use tictac_rust::cell::Mark;
use tictac_rust::constants::{ROOT_ALPHA, ROOT_BETA};
use tictac_rust::protocol::MoveServer;
use tictac_rust::search::Searcher;

// =============================================================================
// Fixtures
// =============================================================================

const BOARDS: [&str; 7] = [
    "OOX X XOO",
    "XXOOOXXOX",
    "O O X X O XXO O ",
    "XXO XOXOXO  XOOX",
    "XXX   OO ",
    "OXX O   O",
    "         ",
];

const X_HAS_NEXT_TURN: [bool; 7] = [true, false, true, false, false, true, true];

const LEAF_AND_SCORE: [Option<f64>; 7] = [
    Some(1.0),
    Some(0.0),
    None,
    Some(1.0),
    Some(1.0),
    Some(1.0),
    None,
];

const IS_DRAW: [bool; 7] = [false, true, false, false, false, false, false];

fn board(s: &str) -> Board {
    from_string(s).unwrap()
}

fn child_strings(s: &str) -> Vec<String> {
    board(s).children().iter().map(Board::to_string).collect()
}

fn line_strings(lines: &[tictac_rust::board::Line]) -> Vec<String> {
    lines.iter().map(ToString::to_string).collect()
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn test_round_trip() {
    for s in BOARDS {
        assert_eq!(board(s).to_string(), s);
        assert_eq!(from_string(&board(s).to_string()).unwrap(), board(s));
    }
}

#[test]
fn test_size_and_side_len() {
    for s in BOARDS {
        let b = board(s);
        assert_eq!(b.size(), s.len());
        assert_eq!(b.side_len() * b.side_len(), s.len());
    }
}

#[test]
fn test_blank_round_trip() {
    for side_len in 0..8 {
        let s = blank(side_len).to_string();
        assert_eq!(s, " ".repeat(side_len * side_len));
        assert_eq!(board(&s).side_len(), side_len);
    }
}

#[test]
fn test_invalid_construction() {
    assert_eq!(from_string("OOX X XO"), Err(BoardError::NotSquare { len: 8 }));
    assert!(matches!(
        from_string("OOX-X XOO"),
        Err(BoardError::UnknownSymbol { symbol: '-', index: 3 })
    ));
}

// =============================================================================
// Turn order and outcomes
// =============================================================================

#[test]
fn test_x_has_next_turn() {
    for (s, expected) in BOARDS.iter().zip(X_HAS_NEXT_TURN) {
        assert_eq!(board(s).x_has_next_turn(), expected, "board {s:?}");
    }
}

#[test]
fn test_symbols_in_turn_order() {
    for (s, x_next) in BOARDS.iter().zip(X_HAS_NEXT_TURN) {
        let expected = if x_next {
            (Mark::X, Mark::O)
        } else {
            (Mark::O, Mark::X)
        };
        assert_eq!(board(s).symbols_in_turn_order(), expected, "board {s:?}");
    }
}

#[test]
fn test_is_leaf_and_score() {
    for (s, expected) in BOARDS.iter().zip(LEAF_AND_SCORE) {
        assert_eq!(board(s).is_leaf_and_score(), expected, "board {s:?}");
    }
}

#[test]
fn test_is_draw() {
    for (s, expected) in BOARDS.iter().zip(IS_DRAW) {
        assert_eq!(board(s).is_draw(), expected, "board {s:?}");
    }
}

#[test]
fn test_full_winning_board_is_a_win() {
    // Full, and X holds the top row
    let b = board("XXXOOXXOO");
    assert!(b.is_draw());
    assert!(b.is_win());
    assert_eq!(b.is_leaf_and_score(), Some(1.0));
}

// =============================================================================
// Lines
// =============================================================================

#[test]
fn test_row_lines() {
    assert_eq!(line_strings(&board(BOARDS[0]).row_lines()), ["OOX", " X ", "XOO"]);
    assert_eq!(line_strings(&board(BOARDS[1]).row_lines()), ["XXO", "OOX", "XOX"]);
    assert_eq!(
        line_strings(&board(BOARDS[2]).row_lines()),
        ["O O ", "X X ", "O XX", "O O "]
    );
    assert_eq!(line_strings(&board(BOARDS[5]).row_lines()), ["OXX", " O ", "  O"]);
}

#[test]
fn test_col_lines() {
    assert_eq!(line_strings(&board(BOARDS[0]).col_lines()), ["O X", "OXO", "X O"]);
    assert_eq!(
        line_strings(&board(BOARDS[2]).col_lines()),
        ["OXOO", "    ", "OXXO", "  X "]
    );
    assert_eq!(line_strings(&board(BOARDS[4]).col_lines()), ["X O", "X O", "X  "]);
}

#[test]
fn test_zig_line() {
    let expected = ["OXO", "XOX", "O X ", "XO X", "X  ", "OOO", "   "];
    for (s, zig) in BOARDS.iter().zip(expected) {
        assert_eq!(line_strings(&board(s).zig_line()), [zig], "board {s:?}");
    }
}

#[test]
fn test_zag_line() {
    let expected = ["XXX", "XOO", "O X ", "XOX ", "O X", " OX", "   "];
    for (s, zag) in BOARDS.iter().zip(expected) {
        assert_eq!(line_strings(&board(s).zag_line()), [zag], "board {s:?}");
    }
}

// =============================================================================
// Children
// =============================================================================

#[test]
fn test_children() {
    let children = child_strings(BOARDS[0]);
    assert_eq!(children, ["OOXXX XOO", "OOX XXXOO"]);

    assert!(child_strings(BOARDS[1]).is_empty());

    let children = child_strings(BOARDS[2]);
    for expected in [
        "OXO X X O XXO O ",
        "O OXX X O XXO O ",
        "O O XXX O XXO O ",
        "O O X XXO XXO O ",
        "O O X X OXXXO O ",
        "O O X X O XXOXO ",
        "O O X X O XXO OX",
    ] {
        assert!(children.contains(&expected.to_string()), "missing {expected:?}");
    }

    let children = child_strings(BOARDS[3]);
    assert_eq!(
        children,
        ["XXOOXOXOXO  XOOX", "XXO XOXOXOO XOOX", "XXO XOXOXO OXOOX"]
    );

    let children = child_strings(BOARDS[6]);
    assert_eq!(children.len(), 9);
    for (i, child) in children.iter().enumerate() {
        assert_eq!(child.find('X'), Some(i));
    }
}

#[test]
fn test_children_differ_in_one_cell() {
    for s in BOARDS {
        let parent = board(s);
        let (mover, _) = parent.symbols_in_turn_order();
        let empty = parent.cells().iter().filter(|c| c.is_empty()).count();
        let children = parent.children();
        assert_eq!(children.len(), empty);

        for child in &children {
            let diffs: Vec<usize> = (0..parent.size())
                .filter(|&i| parent.get(i) != child.get(i))
                .collect();
            assert_eq!(diffs.len(), 1);
            assert_eq!(parent.get(diffs[0]), Some(Mark::Empty));
            assert_eq!(child.get(diffs[0]), Some(mover));
        }
    }
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_exhaustive_search_of_empty_board_is_a_draw() {
    let mut searcher = Searcher::new();
    let result = searcher.minimax(&blank(3), true);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.best.cells().iter().filter(|c| !c.is_empty()).count(), 1);
}

#[test]
fn test_alpha_beta_on_empty_board() {
    let mut searcher = Searcher::new();
    let result = searcher.alpha_beta(&blank(3), true, ROOT_ALPHA, ROOT_BETA, 0);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.board, blank(3));
    assert!(blank(3).children().contains(&result.best));
}

#[test]
fn test_self_play_is_a_draw() {
    let mut searcher = Searcher::new();
    let mut b = blank(3);
    while b.is_leaf_and_score().is_none() {
        b = searcher.best_move(&b).best;
    }
    assert!(b.is_draw());
    assert!(!b.is_win());
}

#[test]
fn test_search_on_leaf_returns_input() {
    let mut searcher = Searcher::new();
    for s in ["OOX X XOO", "XXOOOXXOX", "XXX   OO "] {
        assert_eq!(searcher.next_move(s).unwrap(), s);
    }
}

#[test]
fn test_large_board_search_places_one_mark() {
    let mut searcher = Searcher::new();
    for side_len in [4, 5] {
        let start = blank(side_len).to_string();
        let next = searcher.next_move(&start).unwrap();
        assert_eq!(next.len(), start.len());
        assert_eq!(next.matches('X').count(), 1);
        assert_eq!(next.matches('O').count(), 0);
    }
}

#[test]
fn test_sizes_share_one_cache() {
    let mut searcher = Searcher::new();
    let small = searcher.next_move("X   ").unwrap();
    let large = searcher.next_move(&format!("X{}", " ".repeat(15))).unwrap();
    assert_eq!(small.len(), 4);
    assert_eq!(large.len(), 16);
}

#[test]
fn test_repeated_search_is_deterministic() {
    let mut searcher = Searcher::new();
    let start = board("X   O    ");
    let first = searcher.best_move(&start);
    for _ in 0..3 {
        let again = searcher.best_move(&start);
        assert_eq!(again.best, first.best);
        assert_eq!(again.score.to_bits(), first.score.to_bits());
    }

    // A fresh searcher computes the same answer from scratch
    let fresh = Searcher::new().best_move(&start);
    assert_eq!(fresh.best, first.best);
    assert_eq!(fresh.score.to_bits(), first.score.to_bits());
}

// =============================================================================
// Protocol
// =============================================================================

#[test]
fn test_protocol_session() {
    let input = "\
1 play 4          \n\
2 genmove     X    \n\
3 status OOX X XOO\n\
4 genmove XO\n\
5 quit\n";
    let mut server = MoveServer::new();
    let mut out = Vec::new();
    server.run(input.as_bytes(), &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    let responses: Vec<&str> = out.split("\n\n").filter(|r| !r.is_empty()).collect();
    assert_eq!(responses.len(), 5);
    assert_eq!(responses[0], "=1     X    ");
    assert!(responses[1].starts_with("=2 "));
    let reply = &responses[1][3..];
    assert_eq!(reply.len(), 9);
    assert_eq!(reply.matches('O').count(), 1);
    assert_eq!(responses[2], "=3 win");
    assert!(responses[3].starts_with("?4 invalid board"));
    assert_eq!(responses[4], "=5 ");
}
