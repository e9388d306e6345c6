//! Integration tests for gomoku-ai
//!
//! Positions are set up through the public API only. Several of them are
//! classic N-in-a-row situations with a known answer: forced wins, forced
//! losses just past the search horizon, and chains in every orientation.

use gomoku_ai::board::{Board, Cell, Direction, LinearMove};
use gomoku_ai::budget::ThinkBudget;
use gomoku_ai::constants::{LOST, NOTHING, WON};
use gomoku_ai::options::AiOptions;
use gomoku_ai::patterns::{Interval, check_win, find_pattern};
use gomoku_ai::playout::{best_move, evaluate};
use gomoku_ai::search::search;
use gomoku_ai::session::{GameSession, SessionConfig, Turn};

// =============================================================================
// Helper functions
// =============================================================================

fn place(board: &mut Board, player: Cell, cells: &[(usize, usize)]) {
    for &(col, row) in cells {
        board.set_cell(col, row, player).unwrap();
    }
}

fn interval(direction: Direction, from: (usize, usize), to: (usize, usize)) -> Interval {
    Interval { direction, from, to }
}

fn sorted(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort();
    intervals
}

fn options(ai: Cell, win_length: usize, max_depth: usize, alpha_beta: bool) -> AiOptions {
    AiOptions::new(ai, win_length, max_depth, alpha_beta).unwrap()
}

// =============================================================================
// Board
// =============================================================================

#[test]
fn test_linear_index_bijection() {
    let board = Board::new(7, 4).unwrap();
    for idx in 0..board.num_cells() {
        let (col, row) = board.from_linear(idx).unwrap();
        assert!(board.contains(col, row));
        assert_eq!(board.to_linear(col, row).unwrap(), idx);
    }
    assert!(board.from_linear(28).is_err());
    assert!(board.to_linear(7, 0).is_err());
    assert!(board.to_linear(0, 4).is_err());
}

#[test]
fn test_clone_is_independent() {
    let mut board = Board::new(5, 5).unwrap();
    board.set_cell(2, 2, Cell::X).unwrap();

    let mut copy = board.clone();
    copy.set_cell(0, 0, Cell::O).unwrap();
    copy.set_cell(2, 2, Cell::Empty).unwrap();

    assert_eq!(board.get_cell(0, 0).unwrap(), Cell::Empty);
    assert_eq!(board.get_cell(2, 2).unwrap(), Cell::X);
    assert_eq!(copy.num_free_cells(), 24);
}

#[test]
fn test_from_moves_matches_manual_setup() {
    let moves = [LinearMove::new(0, Cell::X), LinearMove::new(6, Cell::O), LinearMove::new(12, Cell::X)];
    let replayed = Board::from_moves(5, 5, &moves).unwrap();

    let mut manual = Board::new(5, 5).unwrap();
    place(&mut manual, Cell::X, &[(0, 0), (2, 2)]);
    place(&mut manual, Cell::O, &[(1, 1)]);
    assert_eq!(replayed, manual);

    assert!(Board::from_moves(5, 5, &[LinearMove::new(0, Cell::X), LinearMove::new(0, Cell::O)]).is_err());
}

// =============================================================================
// Pattern matching
// =============================================================================

#[test]
fn test_find_chain_left_to_right_diagonals() {
    let mut board = Board::new(19, 19).unwrap();
    place(&mut board, Cell::X, &[(2, 2), (3, 3), (4, 4), (5, 5)]);
    place(&mut board, Cell::X, &[(7, 3), (8, 4), (9, 5), (10, 6)]);
    place(&mut board, Cell::X, &[(0, 15), (1, 16), (2, 17), (3, 18)]);

    let opts = options(Cell::X, 4, 1, false);
    let found = find_pattern(&board, opts.patterns().win_now(Cell::X));
    assert_eq!(
        sorted(found),
        sorted(vec![
            interval(Direction::DiagonalLeftToRight, (2, 2), (5, 5)),
            interval(Direction::DiagonalLeftToRight, (7, 3), (10, 6)),
            interval(Direction::DiagonalLeftToRight, (0, 15), (3, 18)),
        ])
    );
}

#[test]
fn test_find_chain_right_to_left_diagonals() {
    let mut board = Board::new(19, 19).unwrap();
    place(&mut board, Cell::O, &[(13, 18), (14, 17), (15, 16), (16, 15), (17, 14), (18, 13)]);
    place(&mut board, Cell::O, &[(0, 18), (1, 17), (2, 16), (3, 15), (4, 14), (5, 13)]);
    place(&mut board, Cell::O, &[(2, 8), (3, 7), (4, 6), (5, 5), (6, 4), (7, 3)]);

    let opts = options(Cell::X, 6, 1, false);
    let found = find_pattern(&board, opts.patterns().win_now(Cell::O));
    assert_eq!(
        sorted(found),
        sorted(vec![
            interval(Direction::DiagonalRightToLeft, (7, 3), (2, 8)),
            interval(Direction::DiagonalRightToLeft, (5, 13), (0, 18)),
            interval(Direction::DiagonalRightToLeft, (18, 13), (13, 18)),
        ])
    );
}

#[test]
fn test_find_chain_rows_and_columns() {
    let mut board = Board::new(19, 19).unwrap();
    place(&mut board, Cell::X, &[(0, 0), (1, 0), (2, 0), (3, 0)]);
    place(&mut board, Cell::X, &[(5, 0), (6, 0), (7, 0), (8, 0)]);
    place(&mut board, Cell::X, &[(15, 18), (16, 18), (17, 18), (18, 18)]);
    place(&mut board, Cell::X, &[(1, 1), (1, 2), (1, 3)]);
    place(&mut board, Cell::X, &[(6, 1), (6, 2), (6, 3)]);
    place(&mut board, Cell::X, &[(18, 15), (18, 16), (18, 17)]);

    let opts = options(Cell::O, 4, 1, false);
    let found = find_pattern(&board, opts.patterns().win_now(Cell::X));
    assert_eq!(
        sorted(found),
        sorted(vec![
            interval(Direction::Horizontal, (0, 0), (3, 0)),
            interval(Direction::Horizontal, (5, 0), (8, 0)),
            interval(Direction::Horizontal, (15, 18), (18, 18)),
            interval(Direction::Vertical, (1, 0), (1, 3)),
            interval(Direction::Vertical, (6, 0), (6, 3)),
            interval(Direction::Vertical, (18, 15), (18, 18)),
        ])
    );
}

#[test]
fn test_find_only_complete_chains() {
    let mut board = Board::new(19, 19).unwrap();
    place(&mut board, Cell::X, &[(5, 0), (6, 0), (7, 0), (8, 0), (9, 0)]);
    place(&mut board, Cell::X, &[(6, 10), (5, 11), (4, 12), (3, 13), (2, 14)]);
    place(&mut board, Cell::X, &[(0, 18), (1, 18), (2, 18)]);
    place(&mut board, Cell::X, &[(14, 0), (15, 0), (16, 0)]);

    let opts = options(Cell::O, 5, 1, false);
    let (won, found) = check_win(&board, &opts, Cell::X);
    assert!(won);
    assert_eq!(
        sorted(found),
        sorted(vec![
            interval(Direction::Horizontal, (5, 0), (9, 0)),
            interval(Direction::DiagonalRightToLeft, (6, 10), (2, 14)),
        ])
    );
    assert!(!check_win(&board, &opts, Cell::O).0);
}

#[test]
fn test_empty_board_has_no_chains() {
    let board = Board::new(19, 19).unwrap();
    for win_length in 3..=7 {
        let opts = options(Cell::X, win_length, 1, false);
        for player in [Cell::X, Cell::O] {
            assert!(find_pattern(&board, opts.patterns().win_now(player)).is_empty());
            assert!(!check_win(&board, &opts, player).0);
        }
    }
}

#[test]
fn test_interval_unfold_covers_the_chain() {
    let chain = interval(Direction::DiagonalRightToLeft, (6, 10), (2, 14));
    assert_eq!(chain.len(), 5);
    assert_eq!(chain.unfold(), vec![(6, 10), (5, 11), (4, 12), (3, 13), (2, 14)]);
}

// =============================================================================
// Monte Carlo
// =============================================================================

#[test]
fn test_forced_win_saturates_playouts() {
    // Four in a row with both ends open: whichever end X takes wins
    let board: Board = ".XXXX.".parse().unwrap();
    let opts = options(Cell::X, 5, 1, false);
    let budget = ThinkBudget::unlimited();
    let mut rng = fastrand::Rng::with_seed(5);

    let eval = evaluate(&board, &opts, 6, 40, Cell::X, &mut rng, &budget).unwrap();
    assert_eq!(eval.wins.x, 40);
    assert_eq!(eval.wins.total(), 40);
    assert_eq!(eval.win_rate(Cell::X), 1.0);
    assert!(eval.totals[1..5].iter().all(|&t| t == 40));
    assert_eq!(eval.totals[0] + eval.totals[5], 40);

    let ((col, _), _) = best_move(&board, &opts, 6, 40, Cell::X, &mut rng, &budget).unwrap().unwrap();
    assert!(col == 0 || col == 5);
}

#[test]
fn test_best_move_is_reproducible() {
    let mut board = Board::new(6, 6).unwrap();
    place(&mut board, Cell::O, &[(0, 1), (1, 1), (2, 1), (3, 1)]);
    let opts = options(Cell::X, 5, 1, false);
    let budget = ThinkBudget::unlimited();

    let first = best_move(&board, &opts, 36, 100, Cell::X, &mut fastrand::Rng::with_seed(9), &budget).unwrap();
    let second = best_move(&board, &opts, 36, 100, Cell::X, &mut fastrand::Rng::with_seed(9), &budget).unwrap();
    assert_eq!(first, second);

    let ((col, row), _) = first.unwrap();
    assert_eq!(board.get_cell(col, row).unwrap(), Cell::Empty);
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_minimax_completes_diagonal() {
    let mut board = Board::new(5, 5).unwrap();
    place(&mut board, Cell::X, &[(0, 0), (1, 1), (2, 2)]);
    let opts = options(Cell::X, 4, 3, false);

    // O "just moved", so X is to play
    let result = search(&board, &opts, None, LinearMove::new(0, Cell::O), 3, &ThinkBudget::unlimited()).unwrap();
    let position = board.from_linear(result.position.unwrap()).unwrap();
    assert_eq!(position, (3, 3));
    assert_eq!(result.score, WON);
}

#[test]
fn test_minimax_completes_column() {
    let mut board = Board::new(5, 5).unwrap();
    place(&mut board, Cell::O, &[(0, 0), (0, 1), (0, 2), (0, 3)]);
    let opts = options(Cell::O, 5, 3, false);

    let result = search(&board, &opts, None, LinearMove::new(0, Cell::X), 3, &ThinkBudget::unlimited()).unwrap();
    let position = board.from_linear(result.position.unwrap()).unwrap();
    assert_eq!(position, (0, 4));
    assert_eq!(result.score, WON);
}

#[test]
fn test_loss_is_seen_only_with_enough_depth() {
    // O's corner of three turns into two open lines no matter where X plays
    let mut board = Board::new(6, 6).unwrap();
    place(&mut board, Cell::O, &[(3, 3), (3, 4), (4, 3)]);
    let budget = ThinkBudget::unlimited();
    let last = LinearMove::new(0, Cell::O);

    let deep = options(Cell::X, 4, 4, true);
    let result = search(&board, &deep, None, last, 4, &budget).unwrap();
    assert_eq!(result.score, LOST);

    let shallow = options(Cell::X, 4, 3, false);
    let result = search(&board, &shallow, None, last, 3, &budget).unwrap();
    assert_eq!(result.score, NOTHING);
}

#[test]
fn test_alpha_beta_matches_plain_minimax() {
    let budget = ThinkBudget::unlimited();
    let mut checked = 0;

    for seed in 0..400 {
        for (width, height) in [(4, 4), (5, 4)] {
            let board = Board::randomized(width, height, 50.0, &mut fastrand::Rng::with_seed(seed)).unwrap();

            for ai in [Cell::X, Cell::O] {
                let last = LinearMove::new(0, ai.opponent());
                for depth in 1..=3 {
                    let plain = search(&board, &options(ai, 3, depth, false), None, last, depth, &budget).unwrap();
                    let pruned = search(&board, &options(ai, 3, depth, true), None, last, depth, &budget).unwrap();
                    assert_eq!(
                        (plain.position, plain.score),
                        (pruned.position, pruned.score),
                        "seed {seed} {width}x{height} ai {ai} depth {depth}\n{board}"
                    );
                    assert!(pruned.nodes <= plain.nodes);
                    checked += 1;
                }
            }
        }
    }
    assert_eq!(checked, 400 * 2 * 2 * 3);
}

// =============================================================================
// Session
// =============================================================================

#[test]
fn test_session_plays_until_someone_wins() {
    let config = SessionConfig {
        win_length: 3,
        max_depth: 2,
        trials: 30,
        seed: Some(3),
        ..SessionConfig::default()
    };
    let mut session = GameSession::with_config(4, 4, Cell::X, config).unwrap();
    let free_cells = |s: &GameSession| s.board().free_indices();

    while !session.is_over() {
        // Human takes the first free cell every time
        let idx = free_cells(&session)[0];
        let (col, row) = session.board().from_linear(idx).unwrap();
        session.play(col, row).unwrap();

        match session.make_move().unwrap() {
            Turn::HumanWon | Turn::Draw => break,
            Turn::AiMoved { position, .. } => {
                assert_eq!(session.board().get_cell(position.0, position.1).unwrap(), Cell::O);
            }
        }
    }

    let x = session.board().cells().iter().filter(|&&c| c == Cell::X).count();
    let o = session.board().cells().iter().filter(|&&c| c == Cell::O).count();
    assert!(x == o || x == o + 1, "x={x} o={o}");
    if let Some(player) = session.winner() {
        assert!(!session.intervals().is_empty());
        assert!(check_win(session.board(), session.options(), player).0);
    }
}
