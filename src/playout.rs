//! Monte Carlo playouts (random game simulation).
//!
//! A playout clones the board, shuffles the free cells and lets both players
//! drop stones on them in that order until somebody completes a line or the
//! depth limit runs out. Every decided playout rewards the cells the winner
//! ended up holding and penalises the loser's cells. Summed over many trials
//! this ranks empty cells by how often they take part in a decisive line,
//! which is what the search uses to prune its candidate list.
//!
//! Trials are independent. They run on the rayon pool, each with its own
//! board clone and seed; per-thread totals are summed at the end, so the
//! result does not depend on how trials were spread over threads.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::board::{Board, Cell, Point};
use crate::budget::ThinkBudget;
use crate::error::SessionError;
use crate::options::AiOptions;
use crate::patterns::{check_win, wins_through};

/// Result of one random playout.
#[derive(Debug)]
enum TrialOutcome {
    Won { winner: Cell, board: Board },
    Undecided,
}

/// How the playouts of one evaluation ended.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WinTally {
    pub x: usize,
    pub o: usize,
    pub undecided: usize,
}

impl WinTally {
    fn record(&mut self, winner: Cell) {
        match winner {
            Cell::X => self.x += 1,
            Cell::O => self.o += 1,
            Cell::Empty => self.undecided += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.x + self.o + self.undecided
    }

    fn merge(&mut self, other: WinTally) {
        self.x += other.x;
        self.o += other.o;
        self.undecided += other.undecided;
    }
}

/// Per-cell Monte Carlo scores for one position.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Normalised scores, indexed by linear cell position.
    pub scores: Vec<f64>,
    /// Raw +1/-1 totals before normalisation.
    pub totals: Vec<i64>,
    pub wins: WinTally,
}

impl Evaluation {
    /// Share of the completed playouts won by `player`.
    pub fn win_rate(&self, player: Cell) -> f64 {
        let total = self.wins.total();
        if total == 0 {
            return 0.0;
        }
        let won = match player {
            Cell::X => self.wins.x,
            Cell::O => self.wins.o,
            Cell::Empty => self.wins.undecided,
        };
        won as f64 / total as f64
    }
}

fn run_trial(
    board: &Board,
    options: &AiOptions,
    free: &[usize],
    max_depth: usize,
    first_mover: Cell,
    rng: &mut fastrand::Rng,
) -> TrialOutcome {
    let mut clone = board.clone();
    let mut order = free.to_vec();
    rng.shuffle(&mut order);

    let mut mover = first_mover;
    for &idx in order.iter().take(max_depth) {
        clone.put(idx, mover);
        if wins_through(&clone, options, mover, idx) {
            return TrialOutcome::Won {
                winner: mover,
                board: clone,
            };
        }
        mover = mover.opponent();
    }
    TrialOutcome::Undecided
}

/// Add +1 to every cell held by `winner` and -1 to every cell held by the
/// other player.
fn tally(board: &Board, winner: Cell, totals: &mut [i64]) {
    for (total, &cell) in totals.iter_mut().zip(board.cells()) {
        match cell {
            Cell::Empty => {}
            c if c == winner => *total += 1,
            _ => *total -= 1,
        }
    }
}

/// Divide every total by the sum of all totals.
///
/// A zero sum means no playout was decided (or the decisions cancelled out);
/// the result is then a uniform distribution over the free cells.
pub fn normalize(totals: &[i64], board: &Board) -> Vec<f64> {
    let sum: i64 = totals.iter().sum();
    if sum != 0 {
        return totals.iter().map(|&t| t as f64 / sum as f64).collect();
    }

    let free = board.num_free_cells();
    board
        .cells()
        .iter()
        .map(|&c| if c == Cell::Empty { 1.0 / free as f64 } else { 0.0 })
        .collect()
}

/// Run `trials` random playouts from `board`, `first_mover` to play.
///
/// Each playout places at most `max_depth` stones. One seed per trial is
/// drawn from `rng` up front, so the totals depend only on `rng`'s state and
/// not on how the trials were spread over threads.
#[allow(clippy::too_many_arguments)]
pub fn evaluate(
    board: &Board,
    options: &AiOptions,
    max_depth: usize,
    trials: usize,
    first_mover: Cell,
    rng: &mut fastrand::Rng,
    budget: &ThinkBudget,
) -> Result<Evaluation, SessionError> {
    if !first_mover.is_player() {
        return Err(SessionError::InvalidPlayer);
    }

    let cells = board.num_cells();

    // A finished game has nothing left to sample
    let decided = check_win(board, options, Cell::X).0 || check_win(board, options, Cell::O).0;
    if decided || trials == 0 {
        let totals = vec![0i64; cells];
        return Ok(Evaluation {
            scores: normalize(&totals, board),
            totals,
            wins: WinTally::default(),
        });
    }

    let free = board.free_indices();
    let seeds: Vec<u64> = (0..trials).map(|_| rng.u64(..)).collect();

    let (totals, wins) = seeds
        .par_iter()
        .filter_map(|&seed| {
            if budget.is_exhausted() {
                return None;
            }
            let mut rng = fastrand::Rng::with_seed(seed);
            Some(run_trial(board, options, &free, max_depth, first_mover, &mut rng))
        })
        .fold(
            || (vec![0i64; cells], WinTally::default()),
            |(mut totals, mut wins), outcome| {
                match outcome {
                    TrialOutcome::Won { winner, board } => {
                        wins.record(winner);
                        tally(&board, winner, &mut totals);
                    }
                    TrialOutcome::Undecided => wins.record(Cell::Empty),
                }
                (totals, wins)
            },
        )
        .reduce(
            || (vec![0i64; cells], WinTally::default()),
            |(mut totals, mut wins), (other_totals, other_wins)| {
                for (total, other) in totals.iter_mut().zip(other_totals) {
                    *total += other;
                }
                wins.merge(other_wins);
                (totals, wins)
            },
        );

    if wins.total() < trials {
        warn!(run = wins.total(), trials, "think budget ran out during playouts");
    }
    debug!(
        trials = wins.total(),
        threads = rayon::current_num_threads(),
        x_wins = wins.x,
        o_wins = wins.o,
        "monte carlo evaluation done"
    );

    Ok(Evaluation {
        scores: normalize(&totals, board),
        totals,
        wins,
    })
}

/// The free cell with the highest normalised score, lowest index on ties.
/// `None` on a full board.
#[allow(clippy::too_many_arguments)]
pub fn best_move(
    board: &Board,
    options: &AiOptions,
    max_depth: usize,
    trials: usize,
    who_moves: Cell,
    rng: &mut fastrand::Rng,
    budget: &ThinkBudget,
) -> Result<Option<(Point, f64)>, SessionError> {
    let eval = evaluate(board, options, max_depth, trials, who_moves, rng, budget)?;

    let mut best: Option<(usize, f64)> = None;
    for idx in board.free_indices() {
        let score = eval.scores[idx];
        if best.is_none_or(|(_, b)| score > b) {
            best = Some((idx, score));
        }
    }

    match best {
        Some((idx, score)) => Ok(Some((board.from_linear(idx)?, score))),
        None => Ok(None),
    }
}

/// Free cells with their normalised scores, best first. Equal scores keep
/// increasing index order.
#[allow(clippy::too_many_arguments)]
pub fn ranked_moves(
    board: &Board,
    options: &AiOptions,
    max_depth: usize,
    trials: usize,
    who_moves: Cell,
    rng: &mut fastrand::Rng,
    budget: &ThinkBudget,
) -> Result<Vec<(usize, f64)>, SessionError> {
    let eval = evaluate(board, options, max_depth, trials, who_moves, rng, budget)?;
    Ok(rank(board, &eval.scores))
}

fn rank(board: &Board, scores: &[f64]) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = board
        .free_indices()
        .into_iter()
        .map(|idx| (idx, scores[idx]))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Cell indices of the entries scoring at least `threshold`.
pub fn filter_by_threshold(ranked: &[(usize, f64)], threshold: f64) -> Vec<usize> {
    ranked
        .iter()
        .filter(|&&(_, score)| score >= threshold)
        .map(|&(idx, _)| idx)
        .collect()
}
