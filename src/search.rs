//! Depth-bounded minimax with optional alpha-beta pruning.
//!
//! Scores are always from the AI's point of view: the AI maximises, its
//! opponent minimises. Leaves are scored by [`static_evaluate`], which only
//! knows about complete lines and open threats, so anything the search
//! cannot reach within its depth shows up as [`NOTHING`].
//!
//! ## Tie-breaking
//!
//! Among equally scored moves the last one examined wins. Alpha-beta keeps
//! that rule: a child is searched with its bound one point short of the
//! current best rather than at it, so a reply that would only tie never
//! triggers a cutoff and a tying child still gets an exact score. Pruned and
//! unpruned searches return the same move and score for every position; only
//! the node count differs.

use tracing::{debug, warn};

pub use crate::board::LinearMove;
use crate::board::{Board, Cell};
use crate::budget::ThinkBudget;
use crate::constants::{INF, LOSS_THREAT, LOST, NOTHING, WIN_THREAT, WON};
use crate::error::BoardError;
use crate::options::AiOptions;
use crate::patterns::find_pattern;

/// Outcome of a search from one position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// Best cell for the side to move, `None` if no move was examined.
    pub position: Option<usize>,
    pub score: i32,
    /// Positions visited, root included.
    pub nodes: u64,
}

/// Score the position for the player who just moved.
///
/// A complete line is worth [`WON`] (or [`LOST`] if the mover is the
/// opponent). A line one stone short with both ends open is worth
/// [`WIN_THREAT`] / [`LOSS_THREAT`]. Anything else is [`NOTHING`].
pub fn static_evaluate(board: &Board, options: &AiOptions, player_just_moved: Cell) -> i32 {
    let patterns = options.patterns();
    let is_ai = player_just_moved == options.ai_player();

    if !find_pattern(board, patterns.win_now(player_just_moved)).is_empty() {
        return if is_ai { WON } else { LOST };
    }
    if !find_pattern(board, patterns.win_in_a_move(player_just_moved)).is_empty() {
        return if is_ai { WIN_THREAT } else { LOSS_THREAT };
    }
    NOTHING
}

/// Whether a static score ends the game.
pub fn is_decisive(score: i32) -> bool {
    score == WON || score == LOST
}

/// Search `depth` plies ahead of `last_move` and pick the best reply for
/// the other player.
///
/// `candidates` restricts the moves tried at the root; `None` tries every
/// free cell. Deeper plies always try every free cell. Occupied candidates
/// are skipped; off-board ones are an error.
pub fn search(
    board: &Board,
    options: &AiOptions,
    candidates: Option<&[usize]>,
    last_move: LinearMove,
    depth: usize,
    budget: &ThinkBudget,
) -> Result<SearchResult, BoardError> {
    if let Some(cells) = candidates {
        for &idx in cells {
            board.get_cell_linear(idx)?;
        }
    }

    let mut searcher = Searcher {
        options,
        budget,
        nodes: 0,
        stopped: false,
    };
    let (position, score) = searcher.node(board, candidates, last_move.player, depth, -INF, INF);

    if searcher.stopped {
        warn!(nodes = searcher.nodes, "think budget ran out during search");
    }
    debug!(
        ?position,
        score,
        nodes = searcher.nodes,
        alpha_beta = options.use_alpha_beta(),
        "search done"
    );

    Ok(SearchResult {
        position,
        score,
        nodes: searcher.nodes,
    })
}

struct Searcher<'a> {
    options: &'a AiOptions,
    budget: &'a ThinkBudget,
    nodes: u64,
    stopped: bool,
}

impl Searcher<'_> {
    /// Returns the chosen cell and its score. With pruning on, a score at or
    /// below `alpha` (or at or above `beta`) is only a bound.
    fn node(
        &mut self,
        board: &Board,
        candidates: Option<&[usize]>,
        just_moved: Cell,
        depth: usize,
        alpha: i32,
        beta: i32,
    ) -> (Option<usize>, i32) {
        self.nodes += 1;

        let static_score = static_evaluate(board, self.options, just_moved);
        if depth == 0 || is_decisive(static_score) || board.num_free_cells() == 0 {
            return (None, static_score);
        }

        let to_move = just_moved.opponent();
        let maximizing = to_move == self.options.ai_player();
        let prune = self.options.use_alpha_beta();

        let generated;
        let cells = match candidates {
            Some(cells) => cells,
            None => {
                generated = board.free_indices();
                &generated
            }
        };

        let mut best_move = None;
        let mut best = if maximizing { -INF } else { INF };

        for &idx in cells {
            if board.cell_at(idx) != Cell::Empty {
                continue;
            }
            if self.budget.is_exhausted() {
                self.stopped = true;
                break;
            }

            let mut child = board.clone();
            child.put(idx, to_move);

            if maximizing {
                let (_, score) = self.node(&child, None, to_move, depth - 1, alpha.max(best - 1), beta);
                if score >= best {
                    best = score;
                    best_move = Some(idx);
                }
                // Only a strictly better reply lets the parent refute this node
                if prune && best >= beta {
                    break;
                }
            } else {
                let (_, score) = self.node(&child, None, to_move, depth - 1, alpha, beta.min(best + 1));
                if score <= best {
                    best = score;
                    best_move = Some(idx);
                }
                if prune && best <= alpha {
                    break;
                }
            }
        }

        match best_move {
            Some(_) => (best_move, best),
            None => (None, static_score),
        }
    }
}
