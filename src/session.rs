//! One human-versus-AI game.
//!
//! The session owns the board and is its only writer. The rendering/input
//! layer reads [`GameSession::board`], [`GameSession::winner`] and
//! [`GameSession::intervals`], applies human moves with
//! [`GameSession::play`] and asks for the AI reply with
//! [`GameSession::make_move`].

use std::time::Duration;

use tracing::{debug, info};

use crate::board::{Board, Cell, LinearMove, Point};
use crate::budget::ThinkBudget;
use crate::constants::{
    DEFAULT_MAX_DEPTH, DEFAULT_THRESHOLD, DEFAULT_TRIALS, DEFAULT_USE_ALPHA_BETA, DEFAULT_WIN_LENGTH,
    SESSION_ID_LEN,
};
use crate::error::SessionError;
use crate::options::AiOptions;
use crate::patterns::{Interval, check_win, winner};
use crate::playout::{filter_by_threshold, ranked_moves};
use crate::search::search;

/// Tunables for a session. `Default` uses [`crate::constants`].
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub win_length: usize,
    pub max_depth: usize,
    pub use_alpha_beta: bool,
    /// Monte Carlo playouts used to rank candidate moves.
    pub trials: usize,
    /// Minimum normalised Monte Carlo score for a search candidate.
    pub threshold: f64,
    /// Wall-clock limit for one AI move. `None` thinks until done.
    pub think_time: Option<Duration>,
    /// Seed for the session RNG. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            win_length: DEFAULT_WIN_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
            use_alpha_beta: DEFAULT_USE_ALPHA_BETA,
            trials: DEFAULT_TRIALS,
            threshold: DEFAULT_THRESHOLD,
            think_time: None,
            seed: None,
        }
    }
}

/// What [`GameSession::make_move`] did.
#[derive(Clone, Debug, PartialEq)]
pub enum Turn {
    /// The human already had a winning line; no move was made.
    HumanWon,
    /// The AI placed a stone at `position`.
    AiMoved { position: Point, score: i32, won: bool },
    /// The board is full and nobody won.
    Draw,
}

#[derive(Debug)]
pub struct GameSession {
    id: String,
    board: Board,
    options: AiOptions,
    trials: usize,
    threshold: f64,
    think_time: Option<Duration>,
    rng: fastrand::Rng,
    winner: Option<Cell>,
    intervals: Vec<Interval>,
    last_move: Option<LinearMove>,
}

impl GameSession {
    /// A square `board_size` board with default settings; the AI takes the
    /// other side from `human`.
    pub fn create(board_size: usize, human: Cell) -> Result<Self, SessionError> {
        Self::with_config(board_size, board_size, human, SessionConfig::default())
    }

    pub fn with_config(
        width: usize,
        height: usize,
        human: Cell,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        if !human.is_player() {
            return Err(SessionError::InvalidPlayer);
        }
        let options = AiOptions::new(human.opponent(), config.win_length, config.max_depth, config.use_alpha_beta)?;
        let board = Board::new(width, height)?;

        let mut rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let id: String = (0..SESSION_ID_LEN).map(|_| rng.alphanumeric()).collect();
        debug!(%id, width, height, ?human, "session created");

        Ok(Self {
            id,
            board,
            options,
            trials: config.trials,
            threshold: config.threshold,
            think_time: config.think_time,
            rng,
            winner: None,
            intervals: Vec::new(),
            last_move: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn options(&self) -> &AiOptions {
        &self.options
    }

    pub fn human_player(&self) -> Cell {
        self.options.opponent()
    }

    /// The player who completed a line, once somebody has.
    pub fn winner(&self) -> Option<Cell> {
        self.winner
    }

    /// Winning lines found by the most recent win check.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some() || self.board.num_free_cells() == 0
    }

    /// Place a human stone.
    pub fn play(&mut self, col: usize, row: usize) -> Result<(), SessionError> {
        if self.winner.is_some() {
            return Err(SessionError::GameOver);
        }
        let human = self.human_player();
        self.board.set_cell(col, row, human)?;
        self.last_move = Some(LinearMove::new(self.board.to_linear(col, row)?, human));
        Ok(())
    }

    fn budget(&self) -> ThinkBudget {
        match self.think_time {
            Some(limit) => ThinkBudget::with_time_limit(limit),
            None => ThinkBudget::unlimited(),
        }
    }

    /// Check for a human win, otherwise pick and play the AI's move.
    pub fn make_move(&mut self) -> Result<Turn, SessionError> {
        if self.winner.is_some() {
            return Err(SessionError::GameOver);
        }
        let ai = self.options.ai_player();
        let human = self.human_player();

        if let Some((player, intervals)) = winner(&self.board, &self.options)? {
            info!(?player, "winning line already on the board");
            self.winner = Some(player);
            self.intervals = intervals;
            return if player == human {
                Ok(Turn::HumanWon)
            } else {
                Err(SessionError::GameOver)
            };
        }

        let free = self.board.num_free_cells();
        if free == 0 {
            return Ok(Turn::Draw);
        }

        let budget = self.budget();
        let ranked = ranked_moves(&self.board, &self.options, free, self.trials, ai, &mut self.rng, &budget)?;
        let candidates = filter_by_threshold(&ranked, self.threshold);
        debug!(ranked = ranked.len(), candidates = candidates.len(), "monte carlo pruning");
        let candidates = (!candidates.is_empty()).then_some(candidates);

        let last_move = LinearMove::new(self.last_move.map_or(0, |m| m.position), human);
        let result = search(
            &self.board,
            &self.options,
            candidates.as_deref(),
            last_move,
            self.options.max_depth(),
            &budget,
        )?;

        // Search can come back empty-handed at depth 0 or when the budget
        // runs out first; the Monte Carlo favourite is the next best thing
        let Some(index) = result.position.or_else(|| ranked.first().map(|&(idx, _)| idx)) else {
            return Ok(Turn::Draw);
        };

        self.board.set_cell_linear(index, ai)?;
        self.last_move = Some(LinearMove::new(index, ai));
        let position = self.board.from_linear(index)?;

        let (won, intervals) = check_win(&self.board, &self.options, ai);
        self.intervals = intervals;
        if won {
            self.winner = Some(ai);
        }
        info!(?position, score = result.score, nodes = result.nodes, won, "ai moved");

        Ok(Turn::AiMoved {
            position,
            score: result.score,
            won,
        })
    }
}
