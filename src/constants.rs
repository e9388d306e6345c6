//! Engine defaults and score constants.
//!
//! Everything here is a default: boards are sized at runtime and every
//! value below can be overridden through [`crate::options::AiOptions`] or
//! [`crate::session::SessionConfig`].

// =============================================================================
// Game Rules
// =============================================================================

/// Number of stones in a row needed to win.
pub const DEFAULT_WIN_LENGTH: usize = 5;

/// Shortest win length the engine accepts.
pub const MIN_WIN_LENGTH: usize = 3;

/// Side of the square board created for a new session.
pub const DEFAULT_BOARD_SIZE: usize = 19;

// =============================================================================
// Search Parameters
// =============================================================================

/// Default minimax depth (plies) for a session.
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Alpha-beta pruning is on by default; it never changes the chosen move.
pub const DEFAULT_USE_ALPHA_BETA: bool = true;

/// Sentinel bound for the search window. Far outside any real score.
pub const INF: i32 = i32::MAX / 2;

// =============================================================================
// Monte Carlo Parameters
// =============================================================================

/// Playouts per Monte Carlo evaluation.
pub const DEFAULT_TRIALS: usize = 500;

/// Normalised score a cell needs to become a search candidate.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Length of generated session identifiers.
pub const SESSION_ID_LEN: usize = 10;

// =============================================================================
// Static Evaluation Scores
// =============================================================================

/// The AI has completed a winning line.
pub const WON: i32 = 10;

/// The opponent has completed a winning line.
pub const LOST: i32 = -WON;

/// Nothing decisive on the board.
pub const NOTHING: i32 = 0;

/// The AI is one move from a win with both ends open.
pub const WIN_THREAT: i32 = WON - 1;

/// The opponent is one move from a win with both ends open.
pub const LOSS_THREAT: i32 = LOST + 1;
