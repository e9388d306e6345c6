//! Gomoku-AI: an N-in-a-row decision engine.
//!
//! Given a position on a rectangular board, the engine tells whether a player
//! has completed a line of the configured length, and picks a move for the AI
//! side. Move choice is a two-stage pipeline: random Monte Carlo playouts rank
//! the empty cells, then a depth-bounded minimax (optionally alpha-beta
//! pruned) searches the best-ranked ones.
//!
//! ## Modules
//!
//! - [`constants`] - Engine defaults and score constants
//! - [`board`] - Board storage, coordinates and line extraction
//! - [`patterns`] - KMP-based line pattern matching and win detection
//! - [`options`] - AI configuration
//! - [`budget`] - Think-time deadline and cancellation
//! - [`playout`] - Monte Carlo playouts and move ranking
//! - [`search`] - Minimax / alpha-beta search
//! - [`session`] - One human-versus-AI game
//!
//! ## Example
//!
//! ```
//! use gomoku_ai::board::Cell;
//! use gomoku_ai::session::{GameSession, SessionConfig, Turn};
//!
//! let config = SessionConfig { trials: 20, max_depth: 1, seed: Some(1), ..SessionConfig::default() };
//! let mut session = GameSession::with_config(9, 9, Cell::X, config).unwrap();
//!
//! session.play(4, 4).unwrap();
//! let turn = session.make_move().unwrap();
//! assert!(matches!(turn, Turn::AiMoved { .. }));
//! println!("{}", session.board());
//! ```

pub mod board;
pub mod budget;
pub mod constants;
pub mod error;
pub mod options;
pub mod patterns;
pub mod playout;
pub mod search;
pub mod session;

pub use board::{Board, Cell, Direction, LinearMove, Point};
pub use error::{BoardError, SessionError};
pub use options::AiOptions;
pub use patterns::Interval;
pub use session::{GameSession, SessionConfig, Turn};
