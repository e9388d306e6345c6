//! AI configuration.

use crate::board::Cell;
use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_USE_ALPHA_BETA, DEFAULT_WIN_LENGTH, MIN_WIN_LENGTH};
use crate::error::SessionError;
use crate::patterns::PatternSet;

/// What the AI plays and how hard it thinks.
///
/// Owns the [`PatternSet`] for its win length, so the patterns are built once
/// and every matcher call borrows them from here.
#[derive(Clone, Debug, PartialEq)]
pub struct AiOptions {
    ai_player: Cell,
    win_length: usize,
    max_depth: usize,
    use_alpha_beta: bool,
    patterns: PatternSet,
}

impl AiOptions {
    pub fn new(
        ai_player: Cell,
        win_length: usize,
        max_depth: usize,
        use_alpha_beta: bool,
    ) -> Result<Self, SessionError> {
        if !ai_player.is_player() {
            return Err(SessionError::InvalidPlayer);
        }
        if win_length < MIN_WIN_LENGTH {
            return Err(SessionError::InvalidOptions(format!(
                "win length must be at least {MIN_WIN_LENGTH} (got {win_length})"
            )));
        }
        Ok(Self {
            ai_player,
            win_length,
            max_depth,
            use_alpha_beta,
            patterns: PatternSet::new(win_length),
        })
    }

    /// Defaults from [`crate::constants`] for the given AI side.
    pub fn for_player(ai_player: Cell) -> Result<Self, SessionError> {
        Self::new(ai_player, DEFAULT_WIN_LENGTH, DEFAULT_MAX_DEPTH, DEFAULT_USE_ALPHA_BETA)
    }

    pub fn ai_player(&self) -> Cell {
        self.ai_player
    }

    pub fn opponent(&self) -> Cell {
        self.ai_player.opponent()
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn use_alpha_beta(&self) -> bool {
        self.use_alpha_beta
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_alpha_beta(mut self, use_alpha_beta: bool) -> Self {
        self.use_alpha_beta = use_alpha_beta;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_options() {
        assert_eq!(AiOptions::new(Cell::Empty, 5, 2, false), Err(SessionError::InvalidPlayer));
        assert!(matches!(
            AiOptions::new(Cell::X, 2, 2, false),
            Err(SessionError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_patterns_follow_win_length() {
        let opts = AiOptions::new(Cell::O, 4, 3, true).unwrap();
        assert_eq!(opts.opponent(), Cell::X);
        assert_eq!(opts.patterns().win_length(), 4);
        assert_eq!(opts.patterns().win_now(Cell::O).len(), 4);

        let opts = opts.with_max_depth(1).with_alpha_beta(false);
        assert_eq!(opts.max_depth(), 1);
        assert!(!opts.use_alpha_beta());
    }
}
