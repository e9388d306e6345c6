use crate::board::Point;

/// Errors raised by board accessors.
///
/// All of them are logic errors on the caller's side; none is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board dimensions must be at least 1x1 (got {width}x{height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("coordinate ({col}, {row}) is outside the board")]
    OutOfBounds { col: usize, row: usize },

    #[error("linear index {0} is outside the board")]
    IndexOutOfBounds(usize),

    #[error("cell ({col}, {row}) is already occupied")]
    Occupied { col: usize, row: usize },

    #[error("{from:?} and {to:?} do not lie on a common row, column or diagonal")]
    NotALine { from: Point, to: Point },

    #[error("invalid cell character {0:?}")]
    InvalidCell(char),

    #[error("board rows have different lengths")]
    RaggedRows,
}

/// Errors raised while driving a game session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("a player must be X or O")]
    InvalidPlayer,

    #[error("invalid AI options: {0}")]
    InvalidOptions(String),

    #[error("both players have a winning line on the board")]
    AmbiguousWinner,

    #[error("the game is already over")]
    GameOver,
}
