//! Line pattern matching for win and threat detection.
//!
//! A pattern is a short run of [`Cell`] values. The matcher cuts the board
//! into lines (every row, every column and every maximal diagonal of both
//! slopes, each visited exactly once) and runs a Knuth-Morris-Pratt search
//! over each of them.
//!
//! ## Match policy
//!
//! Matches never overlap: after a hit at offset `p` the scan resumes at
//! `p + pattern.len()`. A run of six stones searched with a five-stone
//! pattern is therefore reported once, and a run of eight searched with a
//! four-stone pattern is reported twice. Callers only ask "is there at least
//! one", so the undercount is harmless, but it is a real property of the
//! results.

use crate::board::{Board, Cell, Direction, Point, offset};
use crate::error::SessionError;
use crate::options::AiOptions;

/// An inclusive run of cells matched by a pattern.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    pub direction: Direction,
    pub from: Point,
    pub to: Point,
}

impl Interval {
    /// Number of cells covered.
    pub fn len(&self) -> usize {
        let dc = self.to.0.abs_diff(self.from.0);
        let dr = self.to.1.abs_diff(self.from.1);
        dc.max(dr) + 1
    }

    /// Every cell of the interval, in walking order.
    pub fn unfold(&self) -> Vec<Point> {
        let step = self.direction.step();
        (0..self.len())
            .map(|i| offset(self.from, step, i as isize))
            .collect()
    }
}

// Sorted by direction, then top-most, then left-most start.
impl Ord for Interval {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.direction, self.from.1, self.from.0, self.to.1, self.to.0).cmp(&(
            other.direction,
            other.from.1,
            other.from.0,
            other.to.1,
            other.to.0,
        ))
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// `length` copies of `player`.
pub fn build_pattern(player: Cell, length: usize) -> Vec<Cell> {
    vec![player; length]
}

/// `win_length - 1` copies of `player` with an empty cell on each side:
/// one move away from a win whichever end gets filled.
pub fn build_imminent_pattern(player: Cell, win_length: usize) -> Vec<Cell> {
    let mut pattern = Vec::with_capacity(win_length + 1);
    pattern.push(Cell::Empty);
    pattern.extend(build_pattern(player, win_length.saturating_sub(1)));
    pattern.push(Cell::Empty);
    pattern
}

/// Winning and imminent-win patterns for both players at one win length.
///
/// Built once per [`AiOptions`] and shared by reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternSet {
    win_length: usize,
    win_now: [Vec<Cell>; 2],
    win_in_a_move: [Vec<Cell>; 2],
}

impl PatternSet {
    pub fn new(win_length: usize) -> Self {
        Self {
            win_length,
            win_now: [
                build_pattern(Cell::X, win_length),
                build_pattern(Cell::O, win_length),
            ],
            win_in_a_move: [
                build_imminent_pattern(Cell::X, win_length),
                build_imminent_pattern(Cell::O, win_length),
            ],
        }
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    fn slot(player: Cell) -> usize {
        match player {
            Cell::O => 1,
            _ => 0,
        }
    }

    pub fn win_now(&self, player: Cell) -> &[Cell] {
        &self.win_now[Self::slot(player)]
    }

    pub fn win_in_a_move(&self, player: Cell) -> &[Cell] {
        &self.win_in_a_move[Self::slot(player)]
    }
}

/// KMP failure function: `table[i]` is the length of the longest proper
/// prefix of `pattern[..=i]` that is also its suffix.
pub fn prefix_table(pattern: &[Cell]) -> Vec<usize> {
    let mut table = vec![0; pattern.len()];
    let mut k = 0;
    for i in 1..pattern.len() {
        while k > 0 && pattern[i] != pattern[k] {
            k = table[k - 1];
        }
        if pattern[i] == pattern[k] {
            k += 1;
        }
        table[i] = k;
    }
    table
}

/// Offsets of every non-overlapping occurrence of `pattern` in `line`.
///
/// An empty pattern matches vacuously at offset 0.
pub fn find_all(pattern: &[Cell], line: &[Cell]) -> Vec<usize> {
    if pattern.is_empty() {
        return vec![0];
    }

    let table = prefix_table(pattern);
    let mut found = Vec::new();
    let mut k = 0;
    for (i, &cell) in line.iter().enumerate() {
        while k > 0 && cell != pattern[k] {
            k = table[k - 1];
        }
        if cell == pattern[k] {
            k += 1;
        }
        if k == pattern.len() {
            found.push(i + 1 - k);
            k = 0;
        }
    }
    found
}

/// Matches of `pattern` in a line starting at `start` and walking along
/// `direction`, in board coordinates.
fn scan_line(line: &[Cell], start: Point, direction: Direction, pattern: &[Cell]) -> Vec<Interval> {
    let step = direction.step();
    let last = pattern.len() as isize - 1;
    find_all(pattern, line)
        .into_iter()
        .map(|p| {
            let from = offset(start, step, p as isize);
            Interval {
                direction,
                from,
                to: offset(from, step, last),
            }
        })
        .collect()
}

/// Top (or left) end of every line on the board, grouped rows, columns,
/// then diagonals.
fn line_starts(board: &Board) -> Vec<(Direction, Point)> {
    let (w, h) = (board.width(), board.height());
    let mut starts = Vec::with_capacity(3 * (w + h));

    starts.extend((0..h).map(|row| (Direction::Horizontal, (0, row))));
    starts.extend((0..w).map(|col| (Direction::Vertical, (col, 0))));

    starts.extend((0..w).map(|col| (Direction::DiagonalLeftToRight, (col, 0))));
    starts.extend((1..h).map(|row| (Direction::DiagonalLeftToRight, (0, row))));

    starts.extend((0..w).map(|col| (Direction::DiagonalRightToLeft, (col, 0))));
    starts.extend((1..h).map(|row| (Direction::DiagonalRightToLeft, (w - 1, row))));

    starts
}

/// Cells of the line beginning at `start`. Start points come from the board
/// itself, so the bounds lookup cannot fail.
fn line_from(board: &Board, direction: Direction, start: Point) -> Vec<Cell> {
    board
        .line_bounds(start.0, start.1, direction)
        .and_then(|(from, to)| board.line_slice(from, to))
        .unwrap_or_default()
}

/// Every match of `pattern` anywhere on the board.
///
/// Results come grouped as row matches, then column matches, then diagonal
/// matches; sort them if a stable order matters.
///
/// An empty pattern matches every line vacuously at offset 0 (see
/// [`find_all`]), but an [`Interval`] always covers at least one cell, so at
/// board level the vacuous hits are dropped and the result is empty.
pub fn find_pattern(board: &Board, pattern: &[Cell]) -> Vec<Interval> {
    if pattern.is_empty() {
        return Vec::new();
    }

    let mut intervals = Vec::new();
    for (direction, start) in line_starts(board) {
        let line = line_from(board, direction, start);
        if line.len() < pattern.len() {
            continue;
        }
        intervals.extend(scan_line(&line, start, direction, pattern));
    }
    intervals
}

/// Whether `player` has a complete winning line, and where.
pub fn check_win(board: &Board, options: &AiOptions, player: Cell) -> (bool, Vec<Interval>) {
    let intervals = find_pattern(board, options.patterns().win_now(player));
    (!intervals.is_empty(), intervals)
}

/// Whether `player` has a winning line passing through `index`.
///
/// Only the four lines through that cell are scanned, so this is the cheap
/// check to run right after a stone lands there.
pub fn wins_through(board: &Board, options: &AiOptions, player: Cell, index: usize) -> bool {
    let pattern = options.patterns().win_now(player);
    let point = (index % board.width(), index / board.width());

    Direction::ALL.iter().any(|&direction| {
        let Ok((from, to)) = board.line_bounds(point.0, point.1, direction) else {
            return false;
        };
        board
            .line_slice(from, to)
            .map(|line| !find_all(pattern, &line).is_empty())
            .unwrap_or(false)
    })
}

/// The player holding a winning line, if any.
///
/// A position where both players have won cannot come out of legal play and
/// is reported as [`SessionError::AmbiguousWinner`].
pub fn winner(board: &Board, options: &AiOptions) -> Result<Option<(Cell, Vec<Interval>)>, SessionError> {
    let (x_won, x_lines) = check_win(board, options, Cell::X);
    let (o_won, o_lines) = check_win(board, options, Cell::O);
    match (x_won, o_won) {
        (true, true) => Err(SessionError::AmbiguousWinner),
        (true, false) => Ok(Some((Cell::X, x_lines))),
        (false, true) => Ok(Some((Cell::O, o_lines))),
        (false, false) => Ok(None),
    }
}
