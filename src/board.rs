//! Rectangular board storage and geometry.
//!
//! Cells are kept in a flat row-major vector addressed by
//! `index = row * width + col`. Every public accessor validates its input and
//! returns a [`BoardError`] instead of clamping; crate-internal hot paths use
//! the unchecked `cell_at`/`put` pair.

use std::fmt;
use std::str::FromStr;

use crate::error::BoardError;

/// Content of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    /// The other player. `Empty` stays `Empty`.
    pub fn opponent(self) -> Cell {
        match self {
            Cell::X => Cell::O,
            Cell::O => Cell::X,
            Cell::Empty => Cell::Empty,
        }
    }

    pub fn is_player(self) -> bool {
        self != Cell::Empty
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::X => 'X',
            Cell::O => 'O',
            Cell::Empty => '.',
        }
    }
}

impl TryFrom<char> for Cell {
    type Error = BoardError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'X' | 'x' => Ok(Cell::X),
            'O' | 'o' => Ok(Cell::O),
            '.' | '_' => Ok(Cell::Empty),
            other => Err(BoardError::InvalidCell(other)),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A cell position as `(col, row)`.
pub type Point = (usize, usize);

/// Line orientation on the board.
///
/// Diagonals are always walked downwards: `DiagonalLeftToRight` steps towards
/// increasing columns, `DiagonalRightToLeft` towards decreasing columns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Horizontal,
    Vertical,
    DiagonalLeftToRight,
    DiagonalRightToLeft,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalLeftToRight,
        Direction::DiagonalRightToLeft,
    ];

    /// Unit step `(dcol, drow)` along this direction.
    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (1, 0),
            Direction::Vertical => (0, 1),
            Direction::DiagonalLeftToRight => (1, 1),
            Direction::DiagonalRightToLeft => (-1, 1),
        }
    }
}

/// A move in flat-index form.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LinearMove {
    pub position: usize,
    pub player: Cell,
}

impl LinearMove {
    pub fn new(position: usize, player: Cell) -> Self {
        Self { position, player }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty `width` x `height` board.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        })
    }

    /// Create a board and replay `moves` onto it.
    pub fn from_moves(width: usize, height: usize, moves: &[LinearMove]) -> Result<Self, BoardError> {
        let mut board = Self::new(width, height)?;
        for mv in moves {
            board.set_cell_linear(mv.position, mv.player)?;
        }
        Ok(board)
    }

    /// A board filled with random stones, leaving roughly `empty_percent`
    /// of the cells empty.
    pub fn randomized(
        width: usize,
        height: usize,
        empty_percent: f64,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, BoardError> {
        let mut board = Self::new(width, height)?;
        let n = board.num_cells();
        let empty = ((empty_percent.clamp(0.0, 100.0) / 100.0) * n as f64).round() as usize;

        let mut order: Vec<usize> = (0..n).collect();
        rng.shuffle(&mut order);
        for &idx in &order[empty.min(n)..] {
            board.cells[idx] = if rng.bool() { Cell::X } else { Cell::O };
        }
        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn num_free_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Empty).count()
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, col: usize, row: usize) -> bool {
        col < self.width && row < self.height
    }

    pub fn to_linear(&self, col: usize, row: usize) -> Result<usize, BoardError> {
        if !self.contains(col, row) {
            return Err(BoardError::OutOfBounds { col, row });
        }
        Ok(row * self.width + col)
    }

    pub fn from_linear(&self, index: usize) -> Result<Point, BoardError> {
        if index >= self.cells.len() {
            return Err(BoardError::IndexOutOfBounds(index));
        }
        Ok((index % self.width, index / self.width))
    }

    pub fn get_cell(&self, col: usize, row: usize) -> Result<Cell, BoardError> {
        let idx = self.to_linear(col, row)?;
        Ok(self.cells[idx])
    }

    /// Write `value` at `(col, row)`.
    ///
    /// Placing a stone on an occupied cell fails with [`BoardError::Occupied`];
    /// writing `Empty` always succeeds and clears the cell.
    pub fn set_cell(&mut self, col: usize, row: usize, value: Cell) -> Result<(), BoardError> {
        let idx = self.to_linear(col, row)?;
        if value.is_player() && self.cells[idx].is_player() {
            return Err(BoardError::Occupied { col, row });
        }
        self.cells[idx] = value;
        Ok(())
    }

    pub fn get_cell_linear(&self, index: usize) -> Result<Cell, BoardError> {
        self.cells
            .get(index)
            .copied()
            .ok_or(BoardError::IndexOutOfBounds(index))
    }

    pub fn set_cell_linear(&mut self, index: usize, value: Cell) -> Result<(), BoardError> {
        let (col, row) = self.from_linear(index)?;
        self.set_cell(col, row, value)
    }

    /// Unchecked read. Panics if `index` is off the board.
    #[inline]
    pub(crate) fn cell_at(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Unchecked write. Panics if `index` is off the board.
    #[inline]
    pub(crate) fn put(&mut self, index: usize, value: Cell) {
        self.cells[index] = value;
    }

    /// Cells of `row` from `start_col` to `end_col` inclusive.
    pub fn row_slice(&self, row: usize, start_col: usize, end_col: usize) -> Result<&[Cell], BoardError> {
        let start = self.to_linear(start_col, row)?;
        let end = self.to_linear(end_col, row)?;
        if start > end {
            return Ok(&[]);
        }
        Ok(&self.cells[start..=end])
    }

    /// Cells of `col` from `start_row` to `end_row` inclusive.
    pub fn column_slice(&self, col: usize, start_row: usize, end_row: usize) -> Result<Vec<Cell>, BoardError> {
        self.to_linear(col, start_row)?;
        self.to_linear(col, end_row)?;
        Ok((start_row..=end_row)
            .map(|row| self.cells[row * self.width + col])
            .collect())
    }

    /// Endpoints of the longest on-board line through `(col, row)` along
    /// `direction`, ordered so that walking from the first to the second
    /// follows the direction's step.
    pub fn line_bounds(&self, col: usize, row: usize, direction: Direction) -> Result<(Point, Point), BoardError> {
        self.to_linear(col, row)?;
        let (dc, dr) = direction.step();

        let back = reach(col, self.width, -dc).min(reach(row, self.height, -dr));
        let forward = reach(col, self.width, dc).min(reach(row, self.height, dr));

        let from = offset((col, row), (dc, dr), -(back as isize));
        let to = offset((col, row), (dc, dr), forward as isize);
        Ok((from, to))
    }

    /// Cells on the straight line from `from` to `to` inclusive.
    ///
    /// The unit step is derived from the relative position of the endpoints,
    /// so this one walker covers rows, columns and both diagonal slopes in
    /// either direction.
    pub fn line_slice(&self, from: Point, to: Point) -> Result<Vec<Cell>, BoardError> {
        self.to_linear(from.0, from.1)?;
        self.to_linear(to.0, to.1)?;

        let dc = to.0 as isize - from.0 as isize;
        let dr = to.1 as isize - from.1 as isize;
        if dc != 0 && dr != 0 && dc.abs() != dr.abs() {
            return Err(BoardError::NotALine { from, to });
        }

        let step = (dc.signum(), dr.signum());
        let len = dc.abs().max(dr.abs()) as usize + 1;
        Ok((0..len)
            .map(|i| {
                let (c, r) = offset(from, step, i as isize);
                self.cells[r * self.width + c]
            })
            .collect())
    }

    /// The maximal diagonal through `(col, row)`, walked downwards.
    pub fn diagonal(&self, col: usize, row: usize, direction: Direction) -> Result<Vec<Cell>, BoardError> {
        let (from, to) = self.line_bounds(col, row, direction)?;
        self.line_slice(from, to)
    }

    fn indices_of(&self, pred: impl Fn(Cell) -> bool) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| pred(c))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn free_indices(&self) -> Vec<usize> {
        self.indices_of(|c| c == Cell::Empty)
    }

    pub fn occupied_indices(&self) -> Vec<usize> {
        self.indices_of(Cell::is_player)
    }
}

/// How many unit steps of sign `d` fit between `coord` and the edge of an
/// axis of length `len`.
fn reach(coord: usize, len: usize, d: isize) -> usize {
    match d {
        0 => usize::MAX,
        d if d > 0 => len - 1 - coord,
        _ => coord,
    }
}

pub(crate) fn offset(p: Point, step: (isize, isize), k: isize) -> Point {
    (
        (p.0 as isize + step.0 * k) as usize,
        (p.1 as isize + step.1 * k) as usize,
    )
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            for cell in row {
                write!(f, "{cell} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parse one row per line; whitespace between cells is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for line in s.lines() {
            let row = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(Cell::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            if !row.is_empty() {
                rows.push(row);
            }
        }

        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != width) {
            return Err(BoardError::RaggedRows);
        }

        let mut board = Board::new(width, rows.len())?;
        board.cells = rows.into_iter().flatten().collect();
        Ok(board)
    }
}
