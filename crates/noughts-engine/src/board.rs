//! Marks, the board, and the two rules that operate on them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// The eight lines that win: three rows, three columns, two diagonals.
///
/// Cells are indexed row-major, so `[0, 1, 2]` is the top row and
/// `[0, 4, 8]` is the main diagonal.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

// ---------------------------------------------------------------------------
// Mark
// ---------------------------------------------------------------------------

/// One of the two symbols a participant plays as.
///
/// `X` always moves first. Serializes as the plain strings `"X"` and `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The mark that moves first in every match.
    pub const FIRST: Mark = Mark::X;

    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
        }
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A 3×3 board stored as nine cells, each empty (`None`) or holding a mark.
///
/// `#[serde(transparent)]` puts it on the wire as a bare 9-element array:
/// `[null, "X", null, ...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board([Option<Mark>; CELL_COUNT]);

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self([None; CELL_COUNT])
    }

    /// Creates a board from explicit cell contents.
    pub fn from_cells(cells: [Option<Mark>; CELL_COUNT]) -> Self {
        Self(cells)
    }

    /// Returns all nine cells.
    pub fn cells(&self) -> &[Option<Mark>; CELL_COUNT] {
        &self.0
    }

    /// Returns the content of a cell, or `None` for an empty or
    /// out-of-range index.
    pub fn get(&self, index: usize) -> Option<Mark> {
        self.0.get(index).copied().flatten()
    }

    /// Returns `true` if `index` is on the board and the cell is empty.
    pub fn is_vacant(&self, index: usize) -> bool {
        index < CELL_COUNT && self.0[index].is_none()
    }

    /// Returns `true` if every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.0.iter().filter(|c| c.is_some()).count()
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// The mark completed a line.
    Win(Mark),
    /// Every cell is taken and nobody completed a line.
    Draw,
    /// The game can continue.
    Ongoing,
}

impl Evaluation {
    /// Returns `true` for `Win` and `Draw`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Places `mark` at `index` and returns the new board.
///
/// The caller must have checked that `index` is in `0..9` and the cell is
/// empty. Breaking that precondition is a bug in the caller; debug builds
/// panic on it.
pub fn apply_move(board: &Board, index: usize, mark: Mark) -> Board {
    debug_assert!(
        board.is_vacant(index),
        "apply_move precondition violated: cell {index} is not vacant"
    );
    let mut next = *board;
    next.0[index] = Some(mark);
    next
}

/// Decides whether the board is won, drawn, or still open.
///
/// Lines are checked in [`WINNING_LINES`] order. With correctly alternating
/// moves at most one mark can complete a line, so the order does not affect
/// the answer.
pub fn evaluate(board: &Board) -> Evaluation {
    for [a, b, c] in WINNING_LINES {
        if let Some(mark) = board.0[a] {
            if board.0[b] == Some(mark) && board.0[c] == Some(mark) {
                return Evaluation::Win(mark);
            }
        }
    }
    if board.is_full() {
        Evaluation::Draw
    } else {
        Evaluation::Ongoing
    }
}
