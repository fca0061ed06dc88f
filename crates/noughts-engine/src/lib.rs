//! Board rules for Noughts.
//!
//! This crate is the bottom of the stack. It knows what a board looks like,
//! how a mark lands on it, and whether the board is won, drawn, or still
//! open. It has no I/O and keeps no state beyond the [`Board`] value it is
//! handed.
//!
//! ```text
//!  0 | 1 | 2
//! ---+---+---
//!  3 | 4 | 5
//! ---+---+---
//!  6 | 7 | 8
//! ```

mod board;

pub use board::{Board, CELL_COUNT, Evaluation, Mark, WINNING_LINES, apply_move, evaluate};
