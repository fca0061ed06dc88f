//! One match: board, seats, turn, lifecycle, and move validation.

use std::fmt;

use noughts_engine::{Board, CELL_COUNT, Evaluation, Mark};
use noughts_protocol::MatchId;
use noughts_transport::ConnectionId;

use crate::{MatchStatus, SessionError};

/// Why a move was refused. The board and turn are untouched in every case.
///
/// `Display` gives the exact text sent back in the `error` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// The match is not accepting moves.
    NotActive,
    /// The sender's mark does not hold the turn.
    NotYourTurn,
    /// The index is outside `0..=8`.
    InvalidPosition,
    /// The target cell already holds a mark.
    CellOccupied,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotActive => write!(f, "match is not in progress"),
            Self::NotYourTurn => write!(f, "not your turn"),
            Self::InvalidPosition => write!(f, "invalid position"),
            Self::CellOccupied => write!(f, "cell occupied"),
        }
    }
}

/// A two-player match.
///
/// Holds the two participants by id only. Fields are private: the
/// [`SessionRegistry`](crate::SessionRegistry) creates and retires matches,
/// and the only in-place mutation is [`play`](Self::play).
#[derive(Debug, Clone)]
pub struct Match {
    id: MatchId,
    board: Board,
    x: ConnectionId,
    o: ConnectionId,
    turn: Mark,
    status: MatchStatus,
}

impl Match {
    /// Seats `x` and `o` on an empty board with X to move.
    pub(crate) fn new(id: MatchId, x: ConnectionId, o: ConnectionId) -> Self {
        Self {
            id,
            board: Board::new(),
            x,
            o,
            turn: Mark::FIRST,
            status: MatchStatus::Created,
        }
    }

    pub fn id(&self) -> &MatchId {
        &self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The mark whose move it is.
    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    /// The participant playing `mark`.
    pub fn player(&self, mark: Mark) -> ConnectionId {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }

    /// Both participants, X first.
    pub fn participants(&self) -> [ConnectionId; 2] {
        [self.x, self.o]
    }

    /// The mark `id` plays, or `None` if `id` is not seated here.
    pub fn mark_of(&self, id: ConnectionId) -> Option<Mark> {
        if id == self.x {
            Some(Mark::X)
        } else if id == self.o {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// The other participant, or `None` if `id` is not seated here.
    pub fn opponent_of(&self, id: ConnectionId) -> Option<ConnectionId> {
        self.mark_of(id).map(|mark| self.player(mark.opponent()))
    }

    /// Checks a move for `mark` at `index` without changing anything.
    ///
    /// Checks run in a fixed order: status, turn, range, occupancy.
    /// Returns the index as a board position on success.
    pub fn check_move(&self, mark: Mark, index: i64) -> Result<usize, MoveRejection> {
        if !self.status.is_active() {
            return Err(MoveRejection::NotActive);
        }
        if mark != self.turn {
            return Err(MoveRejection::NotYourTurn);
        }
        let cell = usize::try_from(index)
            .ok()
            .filter(|i| *i < CELL_COUNT)
            .ok_or(MoveRejection::InvalidPosition)?;
        if !self.board.is_vacant(cell) {
            return Err(MoveRejection::CellOccupied);
        }
        Ok(cell)
    }

    /// Validates and applies a move, then flips the turn.
    ///
    /// Returns the board evaluation after the move. On rejection nothing
    /// changes. The status is left as is: deciding the match is the
    /// registry's job.
    pub fn play(&mut self, mark: Mark, index: i64) -> Result<Evaluation, MoveRejection> {
        let cell = self.check_move(mark, index)?;
        self.board = noughts_engine::apply_move(&self.board, cell, mark);
        self.turn = self.turn.opponent();
        Ok(noughts_engine::evaluate(&self.board))
    }

    pub(crate) fn transition(&mut self, to: MatchStatus) -> Result<(), SessionError> {
        if !self.status.can_transition_to(to) {
            return Err(SessionError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
