//! Error types for the session layer.

use noughts_protocol::MatchId;
use noughts_transport::ConnectionId;

use crate::MatchStatus;

/// Errors from registry operations.
///
/// These are invariant violations the coordinator should never trigger.
/// Move rejections are not errors in this sense; see
/// [`MoveRejection`](crate::MoveRejection).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No live match has this id.
    #[error("match {0} not found")]
    NotFound(MatchId),

    /// The participant is already seated in a live match.
    #[error("participant {0} is already in match {1}")]
    AlreadyInMatch(ConnectionId, MatchId),

    /// A match needs two different participants.
    #[error("participant {0} cannot be paired with itself")]
    SelfPairing(ConnectionId),

    /// The lifecycle does not allow this transition.
    #[error("match {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: MatchId,
        from: MatchStatus,
        to: MatchStatus,
    },
}
