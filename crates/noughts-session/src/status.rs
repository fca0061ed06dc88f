//! Match lifecycle state machine.

use std::fmt;

/// The lifecycle state of a match.
///
/// ```text
///                      ┌──→ Decided     (a move won or filled the board)
/// Created → InProgress ┤
///                      └──→ Forfeited   (a participant's connection dropped)
/// ```
///
/// - **Created**: seats and marks assigned, nothing broadcast yet.
/// - **InProgress**: accepting moves from whoever holds `turn`.
/// - **Decided** / **Forfeited**: terminal. No transition leaves them and
///   the match accepts no further mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    Created,
    InProgress,
    Decided,
    Forfeited,
}

impl MatchStatus {
    /// Returns `true` while moves are accepted.
    pub fn is_active(self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Returns `true` for both terminal states.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Decided | Self::Forfeited)
    }

    /// Returns `true` if moving to `target` is a valid step.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Created, Self::InProgress)
                | (Self::InProgress, Self::Decided)
                | (Self::InProgress, Self::Forfeited)
        )
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Decided => write!(f, "Finished-Decided"),
            Self::Forfeited => write!(f, "Finished-Forfeited"),
        }
    }
}
