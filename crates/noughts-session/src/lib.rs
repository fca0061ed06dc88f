//! Player and match bookkeeping for Noughts.
//!
//! This crate holds the state the coordinator mutates:
//!
//! 1. **Participants**: who announced intent to play, under what name
//!    ([`Participant`], [`SessionConfig`])
//! 2. **The waiting queue**: who is not yet paired, in arrival order
//!    ([`MatchmakingQueue`])
//! 3. **Live matches**: board, seats, turn and lifecycle per match, plus
//!    which participant sits in which match ([`Match`], [`SessionRegistry`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Coordinator (above)  ← the only writer of everything in this crate
//!     ↕
//! Session Layer (this crate)  ← queue, registry, move validation
//!     ↕
//! Engine / Protocol (below)  ← board rules, MatchId
//! ```
//!
//! Nothing here is thread-safe on its own. The coordinator owns these
//! values inside a single task and is the only code that touches them.

mod error;
mod game;
mod participant;
mod queue;
mod registry;
mod status;

pub use error::SessionError;
pub use game::{Match, MoveRejection};
pub use participant::{Participant, SessionConfig, normalize_display_name};
pub use queue::MatchmakingQueue;
pub use registry::SessionRegistry;
pub use status::MatchStatus;
