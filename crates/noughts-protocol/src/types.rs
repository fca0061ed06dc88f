//! Protocol event types for the Noughts wire format.
//!
//! Everything here is serialized to JSON and sent over a WebSocket frame.
//! Both enums are *adjacently tagged*: the variant name goes in `event`,
//! the fields go in `data`.
//!
//! ```text
//! { "event": "move", "data": { "gameId": "m1-conn-1-conn-2", "index": 4 } }
//! ```

use std::fmt;

use noughts_engine::{Board, Mark};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MatchId
// ---------------------------------------------------------------------------

/// Identifier of one match, sent to clients as `gameId`.
///
/// A newtype around `String` so it can't be confused with a display name.
/// `#[serde(transparent)]` keeps it a bare string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    /// Wraps a raw identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MatchId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MatchId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// GameResult
// ---------------------------------------------------------------------------

/// How a match ended, as reported in `gameOver`.
///
/// On the wire this is a single string: the winning mark (`"X"` / `"O"`)
/// or `"draw"`. Serde's derive can't express "either a mark or a literal",
/// so the two impls below are written by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// The mark that won, by completing a line or by forfeit.
    Winner(Mark),
    /// Nobody won.
    Draw,
}

impl GameResult {
    const DRAW: &'static str = "draw";

    fn as_wire_str(self) -> &'static str {
        match self {
            Self::Winner(Mark::X) => "X",
            Self::Winner(Mark::O) => "O",
            Self::Draw => Self::DRAW,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

impl Serialize for GameResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire_str())
    }
}

impl<'de> Deserialize<'de> for GameResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "X" => Ok(Self::Winner(Mark::X)),
            "O" => Ok(Self::Winner(Mark::O)),
            Self::DRAW => Ok(Self::Draw),
            other => Err(de::Error::unknown_variant(other, &["X", "O", Self::DRAW])),
        }
    }
}

// ---------------------------------------------------------------------------
// ClientEvent: connection → server
// ---------------------------------------------------------------------------

/// Events a client sends.
///
/// Disconnect has no variant: it is reported by the transport, not sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    /// "Put me in the queue." `name` is optional; blank names fall back to
    /// the connection id.
    Join {
        #[serde(default)]
        name: Option<String>,
    },

    /// "Place my mark at `index` in match `game_id`."
    ///
    /// `index` is a signed integer rather than `usize` so that out-of-range
    /// values still decode and get the `invalid position` reply.
    Move { game_id: MatchId, index: i64 },
}

// ---------------------------------------------------------------------------
// ServerEvent: server → connection(s)
// ---------------------------------------------------------------------------

/// Events the server sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// You are in the queue. Sent only to the joining connection.
    Waiting {},

    /// You have been paired. Each participant gets its own copy with its
    /// own mark and the opponent's display name.
    MatchStarted {
        game_id: MatchId,
        you_are: Mark,
        opponent: String,
    },

    /// Current board and whose turn it is. Identical for both participants.
    State {
        game_id: MatchId,
        board: Board,
        turn: Mark,
    },

    /// The match is over.
    GameOver { game_id: MatchId, result: GameResult },

    /// Your last request was rejected. Sent only to the offending connection.
    Error { message: String },
}

impl ServerEvent {
    /// Builds an `error` event from anything printable.
    pub fn error(message: impl fmt::Display) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }

    /// The wire name of this event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Waiting {} => "waiting",
            Self::MatchStarted { .. } => "matchStarted",
            Self::State { .. } => "state",
            Self::GameOver { .. } => "gameOver",
            Self::Error { .. } => "error",
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
