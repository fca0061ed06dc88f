//! Wire protocol for Noughts.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Events** ([`ClientEvent`], [`ServerEvent`]): what travels on the
//!   wire, one JSON object per frame.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how events are turned
//!   into bytes and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong doing that.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and the
//! coordinator (match logic). It doesn't know about connections or
//! matches in progress; it only knows the shapes.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientEvent) → Coordinator
//! Coordinator → Protocol (ServerEvent) → Transport (bytes)
//! ```
//!
//! Every frame looks like `{"event": "<name>", "data": { ... }}`.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientEvent, GameResult, MatchId, ServerEvent};

pub use noughts_engine::{Board, Mark};
