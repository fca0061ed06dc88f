//! # Noughts
//!
//! Matchmaking and arbitration server for two-player noughts and crosses.
//!
//! Clients connect over WebSocket, send `join`, and are paired first come,
//! first served. The server assigns marks at random, enforces turns and
//! move legality, detects wins and draws, and forfeits a match to the
//! remaining player when the other one's connection drops. Results are
//! reported to a [`StatsStore`](noughts_stats::StatsStore) without ever
//! holding up play.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use noughts::prelude::*;
//!
//! # async fn start() -> Result<(), NoughtsError> {
//! let server = NoughtsServer::builder()
//!     .config(ServerConfig::from_env())
//!     .build(Arc::new(MemoryStatsStore::new()))
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod coordinator;
mod error;
mod gateway;
mod handler;
mod reporter;
mod server;

pub use config::{ENV_BIND, ENV_MAX_NAME_LEN, ServerConfig};
pub use coordinator::{CoordinatorCommand, CoordinatorHandle, SessionCoordinator, spawn_coordinator};
pub use error::NoughtsError;
pub use gateway::{BroadcastGateway, ChannelSink, EventSender, EventSink};
pub use reporter::{MatchOutcome, StatsReporter, StatsRequest, spawn_stats_reporter};
pub use server::{NoughtsServer, NoughtsServerBuilder};

/// Everything needed to embed the server, in one import.
pub mod prelude {
    pub use crate::{NoughtsError, NoughtsServer, NoughtsServerBuilder, ServerConfig};
    pub use noughts_engine::{Board, Evaluation, Mark};
    pub use noughts_protocol::{ClientEvent, Codec, GameResult, JsonCodec, MatchId, ServerEvent};
    pub use noughts_session::SessionConfig;
    pub use noughts_stats::{MemoryStatsStore, PlayerStats, StatsStore};
    pub use noughts_transport::ConnectionId;
}
