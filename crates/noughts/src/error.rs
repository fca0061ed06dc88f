//! Unified error type for the Noughts server.

use noughts_protocol::ProtocolError;
use noughts_session::SessionError;
use noughts_stats::StatsError;
use noughts_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum NoughtsError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A registry invariant was violated.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The statistics store failed.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// The coordinator task is no longer running.
    #[error("coordinator is not running")]
    CoordinatorStopped,
}
