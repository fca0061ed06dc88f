//! Error types for the statistics layer.

/// Errors from a [`StatsStore`](crate::StatsStore).
///
/// Callers on the match path never see these: the coordinator reports
/// through a fire-and-forget channel and failures end up in the log.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// The name normalizes to an empty key.
    #[error("player name is blank")]
    BlankName,

    /// The backing store could not complete the request.
    #[error("stats backend unavailable: {0}")]
    Unavailable(String),
}
