//! The statistics store trait and its record type.

use std::cmp::Ordering;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::StatsError;

/// Win/loss/draw counters for one display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Normalized key (see [`normalize_key`]).
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl PlayerStats {
    /// A zeroed record for an already-normalized key.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wins: 0,
            losses: 0,
            draws: 0,
        }
    }

    /// Leaderboard score: three points per win, one per draw.
    pub fn score(&self) -> u64 {
        3 * u64::from(self.wins) + u64::from(self.draws)
    }

    /// Total matches recorded.
    pub fn games(&self) -> u64 {
        u64::from(self.wins) + u64::from(self.losses) + u64::from(self.draws)
    }

    /// Leaderboard order: score descending, then wins descending, then
    /// losses ascending, then name ascending. Total, so ranking is stable
    /// across calls.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score()
            .cmp(&self.score())
            .then_with(|| other.wins.cmp(&self.wins))
            .then_with(|| self.losses.cmp(&other.losses))
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Normalizes a display name into a store key: trimmed and lowercased.
///
/// # Errors
/// Returns [`StatsError::BlankName`] if nothing is left after trimming.
pub fn normalize_key(name: &str) -> Result<String, StatsError> {
    let key = name.trim().to_lowercase();
    if key.is_empty() {
        return Err(StatsError::BlankName);
    }
    Ok(key)
}

/// Storage for per-player statistics.
///
/// Every method takes a display name and normalizes it with
/// [`normalize_key`] before touching the store. Increments create the
/// record first if it is missing, and must be safe to call concurrently
/// for the same name: no increment may be lost.
///
/// ## Example
///
/// ```rust
/// use noughts_stats::{MemoryStatsStore, StatsStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = MemoryStatsStore::new();
/// store.add_win("Ada").await.unwrap();
/// let stats = store.player_stats("ada").await.unwrap().unwrap();
/// assert_eq!(stats.wins, 1);
/// # }
/// ```
pub trait StatsStore: Send + Sync + 'static {
    /// Returns the record for `name`, creating a zeroed one if needed.
    /// Calling it again for the same name changes nothing.
    fn ensure_player_stats(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<PlayerStats, StatsError>> + Send;

    /// Adds one win to `name`.
    fn add_win(&self, name: &str) -> impl Future<Output = Result<(), StatsError>> + Send;

    /// Adds one loss to `name`.
    fn add_loss(&self, name: &str) -> impl Future<Output = Result<(), StatsError>> + Send;

    /// Adds one draw to `name`.
    fn add_draw(&self, name: &str) -> impl Future<Output = Result<(), StatsError>> + Send;

    /// Looks up `name` without creating it.
    fn player_stats(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<PlayerStats>, StatsError>> + Send;

    /// The top `limit` records in [`PlayerStats::rank_cmp`] order.
    fn leaderboard(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<PlayerStats>, StatsError>> + Send;
}
