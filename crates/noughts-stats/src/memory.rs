//! In-memory [`StatsStore`].

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{PlayerStats, StatsError, StatsStore, normalize_key};

/// A [`StatsStore`] kept in a map behind a Tokio `RwLock`.
///
/// Each increment holds the write lock for its whole read-modify-write, so
/// concurrent increments for the same name never lose updates. Contents
/// live as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    players: RwLock<HashMap<String, PlayerStats>>,
}

impl MemoryStatsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct players recorded.
    pub async fn len(&self) -> usize {
        self.players.read().await.len()
    }

    /// Returns `true` if no player has been recorded.
    pub async fn is_empty(&self) -> bool {
        self.players.read().await.is_empty()
    }

    async fn bump(
        &self,
        name: &str,
        counter: impl FnOnce(&mut PlayerStats),
    ) -> Result<(), StatsError> {
        let key = normalize_key(name)?;
        let mut players = self.players.write().await;
        let stats = players
            .entry(key)
            .or_insert_with_key(|key| PlayerStats::new(key.clone()));
        counter(stats);
        tracing::debug!(
            player = %stats.name,
            wins = stats.wins,
            losses = stats.losses,
            draws = stats.draws,
            "stats updated"
        );
        Ok(())
    }
}

impl StatsStore for MemoryStatsStore {
    async fn ensure_player_stats(&self, name: &str) -> Result<PlayerStats, StatsError> {
        let key = normalize_key(name)?;
        let mut players = self.players.write().await;
        let stats = players.entry(key).or_insert_with_key(|key| {
            tracing::debug!(player = %key, "stats record created");
            PlayerStats::new(key.clone())
        });
        Ok(stats.clone())
    }

    async fn add_win(&self, name: &str) -> Result<(), StatsError> {
        self.bump(name, |s| s.wins += 1).await
    }

    async fn add_loss(&self, name: &str) -> Result<(), StatsError> {
        self.bump(name, |s| s.losses += 1).await
    }

    async fn add_draw(&self, name: &str) -> Result<(), StatsError> {
        self.bump(name, |s| s.draws += 1).await
    }

    async fn player_stats(&self, name: &str) -> Result<Option<PlayerStats>, StatsError> {
        let key = normalize_key(name)?;
        Ok(self.players.read().await.get(&key).cloned())
    }

    async fn leaderboard(&self, limit: usize) -> Result<Vec<PlayerStats>, StatsError> {
        let mut ranked: Vec<PlayerStats> = self.players.read().await.values().cloned().collect();
        ranked.sort_by(PlayerStats::rank_cmp);
        ranked.truncate(limit);
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_player_stats_creates_zeroed_record() {
        let store = MemoryStatsStore::new();
        let stats = store.ensure_player_stats("Ada").await.unwrap();
        assert_eq!(stats, PlayerStats::new("ada"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_ensure_player_stats_is_idempotent() {
        let store = MemoryStatsStore::new();
        store.add_win("ada").await.unwrap();

        let stats = store.ensure_player_stats("  ADA ").await.unwrap();
        assert_eq!(stats.wins, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_increments_create_missing_record() {
        let store = MemoryStatsStore::new();
        store.add_loss("grace").await.unwrap();
        store.add_draw("grace").await.unwrap();
        store.add_draw("Grace").await.unwrap();

        let stats = store.player_stats("grace").await.unwrap().unwrap();
        assert_eq!((stats.wins, stats.losses, stats.draws), (0, 1, 2));
    }

    #[tokio::test]
    async fn test_player_stats_does_not_create() {
        let store = MemoryStatsStore::new();
        assert_eq!(store.player_stats("nobody").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let store = MemoryStatsStore::new();
        assert!(matches!(
            store.add_win("   ").await,
            Err(StatsError::BlankName)
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_leaderboard_orders_and_limits() {
        let store = MemoryStatsStore::new();
        // carol: 2 wins (6). ada: 1 win 3 draws (6). bob: 1 win (3). dan: 1 draw (1).
        for _ in 0..2 {
            store.add_win("carol").await.unwrap();
        }
        store.add_win("ada").await.unwrap();
        for _ in 0..3 {
            store.add_draw("ada").await.unwrap();
        }
        store.add_win("bob").await.unwrap();
        store.add_draw("dan").await.unwrap();

        let top: Vec<String> = store
            .leaderboard(3)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(top, vec!["carol", "ada", "bob"]);
    }

    #[tokio::test]
    async fn test_leaderboard_empty_store() {
        let store = MemoryStatsStore::new();
        assert!(store.leaderboard(10).await.unwrap().is_empty());
    }
}
