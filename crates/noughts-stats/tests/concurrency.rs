//! Concurrent access to the in-memory stats store.

use std::sync::Arc;

use noughts_stats::{MemoryStatsStore, StatsStore};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_increments_are_not_lost() {
    let store = Arc::new(MemoryStatsStore::new());
    let mut tasks = Vec::new();

    for i in 0..200 {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            // Mixed case and padding all land on the same key.
            let name = if i % 2 == 0 { "Ada" } else { " ada " };
            match i % 3 {
                0 => store.add_win(name).await,
                1 => store.add_loss(name).await,
                _ => store.add_draw(name).await,
            }
        }));
    }
    for task in tasks {
        task.await.expect("task panicked").expect("increment failed");
    }

    let stats = store.player_stats("ADA").await.unwrap().unwrap();
    assert_eq!(stats.games(), 200);
    assert_eq!(stats.wins, 67);
    assert_eq!(stats.losses, 67);
    assert_eq!(stats.draws, 66);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ensure_creates_one_record() {
    let store = Arc::new(MemoryStatsStore::new());
    let mut tasks = Vec::new();

    for _ in 0..50 {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            store.ensure_player_stats("grace").await
        }));
    }
    for task in tasks {
        task.await.expect("task panicked").expect("ensure failed");
    }

    assert_eq!(store.len().await, 1);
    assert_eq!(store.player_stats("grace").await.unwrap().unwrap().games(), 0);
}

#[tokio::test]
async fn test_store_usable_through_generic_bound() {
    async fn record_draw<S: StatsStore>(store: &S, a: &str, b: &str) {
        store.add_draw(a).await.unwrap();
        store.add_draw(b).await.unwrap();
    }

    let store = MemoryStatsStore::new();
    record_draw(&store, "ada", "grace").await;

    let board = store.leaderboard(10).await.unwrap();
    assert_eq!(board.len(), 2);
    // Equal counters fall back to name order.
    assert_eq!(board[0].name, "ada");
    assert_eq!(board[1].name, "grace");
}
