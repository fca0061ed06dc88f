use std::sync::Arc;

use noughts::prelude::*;

/// How many players the shutdown summary lists.
const LEADERBOARD_SIZE: usize = 10;

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(bind = %config.bind_addr, max_name_len = config.session.max_name_len, "starting");

    let store = Arc::new(MemoryStatsStore::new());
    let server = NoughtsServer::builder()
        .config(config)
        .build(Arc::clone(&store))
        .await?;

    tokio::select! {
        result = server.run() => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("shutdown requested");
        }
    }

    match store.leaderboard(LEADERBOARD_SIZE).await {
        Ok(top) => {
            for (rank, stats) in top.iter().enumerate() {
                tracing::info!(
                    rank = rank + 1,
                    player = %stats.name,
                    score = stats.score(),
                    wins = stats.wins,
                    losses = stats.losses,
                    draws = stats.draws,
                    "leaderboard"
                );
            }
        }
        Err(e) => tracing::warn!(error = %e, "leaderboard unavailable"),
    }

    Ok(())
}
