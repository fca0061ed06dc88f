//! Player statistics for Noughts.
//!
//! The coordinator reports three kinds of facts here: "this display name
//! exists", "this name won / lost / drew a match". Reads are a single
//! record lookup and a ranked leaderboard.
//!
//! [`StatsStore`] is the seam. [`MemoryStatsStore`] is the implementation
//! the server ships with; anything durable plugs in behind the same trait.
//!
//! Records are keyed by [`normalize_key`]: `"Ada "` and `"ada"` are the
//! same player.

mod error;
mod memory;
mod store;

pub use error::StatsError;
pub use memory::MemoryStatsStore;
pub use store::{PlayerStats, StatsStore, normalize_key};
