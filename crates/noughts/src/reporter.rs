//! Fire-and-forget reporting to the statistics store.
//!
//! The coordinator must never wait on the store. It pushes a
//! [`StatsRequest`] into an unbounded channel and moves on. A reporter task
//! on the other end runs each request as its own detached task, so one slow
//! call does not hold up the next, and logs any failure.

use std::sync::Arc;

use noughts_stats::{StatsError, StatsStore};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The result of a decided or forfeited match, by display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// One side won, the other lost. Forfeits are reported this way too.
    Win { winner: String, loser: String },
    /// The board filled with no line.
    Draw { players: [String; 2] },
}

/// One request for the reporter task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsRequest {
    /// Make sure a record exists for this display name.
    Ensure { name: String },
    /// Record a finished match.
    Record(MatchOutcome),
}

/// Cloneable sending side of the reporter channel.
#[derive(Debug, Clone)]
pub struct StatsReporter {
    sender: mpsc::UnboundedSender<StatsRequest>,
}

impl StatsReporter {
    /// Creates a reporter whose requests arrive on the returned receiver.
    ///
    /// [`spawn_stats_reporter`] pairs this with a store; tests read the
    /// receiver directly.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StatsRequest>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Queues a get-or-create for `name`.
    pub fn ensure_player(&self, name: &str) {
        self.submit(StatsRequest::Ensure {
            name: name.to_owned(),
        });
    }

    /// Queues a finished match.
    pub fn record(&self, outcome: MatchOutcome) {
        self.submit(StatsRequest::Record(outcome));
    }

    fn submit(&self, request: StatsRequest) {
        if let Err(err) = self.sender.send(request) {
            tracing::warn!(request = ?err.0, "stats reporter stopped, dropping request");
        }
    }
}

/// Starts the reporter task for `store`.
///
/// The task runs until every [`StatsReporter`] clone is dropped.
pub fn spawn_stats_reporter<S: StatsStore>(store: Arc<S>) -> (StatsReporter, JoinHandle<()>) {
    let (reporter, receiver) = StatsReporter::channel();
    let task = tokio::spawn(run_reporter(store, receiver));
    (reporter, task)
}

async fn run_reporter<S: StatsStore>(
    store: Arc<S>,
    mut receiver: mpsc::UnboundedReceiver<StatsRequest>,
) {
    tracing::debug!("stats reporter started");

    while let Some(request) = receiver.recv().await {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            if let Err(e) = apply(store.as_ref(), &request).await {
                tracing::warn!(?request, error = %e, "stats update failed");
            }
        });
    }

    tracing::debug!("stats reporter stopped");
}

/// Runs one request against the store.
///
/// For a win both increments are attempted even if the first fails; the
/// first error is returned.
pub(crate) async fn apply<S: StatsStore>(
    store: &S,
    request: &StatsRequest,
) -> Result<(), StatsError> {
    match request {
        StatsRequest::Ensure { name } => store.ensure_player_stats(name).await.map(|_| ()),
        StatsRequest::Record(MatchOutcome::Win { winner, loser }) => {
            let won = store.add_win(winner).await;
            let lost = store.add_loss(loser).await;
            won.and(lost)
        }
        StatsRequest::Record(MatchOutcome::Draw { players: [a, b] }) => {
            let first = store.add_draw(a).await;
            let second = store.add_draw(b).await;
            first.and(second)
        }
    }
}
