//! The session coordinator: the single writer of queue and match state.
//!
//! [`SessionCoordinator`] is a plain synchronous state machine. It is
//! owned by one Tokio task ([`spawn_coordinator`]) and driven by
//! [`CoordinatorCommand`]s that connection handlers send through a
//! [`CoordinatorHandle`]. Each command runs to completion, outbound events
//! included, before the next one is read, so no handler ever sees a
//! half-applied join, move or disconnect.
//!
//! Statistics are the only side effect outside that envelope: they go out
//! through the [`StatsReporter`] and are never awaited.

use std::collections::HashMap;

use noughts_engine::{Evaluation, Mark};
use noughts_protocol::{ClientEvent, GameResult, MatchId, ServerEvent};
use noughts_session::{
    MatchStatus, MatchmakingQueue, Participant, SessionConfig, SessionRegistry,
};
use noughts_transport::ConnectionId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::NoughtsError;
use crate::gateway::{BroadcastGateway, EventSink};
use crate::reporter::{MatchOutcome, StatsReporter};

/// Work for the coordinator task.
#[derive(Debug)]
pub enum CoordinatorCommand<S> {
    /// A connection was accepted; events for it go to `sink`.
    Connect { sink: S },
    /// A decoded inbound event.
    Event { id: ConnectionId, event: ClientEvent },
    /// The connection is gone.
    Disconnect { id: ConnectionId },
}

/// Participants, the waiting queue, live matches and outbound routing.
pub struct SessionCoordinator<S> {
    config: SessionConfig,
    /// Everyone who has joined and not disconnected, seated or not.
    participants: HashMap<ConnectionId, Participant>,
    queue: MatchmakingQueue,
    registry: SessionRegistry,
    gateway: BroadcastGateway<S>,
    reporter: StatsReporter,
}

impl<S: EventSink> SessionCoordinator<S> {
    pub fn new(config: SessionConfig, reporter: StatsReporter) -> Self {
        Self {
            config,
            participants: HashMap::new(),
            queue: MatchmakingQueue::new(),
            registry: SessionRegistry::new(),
            gateway: BroadcastGateway::new(),
            reporter,
        }
    }

    /// Dispatches one command.
    pub fn handle(&mut self, command: CoordinatorCommand<S>) {
        match command {
            CoordinatorCommand::Connect { sink } => self.connect(sink),
            CoordinatorCommand::Event {
                id,
                event: ClientEvent::Join { name },
            } => self.join(id, name.as_deref()),
            CoordinatorCommand::Event {
                id,
                event: ClientEvent::Move { game_id, index },
            } => self.handle_move(id, &game_id, index),
            CoordinatorCommand::Disconnect { id } => self.disconnect(id),
        }
    }

    /// Registers a connection's outbound sink. Nothing is sent yet.
    pub fn connect(&mut self, sink: S) {
        let id = sink.id();
        if self.gateway.register(sink).is_some() {
            tracing::warn!(conn_id = %id, "connection registered twice, sink replaced");
        } else {
            tracing::debug!(conn_id = %id, "connection registered");
        }
    }

    /// Puts `id` in the waiting queue and pairs it if someone is waiting.
    ///
    /// A connection that is already queued or seated gets
    /// `error "already joined"` and nothing changes. One whose previous
    /// match has ended may join again, possibly under a new name.
    pub fn join(&mut self, id: ConnectionId, requested_name: Option<&str>) {
        if self.queue.contains(id) || self.registry.active_match_id(id).is_some() {
            tracing::debug!(conn_id = %id, "join ignored, already joined");
            self.gateway.send_to(id, ServerEvent::error("already joined"));
            return;
        }

        let participant = Participant::new(id, requested_name, &self.config);
        tracing::info!(conn_id = %id, name = participant.name(), "participant joined");
        self.reporter.ensure_player(participant.name());
        self.participants.insert(id, participant);

        self.queue.enqueue(id);
        self.gateway.send_to(id, ServerEvent::Waiting {});
        self.try_pair();
    }

    /// Applies a move from `id` to match `game_id`.
    ///
    /// Moves for a match that is gone, or one the sender is not playing,
    /// are dropped without a reply. Rule violations are answered with an
    /// `error` to the sender only.
    pub fn handle_move(&mut self, id: ConnectionId, game_id: &MatchId, index: i64) {
        if self.registry.active_match_id(id) != Some(game_id) {
            tracing::debug!(conn_id = %id, match_id = %game_id, "stale or foreign move ignored");
            return;
        }
        let Some(game) = self.registry.match_mut(game_id) else {
            return;
        };
        let Some(mark) = game.mark_of(id) else {
            return;
        };

        let evaluation = match game.play(mark, index) {
            Ok(evaluation) => evaluation,
            Err(rejection) => {
                tracing::debug!(conn_id = %id, match_id = %game_id, index, %rejection, "move rejected");
                self.gateway.send_to(id, ServerEvent::error(rejection));
                return;
            }
        };

        let state = ServerEvent::State {
            game_id: game_id.clone(),
            board: *game.board(),
            turn: game.turn(),
        };
        self.gateway.broadcast(&game.participants(), &state);

        match evaluation {
            Evaluation::Ongoing => {}
            Evaluation::Win(winner) => self.finish_decided(game_id, GameResult::Winner(winner)),
            Evaluation::Draw => self.finish_decided(game_id, GameResult::Draw),
        }
    }

    /// Forgets `id` entirely. A match it was playing is forfeited to the
    /// opponent. Unknown ids are a no-op.
    pub fn disconnect(&mut self, id: ConnectionId) {
        let was_queued = self.queue.remove(id);
        let participant = self.participants.remove(&id);
        self.gateway.unregister(id);

        if let Some(match_id) = self.registry.active_match_id(id).cloned() {
            let departed = participant
                .as_ref()
                .map_or_else(|| id.to_string(), |p| p.name().to_owned());
            self.forfeit(&match_id, id, departed);
        }

        tracing::info!(conn_id = %id, was_queued, "connection left");
    }

    /// The waiting queue.
    pub fn queue(&self) -> &MatchmakingQueue {
        &self.queue
    }

    /// Live matches.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// A joined participant, seated or not.
    pub fn participant(&self, id: ConnectionId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    fn try_pair(&mut self) {
        let Some((a, b)) = self.queue.try_dequeue_pair() else {
            return;
        };
        let game = match self.registry.create_match(a, b) {
            Ok(game) => game,
            Err(e) => {
                tracing::error!(error = %e, "pairing failed");
                return;
            }
        };

        let match_id = game.id().clone();
        let seats = game.participants();
        let state = ServerEvent::State {
            game_id: match_id.clone(),
            board: *game.board(),
            turn: game.turn(),
        };

        for (mark, me) in [Mark::X, Mark::O].into_iter().zip(seats) {
            let opponent = display_name(&self.participants, game.player(mark.opponent()));
            self.gateway.send_to(
                me,
                ServerEvent::MatchStarted {
                    game_id: match_id.clone(),
                    you_are: mark,
                    opponent,
                },
            );
        }
        self.gateway.broadcast(&seats, &state);
    }

    fn finish_decided(&mut self, match_id: &MatchId, result: GameResult) {
        let game = match self.registry.finish(match_id, MatchStatus::Decided) {
            Ok(game) => game,
            Err(e) => {
                tracing::error!(%match_id, error = %e, "could not finish match");
                return;
            }
        };
        let seats = game.participants();

        self.gateway.broadcast(
            &seats,
            &ServerEvent::GameOver {
                game_id: match_id.clone(),
                result,
            },
        );

        let outcome = match result {
            GameResult::Winner(mark) => MatchOutcome::Win {
                winner: display_name(&self.participants, game.player(mark)),
                loser: display_name(&self.participants, game.player(mark.opponent())),
            },
            GameResult::Draw => MatchOutcome::Draw {
                players: seats.map(|id| display_name(&self.participants, id)),
            },
        };
        self.reporter.record(outcome);
        tracing::info!(%match_id, %result, "match decided");
    }

    fn forfeit(&mut self, match_id: &MatchId, departed: ConnectionId, departed_name: String) {
        let game = match self.registry.finish(match_id, MatchStatus::Forfeited) {
            Ok(game) => game,
            Err(e) => {
                tracing::error!(%match_id, error = %e, "could not forfeit match");
                return;
            }
        };
        let Some(lost_mark) = game.mark_of(departed) else {
            tracing::error!(%match_id, conn_id = %departed, "departed participant not seated");
            return;
        };
        let survivor = game.player(lost_mark.opponent());

        self.gateway.send_to(
            survivor,
            ServerEvent::GameOver {
                game_id: match_id.clone(),
                result: GameResult::Winner(lost_mark.opponent()),
            },
        );
        self.reporter.record(MatchOutcome::Win {
            winner: display_name(&self.participants, survivor),
            loser: departed_name,
        });
        tracing::info!(%match_id, conn_id = %survivor, "match forfeited to survivor");
    }
}

fn display_name(participants: &HashMap<ConnectionId, Participant>, id: ConnectionId) -> String {
    participants
        .get(&id)
        .map_or_else(|| id.to_string(), |p| p.name().to_owned())
}

/// Cloneable handle for submitting commands to the coordinator task.
#[derive(Debug)]
pub struct CoordinatorHandle<S> {
    sender: mpsc::UnboundedSender<CoordinatorCommand<S>>,
}

impl<S> Clone for CoordinatorHandle<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S: EventSink> CoordinatorHandle<S> {
    /// Registers a connection's sink.
    pub fn connect(&self, sink: S) -> Result<(), NoughtsError> {
        self.send(CoordinatorCommand::Connect { sink })
    }

    /// Forwards a decoded inbound event from `id`.
    pub fn submit(&self, id: ConnectionId, event: ClientEvent) -> Result<(), NoughtsError> {
        self.send(CoordinatorCommand::Event { id, event })
    }

    /// Reports that `id` is gone.
    ///
    /// Never blocks, so it is safe to call from `Drop`.
    pub fn disconnect(&self, id: ConnectionId) -> Result<(), NoughtsError> {
        self.send(CoordinatorCommand::Disconnect { id })
    }

    fn send(&self, command: CoordinatorCommand<S>) -> Result<(), NoughtsError> {
        self.sender
            .send(command)
            .map_err(|_| NoughtsError::CoordinatorStopped)
    }
}

/// Moves `coordinator` into its own task and returns a handle to it.
///
/// The task runs until every [`CoordinatorHandle`] clone is dropped.
pub fn spawn_coordinator<S: EventSink>(
    coordinator: SessionCoordinator<S>,
) -> (CoordinatorHandle<S>, JoinHandle<()>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_coordinator(coordinator, receiver));
    (CoordinatorHandle { sender }, task)
}

async fn run_coordinator<S: EventSink>(
    mut coordinator: SessionCoordinator<S>,
    mut receiver: mpsc::UnboundedReceiver<CoordinatorCommand<S>>,
) {
    tracing::info!("coordinator started");
    while let Some(command) = receiver.recv().await {
        coordinator.handle(command);
    }
    tracing::info!("coordinator stopped");
}
