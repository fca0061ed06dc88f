//! Per-connection delivery of outbound events.
//!
//! The coordinator never touches a socket. It hands events to the
//! [`BroadcastGateway`], which looks up the recipient's [`EventSink`] by
//! [`ConnectionId`] and pushes the event into it. In the server the sink
//! is a [`ChannelSink`]: an unbounded channel drained by the connection's
//! writer task, so a send here never waits on the network.

use std::collections::HashMap;

use noughts_protocol::ServerEvent;
use noughts_transport::ConnectionId;
use tokio::sync::mpsc;

/// Something that has a stable id and can be handed a [`ServerEvent`].
pub trait EventSink: Send + 'static {
    /// The connection this sink delivers to.
    fn id(&self) -> ConnectionId;

    /// Queues `event` for delivery. Returns `false` if the connection is
    /// already gone; the event is then dropped.
    fn deliver(&self, event: ServerEvent) -> bool;
}

/// Channel sender for delivering outbound events to a connection.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// The production [`EventSink`]: one end of an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    id: ConnectionId,
    sender: EventSender,
}

impl ChannelSink {
    /// Wraps an existing sender.
    pub fn new(id: ConnectionId, sender: EventSender) -> Self {
        Self { id, sender }
    }

    /// Creates a sink and the receiver its events arrive on.
    pub fn channel(id: ConnectionId) -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(id, sender), receiver)
    }
}

impl EventSink for ChannelSink {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn deliver(&self, event: ServerEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Routes events to registered sinks by connection id.
#[derive(Debug)]
pub struct BroadcastGateway<S> {
    sinks: HashMap<ConnectionId, S>,
}

impl<S> Default for BroadcastGateway<S> {
    fn default() -> Self {
        Self {
            sinks: HashMap::new(),
        }
    }
}

impl<S: EventSink> BroadcastGateway<S> {
    /// Creates a gateway with no connections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `sink` under its own id. Returns the sink it replaced.
    pub fn register(&mut self, sink: S) -> Option<S> {
        self.sinks.insert(sink.id(), sink)
    }

    /// Removes and returns the sink for `id`.
    pub fn unregister(&mut self, id: ConnectionId) -> Option<S> {
        self.sinks.remove(&id)
    }

    /// Returns `true` if a sink is registered for `id`.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.sinks.contains_key(&id)
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Returns `true` if no connection is registered.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Sends `event` to one connection. Returns whether it was queued.
    ///
    /// Unknown or closed connections drop the event.
    pub fn send_to(&self, id: ConnectionId, event: ServerEvent) -> bool {
        let name = event.name();
        let delivered = self.sinks.get(&id).is_some_and(|sink| sink.deliver(event));
        if delivered {
            tracing::trace!(conn_id = %id, event = name, "event queued");
        } else {
            tracing::debug!(conn_id = %id, event = name, "dropping event for absent connection");
        }
        delivered
    }

    /// Sends an identical copy of `event` to each of `ids`.
    pub fn broadcast(&self, ids: &[ConnectionId], event: &ServerEvent) {
        for id in ids {
            self.send_to(*id, event.clone());
        }
    }
}
