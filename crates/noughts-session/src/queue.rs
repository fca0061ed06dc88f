//! The waiting queue: participants who joined but are not yet paired.

use std::collections::VecDeque;

use noughts_transport::ConnectionId;

/// FIFO list of unpaired participants.
///
/// Holds ids only. A given id appears at most once; the earliest arrival
/// is always at the front and is never skipped over.
#[derive(Debug, Default)]
pub struct MatchmakingQueue {
    waiting: VecDeque<ConnectionId>,
}

impl MatchmakingQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` to the tail.
    ///
    /// Returns `false` (and changes nothing) if `id` is already waiting.
    pub fn enqueue(&mut self, id: ConnectionId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.waiting.push_back(id);
        tracing::debug!(%id, waiting = self.waiting.len(), "enqueued");
        true
    }

    /// Removes and returns the two longest-waiting participants, oldest
    /// first. With fewer than two waiting, returns `None` and leaves the
    /// queue as it was.
    pub fn try_dequeue_pair(&mut self) -> Option<(ConnectionId, ConnectionId)> {
        if self.waiting.len() < 2 {
            return None;
        }
        let first = self.waiting.pop_front()?;
        let second = self.waiting.pop_front()?;
        Some((first, second))
    }

    /// Removes `id` if it is waiting. Returns whether it was.
    pub fn remove(&mut self, id: ConnectionId) -> bool {
        match self.waiting.iter().position(|w| *w == id) {
            Some(pos) => {
                self.waiting.remove(pos);
                tracing::debug!(%id, "removed from queue");
                true
            }
            None => false,
        }
    }

    /// Returns `true` if `id` is waiting.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.waiting.contains(&id)
    }

    /// Number of waiting participants.
    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    /// Returns `true` if nobody is waiting.
    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}
