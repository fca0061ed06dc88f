//! The match registry: every live match, and who sits in which.

use std::collections::HashMap;

use noughts_protocol::MatchId;
use noughts_transport::ConnectionId;
use rand::Rng;

use crate::{Match, MatchStatus, SessionError};

/// Owns all live matches, keyed by [`MatchId`].
///
/// Also keeps the index from participant to their active match. Two
/// invariants hold between calls:
///
/// - every id in `by_participant` points at a match in `matches`, and
///   that match seats the participant;
/// - a participant is seated in at most one live match.
///
/// Finished matches never stay here: [`finish`](Self::finish) removes them
/// together with both index entries.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    matches: HashMap<MatchId, Match>,
    by_participant: HashMap<ConnectionId, MatchId>,
    /// Bumped on every `create_match`; part of the next match id.
    next_seq: u64,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs `a` and `b` into a new match with randomly assigned marks.
    ///
    /// See [`create_match_with_rng`](Self::create_match_with_rng).
    pub fn create_match(
        &mut self,
        a: ConnectionId,
        b: ConnectionId,
    ) -> Result<&Match, SessionError> {
        self.create_match_with_rng(a, b, &mut rand::rng())
    }

    /// Pairs `a` and `b`, drawing mark assignment from `rng`.
    ///
    /// Each participant is equally likely to get X (the first mover). The
    /// match starts InProgress on an empty board. Its id is
    /// `m{seq}-{a}-{b}`: fixed by the pair and the registry's creation
    /// count, so unique for the registry's lifetime.
    ///
    /// # Errors
    /// - [`SessionError::SelfPairing`] if `a == b`
    /// - [`SessionError::AlreadyInMatch`] if either is already seated
    pub fn create_match_with_rng<R: Rng + ?Sized>(
        &mut self,
        a: ConnectionId,
        b: ConnectionId,
        rng: &mut R,
    ) -> Result<&Match, SessionError> {
        if a == b {
            return Err(SessionError::SelfPairing(a));
        }
        for id in [a, b] {
            if let Some(current) = self.by_participant.get(&id) {
                return Err(SessionError::AlreadyInMatch(id, current.clone()));
            }
        }

        self.next_seq += 1;
        let match_id = MatchId::from(format!("m{}-{a}-{b}", self.next_seq));

        let (x, o) = if rng.random_bool(0.5) { (a, b) } else { (b, a) };
        let mut game = Match::new(match_id.clone(), x, o);
        game.transition(MatchStatus::InProgress)?;

        self.by_participant.insert(a, match_id.clone());
        self.by_participant.insert(b, match_id.clone());
        tracing::info!(%match_id, %x, %o, "match created");

        Ok(self.matches.entry(match_id).or_insert(game))
    }

    /// Looks up a live match by id.
    pub fn lookup_by_id(&self, match_id: &MatchId) -> Option<&Match> {
        self.matches.get(match_id)
    }

    /// Looks up the live match `id` is seated in.
    pub fn lookup_by_participant(&self, id: ConnectionId) -> Option<&Match> {
        self.by_participant
            .get(&id)
            .and_then(|match_id| self.matches.get(match_id))
    }

    /// The id of the live match `id` is seated in.
    pub fn active_match_id(&self, id: ConnectionId) -> Option<&MatchId> {
        self.by_participant.get(&id)
    }

    /// Mutable access for applying moves.
    pub fn match_mut(&mut self, match_id: &MatchId) -> Option<&mut Match> {
        self.matches.get_mut(match_id)
    }

    /// Ends a match and removes it with both participant associations.
    ///
    /// `outcome` must be [`MatchStatus::Decided`] or
    /// [`MatchStatus::Forfeited`]. Returns the finished match so the caller
    /// can report on it. Afterwards every lookup for the match or either
    /// participant returns `None`.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] if no live match has this id
    /// - [`SessionError::InvalidTransition`] if `outcome` is not terminal;
    ///   the match stays registered unchanged
    pub fn finish(
        &mut self,
        match_id: &MatchId,
        outcome: MatchStatus,
    ) -> Result<Match, SessionError> {
        let game = self
            .matches
            .get_mut(match_id)
            .ok_or_else(|| SessionError::NotFound(match_id.clone()))?;
        game.transition(outcome)?;

        let game = self
            .matches
            .remove(match_id)
            .ok_or_else(|| SessionError::NotFound(match_id.clone()))?;
        for id in game.participants() {
            self.by_participant.remove(&id);
        }

        tracing::info!(%match_id, status = %game.status(), "match finished");
        Ok(game)
    }

    /// Number of live matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Returns `true` if no match is live.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
