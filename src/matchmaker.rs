//! Matchmaker
//!
//! Holds at most one waiting session. The next ready session is paired
//! with it, and a fair coin decides who attacks first.

use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, info};

use crate::error::AppError;
use crate::session::Session;
use crate::types::ClientId;

/// Result of a ready submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// No one else is waiting; the session now holds the slot
    Waiting,
    /// Paired; `first` has the opening turn
    Paired { first: ClientId, second: ClientId },
}

/// The matchmaking slot
#[derive(Debug, Default)]
pub struct Matchmaker {
    waiting: Option<ClientId>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session currently waiting for an opponent
    pub fn waiting(&self) -> Option<ClientId> {
        self.waiting
    }

    /// Fail if the session is already queued or paired
    pub fn check_eligible(&self, session: &Session) -> Result<(), AppError> {
        if self.waiting == Some(session.id) || session.is_paired() {
            return Err(AppError::AlreadyPairedOrQueued);
        }
        Ok(())
    }

    /// Queue a ready session, or pair it with the one already waiting
    pub fn submit_ready<R: Rng>(
        &mut self,
        sessions: &mut HashMap<ClientId, Session>,
        id: ClientId,
        rng: &mut R,
    ) -> Result<Pairing, AppError> {
        let session = sessions.get(&id).ok_or(AppError::UnknownSession)?;
        self.check_eligible(session)?;
        if !session.ready {
            return Err(AppError::NotReady);
        }

        let Some(waiting_id) = self.waiting.filter(|w| sessions.contains_key(w)) else {
            debug!("Session {} waiting for an opponent", id);
            self.waiting = Some(id);
            return Ok(Pairing::Waiting);
        };
        self.waiting = None;

        let (first, second) = if rng.gen_bool(0.5) {
            (id, waiting_id)
        } else {
            (waiting_id, id)
        };
        for (this, other, turn) in [(first, second, true), (second, first, false)] {
            if let Some(session) = sessions.get_mut(&this) {
                session.opponent = Some(other);
                session.turn = turn;
            }
        }

        info!("Paired {} with {}, {} moves first", first, second, first);
        Ok(Pairing::Paired { first, second })
    }

    /// Clear the slot if `id` holds it. Returns whether it did.
    pub fn withdraw(&mut self, id: ClientId) -> bool {
        if self.waiting == Some(id) {
            self.waiting = None;
            true
        } else {
            false
        }
    }
}
