//! Turn coordination
//!
//! Resolves an attack from the session holding the turn against its
//! opponent's fleet, then hands the turn over. Once a fleet is
//! obliterated neither side holds the turn and the match is over.

use std::collections::HashMap;

use tracing::info;

use crate::attack::AttackResult;
use crate::board::{Board, Cell};
use crate::error::AppError;
use crate::session::Session;
use crate::types::ClientId;

/// A resolved attack, ready to be reported to both players
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOutcome {
    pub attacker: ClientId,
    pub defender: ClientId,
    pub cell: Cell,
    pub result: AttackResult,
}

impl AttackOutcome {
    /// The defender's fleet is gone and the match has ended
    pub fn is_match_over(&self) -> bool {
        self.result.obliterated
    }
}

/// Resolve `attacker`'s attack on `cell` and pass the turn
///
/// Out-of-turn, unpaired and off-board attacks fail without touching any
/// state.
pub fn resolve_attack(
    sessions: &mut HashMap<ClientId, Session>,
    board: &Board,
    attacker: ClientId,
    cell: Cell,
) -> Result<AttackOutcome, AppError> {
    let session = sessions.get(&attacker).ok_or(AppError::UnknownSession)?;
    let defender = session.opponent.ok_or(AppError::NotPaired)?;
    if !session.turn {
        return Err(AppError::OutOfTurnAttack);
    }
    if !board.contains(cell) {
        return Err(AppError::CellOutOfBounds(cell));
    }

    let target = sessions.get_mut(&defender).ok_or(AppError::NotPaired)?;
    let result = target.fleet.attack(cell);

    if result.obliterated {
        info!("Session {} obliterated the fleet of {}", attacker, defender);
        set_turns(sessions, attacker, false, defender, false);
    } else {
        set_turns(sessions, attacker, false, defender, true);
    }

    Ok(AttackOutcome {
        attacker,
        defender,
        cell,
        result,
    })
}

fn set_turns(
    sessions: &mut HashMap<ClientId, Session>,
    a: ClientId,
    a_turn: bool,
    b: ClientId,
    b_turn: bool,
) {
    for (id, turn) in [(a, a_turn), (b, b_turn)] {
        if let Some(session) = sessions.get_mut(&id) {
            session.turn = turn;
        }
    }
}
