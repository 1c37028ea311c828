//! Message protocol definitions
//!
//! JSON-based bidirectional message protocol. Each frame is a record whose
//! field names select the message kind: client frames are single-key
//! objects (Serde's externally tagged enum), server frames are flat
//! records (untagged struct variants).

use serde::{Deserialize, Serialize};

use crate::attack::AttackResult;
use crate::board::Cell;
use crate::error::AppError;
use crate::fleet::{CandidateFleet, FleetTemplate};

/// Client → Server message
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub enum ClientMessage {
    /// Submit a fleet placement and ask to be matched
    Ships(CandidateFleet),
    /// Attack a cell on the opponent's board
    CellAttacked(Cell),
}

impl ClientMessage {
    /// Decode a text frame, mapping any schema mismatch to `MalformedMessage`
    pub fn parse(text: &str) -> Result<Self, AppError> {
        serde_json::from_str(text).map_err(|e| AppError::MalformedMessage(e.to_string()))
    }
}

/// Server → Client message
#[derive(Debug, Clone, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Squadron template and board dimensions, sent once per connection
    Setup {
        ships: FleetTemplate,
        width: usize,
        height: usize,
    },
    /// Response to a placement submission
    ReadyAccepted { ready_accepted: bool },
    /// Turn state, sent to both players on pairing and after every attack
    YourTurn { your_turn: bool },
    /// Attack outcome, sent to the attacker
    HitOpponentStatus { hit_opponent_status: AttackResult },
    /// Attack outcome and target, sent to the defender
    HitSelfStatus {
        hit_self_status: AttackResult,
        cell: Cell,
    },
    /// The paired opponent disconnected; the match is over
    OpponentLeft { opponent_left: bool },
}

impl ServerMessage {
    /// Encode as a text frame payload
    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(self)?)
    }
}
