//! Session struct definition
//!
//! Represents one connected player: their outbound channel, readiness,
//! turn flag, fleet, and the id of the paired opponent.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::SendError;
use crate::fleet::Fleet;
use crate::message::ServerMessage;
use crate::types::ClientId;

/// Connected player state
///
/// `opponent` is set only by the matchmaker and cleared when the opponent
/// disconnects. Within a match, `a.opponent == Some(b)` iff
/// `b.opponent == Some(a)`.
#[derive(Debug)]
pub struct Session {
    /// Unique identifier for this session
    pub id: ClientId,
    /// Server → Client message channel
    pub sender: mpsc::Sender<ServerMessage>,
    /// Fleet passed placement validation
    pub ready: bool,
    /// This player may attack next
    pub turn: bool,
    /// Player's own fleet
    pub fleet: Fleet,
    /// Paired opponent, if any
    pub opponent: Option<ClientId>,
}

impl Session {
    /// Create a new session with an empty fleet
    pub fn new(id: ClientId, sender: mpsc::Sender<ServerMessage>, fleet: Fleet) -> Self {
        Self {
            id,
            sender,
            ready: false,
            turn: false,
            fleet,
            opponent: None,
        }
    }

    /// Queue a message for this session without waiting
    ///
    /// Fails if the player's outbound queue is full (not reading) or the
    /// channel is closed (player disconnected). The message is dropped.
    pub fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender.try_send(msg).map_err(|e| match e {
            TrySendError::Full(_) => SendError::QueueFull,
            TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }

    /// Replace the fleet with a validated one and mark the session ready
    pub fn commit_fleet(&mut self, fleet: Fleet) {
        self.fleet = fleet;
        self.ready = true;
    }

    pub fn is_paired(&self) -> bool {
        self.opponent.is_some()
    }

    /// Drop the link to the opponent, ending any match in progress
    pub fn unlink(&mut self) {
        self.opponent = None;
        self.turn = false;
    }
}
