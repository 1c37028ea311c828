//! Error types for the game server
//!
//! Defines application-level errors, placement rejections, configuration
//! errors and message send errors. Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::board::Cell;
use crate::types::SquadronKey;

/// Application-level errors
///
/// Covers both fatal errors (connection termination) and game errors,
/// which are always local: they leave prior state intact and never stop
/// the server actor.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,

    /// Unparseable or unrecognized frame
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// Submitted fleet failed count, geometry or adjacency checks
    #[error("Invalid placement: {0}")]
    InvalidPlacement(#[from] PlacementError),

    /// Attack from a session whose turn it is not, or after the match ended
    #[error("Attack out of turn")]
    OutOfTurnAttack,

    /// Ready submission from a session already waiting or paired
    #[error("Already paired or queued")]
    AlreadyPairedOrQueued,

    /// Ready submission before the fleet passed validation
    #[error("Fleet not ready")]
    NotReady,

    /// Attack from a session without an opponent
    #[error("Not paired")]
    NotPaired,

    /// Attacked cell lies outside the board
    #[error("Cell {0} is outside the board")]
    CellOutOfBounds(Cell),

    /// No session registered under the id
    #[error("Unknown session")]
    UnknownSession,
}

/// Reasons a candidate fleet is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("unknown squadron '{0}'")]
    UnknownSquadron(SquadronKey),

    #[error("squadron '{key}' needs {expected} ships, got {actual}")]
    ShipCount {
        key: SquadronKey,
        expected: usize,
        actual: usize,
    },

    #[error("squadron '{key}' ships are {expected} cells long, got {actual}")]
    ShipLength {
        key: SquadronKey,
        expected: usize,
        actual: usize,
    },

    #[error("ship in squadron '{0}' is not a straight contiguous run")]
    NotContiguous(SquadronKey),

    #[error("ship runs off the board")]
    OutOfBounds,

    #[error("ships overlap at {0}")]
    Overlap(Cell),

    #[error("ships touch at {0}")]
    Touching(Cell),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable present but not a positive integer
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidDimension { name: &'static str, value: String },
}

/// Message send errors
///
/// Occurs when a session's outbound channel is closed or full.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// The receiver is not keeping up and its queue is full
    #[error("Queue full")]
    QueueFull,
}
