//! Basic type definitions for the game server
//!
//! Provides:
//! - `ClientId`: UUID-based unique session identifier
//! - `SquadronKey`: the key a squadron is stored under in a fleet

use uuid::Uuid;

/// Unique session identifier (newtype pattern)
///
/// Wraps a UUID v4. Sessions refer to their opponent by this id rather
/// than by reference, so tearing one down never dangles the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub Uuid);

impl ClientId {
    /// Create a new random client ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Squadron key, e.g. `"destroyer"` or `"3-block-ship"`
pub type SquadronKey = String;
