//! Two-player Battleships WebSocket Server Library
//!
//! The authoritative server core of a turn-based naval combat game: it
//! validates each player's secret fleet placement, matches two ready
//! players, and resolves alternating attacks until one fleet is gone.
//!
//! # Features
//! - Server-side placement validation (counts, lengths, geometry, no-touching)
//! - Attack resolution with hit / sunk / obliterated detection
//! - Matchmaking with a random first turn
//! - Strict turn alternation
//! - Opponent-left notification on disconnect
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `GameServer` is the central actor owning all sessions and the matchmaking slot
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use battleships_server::{GameConfig, GameServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(GameServer::new(GameConfig::default(), cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod attack;
pub mod board;
pub mod config;
pub mod error;
pub mod fleet;
pub mod handler;
pub mod matchmaker;
pub mod message;
pub mod server;
pub mod session;
pub mod turn;
pub mod types;

// Re-export main types for convenience
pub use attack::AttackResult;
pub use board::{Axis, Board, Cell};
pub use config::GameConfig;
pub use error::{AppError, ConfigError, PlacementError, SendError};
pub use fleet::{validate_placement, CandidateFleet, Fleet, FleetTemplate, Ship, Squadron, SquadronSpec};
pub use handler::handle_connection;
pub use matchmaker::{Matchmaker, Pairing};
pub use message::{ClientMessage, ServerMessage};
pub use server::{GameServer, ServerCommand};
pub use session::Session;
pub use turn::{resolve_attack, AttackOutcome};
pub use types::{ClientId, SquadronKey};
