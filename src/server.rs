//! GameServer Actor implementation
//!
//! The central actor that owns all game state: the session table and the
//! matchmaking slot. Commands are processed one at a time to completion,
//! so placement, pairing and attacks never interleave.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::board::Cell;
use crate::config::GameConfig;
use crate::error::{AppError, SendError};
use crate::fleet::{validate_placement, CandidateFleet, Fleet};
use crate::matchmaker::{Matchmaker, Pairing};
use crate::message::ServerMessage;
use crate::session::Session;
use crate::turn::{self, AttackOutcome};
use crate::types::ClientId;

/// Commands sent from handlers to the GameServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New player connected
    Connect {
        client_id: ClientId,
        sender: mpsc::Sender<ServerMessage>,
    },
    /// Player disconnected
    Disconnect {
        client_id: ClientId,
    },
    /// Fleet placement submitted
    SubmitShips {
        client_id: ClientId,
        ships: CandidateFleet,
    },
    /// Attack on the opponent's board
    AttackCell {
        client_id: ClientId,
        cell: Cell,
    },
}

/// The main GameServer actor
pub struct GameServer {
    /// Board and squadron template
    config: GameConfig,
    /// All connected sessions: ClientId -> Session
    sessions: HashMap<ClientId, Session>,
    /// The waiting-player slot
    matchmaker: Matchmaker,
    /// First-turn coin
    rng: StdRng,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl GameServer {
    /// Create a new GameServer with the given command receiver
    pub fn new(config: GameConfig, receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self::with_rng(config, receiver, StdRng::from_entropy())
    }

    /// Create a GameServer with a specific random source for turn selection
    pub fn with_rng(
        config: GameConfig,
        receiver: mpsc::Receiver<ServerCommand>,
        rng: StdRng,
    ) -> Self {
        Self {
            config,
            sessions: HashMap::new(),
            matchmaker: Matchmaker::new(),
            rng,
            receiver,
        }
    }

    /// Run the GameServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("GameServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("GameServer shutting down");
    }

    /// Process a single command
    ///
    /// Game errors are local: a rejected placement is answered, anything
    /// else is logged and dropped without changing state.
    fn handle_command(&mut self, cmd: ServerCommand) {
        let (client_id, result) = match cmd {
            ServerCommand::Connect { client_id, sender } => {
                self.handle_connect(client_id, sender);
                return;
            }
            ServerCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id);
                return;
            }
            ServerCommand::SubmitShips { client_id, ships } => {
                (client_id, self.handle_submit_ships(client_id, ships))
            }
            ServerCommand::AttackCell { client_id, cell } => {
                (client_id, self.handle_attack(client_id, cell))
            }
        };

        match result {
            Ok(()) => {}
            Err(AppError::InvalidPlacement(reason)) => {
                info!("Rejected placement from {}: {}", client_id, reason);
                self.send(client_id, ServerMessage::ReadyAccepted { ready_accepted: false });
            }
            Err(e) => {
                warn!("Dropped command from {}: {}", client_id, e);
            }
        }
    }

    /// Handle new connection: register the session and send the setup
    fn handle_connect(&mut self, client_id: ClientId, sender: mpsc::Sender<ServerMessage>) {
        debug!("Registering session {}", client_id);
        let session = Session::new(client_id, sender, Fleet::empty(&self.config.template));
        self.sessions.insert(client_id, session);

        let setup = ServerMessage::Setup {
            ships: (*self.config.template).clone(),
            width: self.config.board.width,
            height: self.config.board.height,
        };
        self.send(client_id, setup);
        debug!("Total sessions: {}", self.sessions.len());
    }

    /// Handle disconnection: free the waiting slot or unlink the opponent
    fn handle_disconnect(&mut self, client_id: ClientId) {
        info!("Client {} disconnected", client_id);

        let Some(session) = self.sessions.remove(&client_id) else {
            return;
        };
        if self.matchmaker.withdraw(client_id) {
            debug!("Cleared waiting slot held by {}", client_id);
        }

        if let Some(opponent_id) = session.opponent {
            if let Some(opponent) = self.sessions.get_mut(&opponent_id) {
                if opponent.opponent == Some(client_id) {
                    opponent.unlink();
                    info!("Match between {} and {} ended by disconnect", client_id, opponent_id);
                    self.send(opponent_id, ServerMessage::OpponentLeft { opponent_left: true });
                }
            }
        }

        debug!("Total sessions: {}", self.sessions.len());
    }

    /// Handle a placement submission
    ///
    /// The fleet is validated in full before it replaces the session's
    /// current one; a rejection leaves the session untouched.
    fn handle_submit_ships(
        &mut self,
        client_id: ClientId,
        ships: CandidateFleet,
    ) -> Result<(), AppError> {
        let session = self
            .sessions
            .get(&client_id)
            .ok_or(AppError::UnknownSession)?;
        self.matchmaker.check_eligible(session)?;

        let fleet = validate_placement(&self.config.template, ships, &self.config.board)?;
        if let Some(session) = self.sessions.get_mut(&client_id) {
            session.commit_fleet(fleet);
        }
        debug!("Accepted placement from {}", client_id);
        self.send(client_id, ServerMessage::ReadyAccepted { ready_accepted: true });

        let pairing = self
            .matchmaker
            .submit_ready(&mut self.sessions, client_id, &mut self.rng)?;
        if let Pairing::Paired { first, second } = pairing {
            self.send(first, ServerMessage::YourTurn { your_turn: true });
            self.send(second, ServerMessage::YourTurn { your_turn: false });
        }
        Ok(())
    }

    /// Handle an attack from the player holding the turn
    fn handle_attack(&mut self, client_id: ClientId, cell: Cell) -> Result<(), AppError> {
        let outcome = turn::resolve_attack(&mut self.sessions, &self.config.board, client_id, cell)?;
        debug!(
            "{} attacked {} at {}: {:?}",
            outcome.attacker, outcome.defender, outcome.cell, outcome.result
        );
        self.report_attack(outcome);
        Ok(())
    }

    /// Send the attack outcome to both players, then the new turn state
    fn report_attack(&self, outcome: AttackOutcome) {
        let AttackOutcome {
            attacker,
            defender,
            cell,
            result,
        } = outcome;
        let match_over = result.obliterated;

        self.send(
            attacker,
            ServerMessage::HitOpponentStatus {
                hit_opponent_status: result.clone(),
            },
        );
        self.send(
            defender,
            ServerMessage::HitSelfStatus {
                hit_self_status: result,
                cell,
            },
        );

        if !match_over {
            self.send(attacker, ServerMessage::YourTurn { your_turn: false });
            self.send(defender, ServerMessage::YourTurn { your_turn: true });
        }
    }

    /// Helper: fire-and-forget send to a session
    ///
    /// Never waits on the player: a full or closed queue drops the message.
    fn send(&self, client_id: ClientId, msg: ServerMessage) {
        if let Some(session) = self.sessions.get(&client_id) {
            match session.send(msg) {
                Ok(()) => {}
                Err(SendError::QueueFull) => {
                    warn!("Outbound queue of {} full, message dropped", client_id);
                }
                Err(SendError::ChannelClosed) => {
                    debug!("Send to {} failed, channel closed", client_id);
                }
            }
        }
    }
}
