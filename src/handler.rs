//! WebSocket connection handler
//!
//! Handles individual player connections: WebSocket handshake, frame
//! decoding, and bidirectional communication with the GameServer.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::message::{ClientMessage, ServerMessage};
use crate::server::ServerCommand;
use crate::types::ClientId;

/// Outbound queue depth per player
const OUTBOUND_BUFFER_SIZE: usize = 32;

/// Handle a new TCP connection
///
/// Performs WebSocket handshake, registers a session with the GameServer,
/// and pumps frames in both directions until either side closes.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let client_id = ClientId::new();
    info!("Client {} connected from {}", client_id, peer_addr);

    // Server -> client channel; the server sends the setup frame first
    let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(OUTBOUND_BUFFER_SIZE);

    if cmd_tx
        .send(ServerCommand::Connect {
            client_id,
            sender: msg_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register client {} - server closed", client_id);
        return Err(AppError::ChannelSend);
    }

    let cmd_tx_read = cmd_tx.clone();

    // Read task (WebSocket -> ServerCommand)
    let mut read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => match ClientMessage::parse(&text) {
                    Ok(client_msg) => {
                        let cmd = client_message_to_command(client_id, client_msg);
                        if cmd_tx_read.send(cmd).await.is_err() {
                            debug!("Server closed, ending read task for {}", client_id);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Dropped frame from {}: {}", client_id, e);
                    }
                },
                Ok(Message::Close(_)) => {
                    debug!("Client {} sent close frame", client_id);
                    break;
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Pong replies are handled by tungstenite
                }
                Ok(_) => {
                    debug!("Ignoring non-text frame from {}", client_id);
                }
                Err(e) => {
                    error!("WebSocket error for {}: {}", client_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", client_id);
    });

    // Write task (ServerMessage -> WebSocket)
    let mut write_task = tokio::spawn(async move {
        while let Some(msg) = msg_rx.recv().await {
            match msg.to_json() {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, ending write task");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize message: {}", e);
                }
            }
        }
        debug!("Write task ended for {}", client_id);

        let _ = ws_sender.close().await;
    });

    // Whichever side finishes first ends the connection; stop the other
    tokio::select! {
        _ = &mut read_task => {
            debug!("Read task completed for {}", client_id);
            write_task.abort();
        }
        _ = &mut write_task => {
            debug!("Write task completed for {}", client_id);
            read_task.abort();
        }
    }

    let _ = cmd_tx.send(ServerCommand::Disconnect { client_id }).await;

    debug!("Connection to {} closed", client_id);

    Ok(())
}

/// Convert a ClientMessage to a ServerCommand
fn client_message_to_command(client_id: ClientId, msg: ClientMessage) -> ServerCommand {
    match msg {
        ClientMessage::Ships(ships) => ServerCommand::SubmitShips { client_id, ships },
        ClientMessage::CellAttacked(cell) => ServerCommand::AttackCell { client_id, cell },
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::net::TcpListener;

    use super::*;
    use crate::board::Cell;

    #[test]
    fn test_client_message_to_command() {
        let id = ClientId::new();
        let msg = ClientMessage::parse(r#"{"cellAttacked": {"row": 4, "column": 1}}"#).unwrap();
        match client_message_to_command(id, msg) {
            ServerCommand::AttackCell { client_id, cell } => {
                assert_eq!(client_id, id);
                assert_eq!(cell, Cell::new(4, 1));
            }
            other => panic!("Wrong command: {:?}", other),
        }

        let msg = ClientMessage::parse(r#"{"ships": {}}"#).unwrap();
        assert!(matches!(
            client_message_to_command(id, msg),
            ServerCommand::SubmitShips { ships, .. } if ships.is_empty()
        ));
    }

    #[tokio::test]
    async fn test_client_close_stops_both_tasks() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (cmd_tx, mut cmd_rx) = mpsc::channel(8);

        let conn = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            handle_connection(stream, cmd_tx).await
        });

        let (mut client, _) = tokio_tungstenite::connect_async(format!("ws://{}", addr))
            .await
            .unwrap();

        // Hold on to the outbound sender like the server would
        let (id, sender) = match cmd_rx.recv().await.unwrap() {
            ServerCommand::Connect { client_id, sender } => (client_id, sender),
            other => panic!("Expected Connect, got {:?}", other),
        };

        client.close(None).await.unwrap();

        let result = tokio::time::timeout(Duration::from_secs(2), conn)
            .await
            .expect("handler did not return after close")
            .unwrap();
        assert!(result.is_ok());

        match cmd_rx.recv().await.unwrap() {
            ServerCommand::Disconnect { client_id } => assert_eq!(client_id, id),
            other => panic!("Expected Disconnect, got {:?}", other),
        }

        // The write task is gone, so its receiver is dropped
        tokio::time::timeout(Duration::from_secs(2), sender.closed())
            .await
            .expect("write task still running after the read side ended");
    }
}
