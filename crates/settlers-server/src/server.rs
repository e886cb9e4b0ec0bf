//! WebSocket server and connection handling.

use crate::protocol::{ClientMessage, GameInfo, ServerMessage};
use crate::session::{GameSessions, SessionError};
use crate::store::GameStore;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    /// Stored games and their locks
    pub sessions: GameSessions,
    /// Mapping from client ID to the game it watches
    pub client_games: DashMap<Uuid, Uuid>,
    /// Mapping from client ID to their message sender
    pub client_senders: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
}

impl ServerState {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self {
            sessions: GameSessions::new(store),
            client_games: DashMap::new(),
            client_senders: DashMap::new(),
        }
    }

    /// Send a message to a specific client.
    pub fn send_to_client(&self, client_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.client_senders.get(&client_id) {
            let _ = sender.send(msg);
        }
    }

    /// Clients currently watching a game.
    pub fn clients_in_game(&self, game_id: Uuid) -> Vec<Uuid> {
        self.client_games
            .iter()
            .filter(|entry| *entry.value() == game_id)
            .map(|entry| *entry.key())
            .collect()
    }

    /// Broadcast a message to every client watching a game.
    pub fn broadcast_to_game(&self, game_id: Uuid, msg: ServerMessage) {
        for client_id in self.clients_in_game(game_id) {
            self.send_to_client(client_id, msg.clone());
        }
    }

    /// Summaries of all stored games.
    pub fn game_list(&self) -> Result<Vec<GameInfo>, SessionError> {
        let mut games = Vec::new();
        for id in self.sessions.ids()? {
            games.push(GameInfo {
                id,
                current_player: self.sessions.current_player(id)?,
                clients: self.clients_in_game(id).len(),
            });
        }
        Ok(games)
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Settlers server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let client_id = Uuid::new_v4();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.client_senders.insert(client_id, tx);

    let welcome = ServerMessage::Welcome { client_id };
    ws_sender
        .send(Message::Text(serde_json::to_string(&welcome)?))
        .await?;

    // Forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(client_id, client_msg, &state),
                Err(e) => {
                    warn!("Invalid message from {}: {}", client_id, e);
                    state.send_to_client(
                        client_id,
                        ServerMessage::Error {
                            message: format!("Invalid message: {e}"),
                        },
                    );
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", client_id);
                break;
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", client_id, e);
                break;
            }
            _ => {}
        }
    }

    // Games outlive their clients; only the subscription goes
    state.client_games.remove(&client_id);
    state.client_senders.remove(&client_id);
    send_task.abort();

    info!("Connection closed for {}", client_id);
    Ok(())
}

fn send_error(state: &ServerState, client_id: Uuid, err: SessionError) {
    let msg = match err {
        SessionError::Rejected(error) => ServerMessage::CommandRejected { error },
        other => ServerMessage::Error {
            message: other.to_string(),
        },
    };
    state.send_to_client(client_id, msg);
}

fn join(state: &ServerState, client_id: Uuid, game_id: Uuid) -> Result<(), SessionError> {
    let snapshot = state.sessions.state(game_id)?;
    state.client_games.insert(client_id, game_id);
    state.send_to_client(
        client_id,
        ServerMessage::Joined {
            game_id,
            state: snapshot,
        },
    );
    Ok(())
}

/// Handle a client message.
pub fn handle_message(client_id: Uuid, msg: ClientMessage, state: &ServerState) {
    if let Err(err) = dispatch(client_id, msg, state) {
        warn!("Request from {} failed: {}", client_id, err);
        send_error(state, client_id, err);
    }
}

fn dispatch(client_id: Uuid, msg: ClientMessage, state: &ServerState) -> Result<(), SessionError> {
    let current_game = state.client_games.get(&client_id).map(|g| *g);

    match msg {
        ClientMessage::CreateGame => {
            let game_id = state.sessions.create()?;
            state.send_to_client(client_id, ServerMessage::GameCreated { game_id });
            join(state, client_id, game_id)?;
        }

        ClientMessage::JoinGame { game_id } => join(state, client_id, game_id)?,

        ClientMessage::LeaveGame => {
            if let Some((_, game_id)) = state.client_games.remove(&client_id) {
                state.send_to_client(client_id, ServerMessage::Left { game_id });
            }
        }

        ClientMessage::Ping => state.send_to_client(client_id, ServerMessage::Pong),

        ClientMessage::ListGames => {
            let games = state.game_list()?;
            state.send_to_client(client_id, ServerMessage::GameList { games });
        }

        ClientMessage::GetState | ClientMessage::Command { .. } | ClientMessage::ResetGame => {
            let Some(game_id) = current_game else {
                state.send_to_client(
                    client_id,
                    ServerMessage::Error {
                        message: "Not in a game".to_string(),
                    },
                );
                return Ok(());
            };

            match msg {
                ClientMessage::GetState => {
                    let snapshot = state.sessions.state(game_id)?;
                    state.send_to_client(client_id, ServerMessage::State { state: snapshot });
                }
                ClientMessage::Command { command } => {
                    let outcome = state.sessions.apply(game_id, command)?;
                    if let Some((dice1, dice2)) = outcome.dice {
                        state.broadcast_to_game(
                            game_id,
                            ServerMessage::DiceRolled {
                                dice1,
                                dice2,
                                dice_sum: dice1 + dice2,
                            },
                        );
                    }
                    state.broadcast_to_game(
                        game_id,
                        ServerMessage::State {
                            state: outcome.snapshot,
                        },
                    );
                }
                ClientMessage::ResetGame => {
                    let snapshot = state.sessions.reset(game_id)?;
                    state.broadcast_to_game(game_id, ServerMessage::State { state: snapshot });
                }
                _ => {}
            }
        }
    }

    Ok(())
}
