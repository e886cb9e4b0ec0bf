//! WebSocket protocol messages for the settlers server.

use serde::{Deserialize, Serialize};
use settlers_core::{BoardSnapshot, Command, GameError};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Create a new game and join it
    CreateGame,

    /// Join an existing game
    JoinGame { game_id: Uuid },

    /// Stop receiving updates for the current game
    LeaveGame,

    /// Request the current game state
    GetState,

    /// Apply a command to the current game
    Command { command: Command },

    /// Replace the current game with a fresh board
    ResetGame,

    /// Request game list
    ListGames,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with assigned client ID
    Welcome { client_id: Uuid },

    /// Game created successfully
    GameCreated { game_id: Uuid },

    /// Joined game successfully
    Joined { game_id: Uuid, state: BoardSnapshot },

    /// Left game successfully
    Left { game_id: Uuid },

    /// Game state updated
    State { state: BoardSnapshot },

    /// Dice were rolled in the current game
    DiceRolled { dice1: u8, dice2: u8, dice_sum: u8 },

    /// The engine refused a command
    CommandRejected { error: GameError },

    /// List of stored games
    GameList { games: Vec<GameInfo> },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

/// Game information for clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub id: Uuid,
    pub current_player: u8,
    /// Clients currently watching this game
    pub clients: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_command_parses() {
        let text = r#"{"type":"Command","payload":{"command":{"type":"build_city","vertex":8,"player":2}}}"#;
        let msg: ClientMessage = serde_json::from_str(text).unwrap();
        match msg {
            ClientMessage::Command { command } => assert_eq!(
                command,
                Command::BuildCity {
                    vertex: 8,
                    player: 2
                }
            ),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_unit_messages_need_no_payload() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"Ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));

        let text = serde_json::to_string(&ServerMessage::Pong).unwrap();
        assert_eq!(text, r#"{"type":"Pong"}"#);
    }

    #[test]
    fn test_rejection_carries_engine_error() {
        let msg = ServerMessage::CommandRejected {
            error: GameError::InvalidPlacement { from: 1, to: 3 },
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "CommandRejected");
        assert_eq!(value["payload"]["error"]["InvalidPlacement"]["to"], 3);
    }
}
