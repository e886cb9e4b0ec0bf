//! Flat, JSON-friendly view of a game for clients.
//!
//! The in-memory board is an id-indexed arena with typed fields; the snapshot
//! flattens it into lists and name-keyed maps that a browser can draw from
//! directly.

use crate::actions::ActionReport;
use crate::board::{Road, VertexId};
use crate::game::GameState;
use crate::rules;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dice number rendered for hexes without one
pub const NO_NUMBER: i32 = -1;

/// One hex as clients see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexSnapshot {
    pub id: u16,
    pub q: i32,
    pub r: i32,
    /// Lowercase tile name ("wood", ..., "desert")
    pub resource_type: String,
    /// Dice number, or -1 when the hex has none
    pub resource_number: i32,
    pub robber: bool,
}

/// One vertex as clients see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexSnapshot {
    pub q: i32,
    pub r: i32,
    pub unique_id: VertexId,
    pub owner_id: Option<String>,
    /// "settlement", "city", or null
    pub building: Option<String>,
}

/// Complete client-facing state of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub current_player: String,
    pub hexes: Vec<HexSnapshot>,
    pub vertex_cells: Vec<VertexSnapshot>,
    /// `(min vertex, max vertex, owner)` for each road, listed once
    pub roads: Vec<(VertexId, VertexId, String)>,
    pub bank: BTreeMap<String, u32>,
    pub players: BTreeMap<String, BTreeMap<String, u32>>,
    /// Action report per player, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_actions: Option<BTreeMap<String, ActionReport>>,
}

impl BoardSnapshot {
    /// Capture the current state of `game`
    pub fn capture(game: &GameState, with_actions: bool) -> Self {
        let board = &game.board;

        let hexes = board
            .hexes()
            .map(|hex| HexSnapshot {
                id: hex.id,
                q: hex.coord.q,
                r: hex.coord.r,
                resource_type: hex
                    .tile_type
                    .map(|t| t.name().to_string())
                    .unwrap_or_default(),
                resource_number: hex.dice_number.map_or(NO_NUMBER, i32::from),
                robber: hex.has_robber,
            })
            .collect();

        let vertex_cells = board
            .vertices()
            .map(|vertex| VertexSnapshot {
                q: vertex.coord.q,
                r: vertex.coord.r,
                unique_id: vertex.id,
                owner_id: vertex.building.owner().map(|p| p.to_string()),
                building: vertex.building.name().map(str::to_string),
            })
            .collect();

        let roads = board
            .roads()
            .into_iter()
            .map(|Road { from, to, owner }| (from, to, owner.to_string()))
            .collect();

        let players = game
            .players
            .iter()
            .map(|p| (p.id.to_string(), p.resources.to_named_map()))
            .collect();

        let next_actions = with_actions.then(|| {
            game.players
                .iter()
                .map(|p| (p.id.to_string(), rules::action_report(board, p)))
                .collect()
        });

        Self {
            current_player: game.current_player.to_string(),
            hexes,
            vertex_cells,
            roads,
            bank: game.bank.to_named_map(),
            players,
            next_actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game() -> GameState {
        GameState::with_rng(&mut StdRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn test_snapshot_shape() {
        let snapshot = BoardSnapshot::capture(&game(), false);
        assert_eq!(snapshot.current_player, "1");
        assert_eq!(snapshot.hexes.len(), 19);
        assert_eq!(snapshot.vertex_cells.len(), 54);
        assert!(snapshot.roads.is_empty());
        assert_eq!(snapshot.bank["wheat"], 19);
        assert_eq!(
            snapshot.players.keys().cloned().collect::<Vec<_>>(),
            vec!["1", "2", "3", "4"]
        );
        assert!(snapshot.next_actions.is_none());
    }

    #[test]
    fn test_desert_renders_sentinel_number() {
        let snapshot = BoardSnapshot::capture(&game(), false);
        let desert: Vec<_> = snapshot
            .hexes
            .iter()
            .filter(|h| h.resource_type == "desert")
            .collect();
        assert_eq!(desert.len(), 1);
        assert_eq!(desert[0].resource_number, NO_NUMBER);
        assert!(desert[0].robber);
    }

    #[test]
    fn test_buildings_and_roads_render_as_names() {
        let mut game = game();
        game.board.place_settlement(8, 2);
        game.board.upgrade_to_city(8, 2);
        game.board.place_road(8, 3, 2);

        let snapshot = BoardSnapshot::capture(&game, true);
        let vertex = &snapshot.vertex_cells[8];
        assert_eq!(vertex.owner_id.as_deref(), Some("2"));
        assert_eq!(vertex.building.as_deref(), Some("city"));
        assert_eq!(snapshot.roads, vec![(3, 8, "2".to_string())]);

        let actions = snapshot.next_actions.unwrap();
        assert_eq!(actions.len(), 4);
        assert!(actions["1"].is_empty());
    }

    #[test]
    fn test_unowned_vertex_serializes_nulls() {
        let snapshot = BoardSnapshot::capture(&game(), false);
        let json = serde_json::to_value(&snapshot.vertex_cells[0]).unwrap();
        assert_eq!(json["owner_id"], serde_json::Value::Null);
        assert_eq!(json["building"], serde_json::Value::Null);
    }
}
