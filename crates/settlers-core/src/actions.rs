//! Commands players can issue and the reports describing what is legal.
//!
//! This module defines the serializable command surface of the game and the
//! per-player action report that the snapshot exposes as "next actions".

use crate::board::{PlayerId, VertexId};
use crate::snapshot::BoardSnapshot;
use serde::{Deserialize, Serialize};

/// All commands that mutate a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // ==================== Turn Actions ====================
    /// Roll both dice and pay out production
    RollDice,

    // ==================== Building Actions ====================
    /// Build a settlement at a vertex
    PlaceSettlement { vertex: VertexId, player: PlayerId },
    /// Build a road between two adjacent vertices
    PlaceRoad {
        from: VertexId,
        to: VertexId,
        player: PlayerId,
    },
    /// Upgrade a settlement to a city
    BuildCity { vertex: VertexId, player: PlayerId },

    // ==================== Turn Management ====================
    /// Pass play to the next player
    EndTurn,
    /// Hand play back to the previous player
    PreviousTurn,
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Die faces, present only for [`Command::RollDice`]
    pub dice: Option<(u8, u8)>,
    /// Board state after the command
    pub snapshot: BoardSnapshot,
}

impl CommandOutcome {
    /// Sum of both dice, if dice were rolled
    pub fn dice_sum(&self) -> Option<u8> {
        self.dice.map(|(a, b)| a + b)
    }
}

/// Legal targets for one player, keyed by action kind.
///
/// A kind is present only when the player can pay for it and is within the
/// piece limits; its list may still be empty when the board offers no spot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    /// Settlements that may become cities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<Vec<VertexId>>,
    /// Vertices a settlement may be built on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement: Option<Vec<VertexId>>,
    /// Road slots as `(min, max)` vertex pairs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road: Option<Vec<(VertexId, VertexId)>>,
}

impl ActionReport {
    /// Whether nothing at all is on offer
    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.settlement.is_none() && self.road.is_none()
    }

    /// Whether `vertex` is offered as a city upgrade
    pub fn allows_city(&self, vertex: VertexId) -> bool {
        self.city.as_ref().is_some_and(|spots| spots.contains(&vertex))
    }

    /// Whether `vertex` is offered as a settlement spot
    pub fn allows_settlement(&self, vertex: VertexId) -> bool {
        self.settlement
            .as_ref()
            .is_some_and(|spots| spots.contains(&vertex))
    }

    /// Whether the normalised edge is offered as a road slot
    pub fn allows_road(&self, edge: (VertexId, VertexId)) -> bool {
        self.road.as_ref().is_some_and(|spots| spots.contains(&edge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_format() {
        let json = serde_json::to_value(Command::PlaceRoad {
            from: 3,
            to: 8,
            player: 2,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "place_road", "from": 3, "to": 8, "player": 2})
        );

        let parsed: Command = serde_json::from_str(r#"{"type":"roll_dice"}"#).unwrap();
        assert_eq!(parsed, Command::RollDice);
    }

    #[test]
    fn test_empty_report_serializes_to_empty_object() {
        let report = ActionReport::default();
        assert!(report.is_empty());
        assert_eq!(serde_json::to_string(&report).unwrap(), "{}");
    }

    #[test]
    fn test_report_lookups() {
        let report = ActionReport {
            city: Some(vec![4]),
            settlement: None,
            road: Some(vec![(1, 3)]),
        };
        assert!(report.allows_city(4));
        assert!(!report.allows_settlement(4));
        assert!(report.allows_road((1, 3)));
        assert!(!report.allows_road((3, 1)));
    }
}
