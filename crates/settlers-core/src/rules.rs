//! Legal placement queries.
//!
//! Everything here is a pure function of the board (and, for the action
//! report, the player's hand). Nothing is cached; callers recompute on every
//! command so the answer always reflects the current board.

use crate::actions::ActionReport;
use crate::board::{edge_key, Board, PlayerId, VertexBuilding, VertexId};
use crate::player::Player;
use std::collections::{BTreeSet, VecDeque};

/// Settlements a player may have on the board at once
pub const MAX_SETTLEMENTS: usize = 5;

// ==================== Settlements ====================

/// Empty vertices that satisfy the distance rule, in id order
pub fn open_settlement_spots(board: &Board) -> Vec<VertexId> {
    board
        .vertices()
        .filter(|v| v.building.is_empty() && board.satisfies_distance_rule(v.id))
        .map(|v| v.id)
        .collect()
}

/// Get valid settlement spots for a player.
///
/// During setup any open spot qualifies; otherwise the spot must also be
/// reached by the player's road network.
pub fn valid_settlement_spots(board: &Board, player: PlayerId, is_setup: bool) -> Vec<VertexId> {
    let open = open_settlement_spots(board);
    if is_setup {
        return open;
    }
    let network = road_network(board, player);
    open.into_iter().filter(|v| network.contains(v)).collect()
}

// ==================== Cities ====================

/// Settlements the player may upgrade.
///
/// A player already holding [`MAX_SETTLEMENTS`] settlements is offered none.
pub fn valid_city_spots(board: &Board, player: PlayerId) -> Vec<VertexId> {
    if board.settlement_count(player) >= MAX_SETTLEMENTS {
        return Vec::new();
    }
    board
        .vertices()
        .filter(|v| v.building == VertexBuilding::Settlement(player))
        .map(|v| v.id)
        .collect()
}

// ==================== Roads ====================

/// Every vertex the player's road network reaches, including their buildings.
///
/// Breadth-first from the player's buildings, crossing only the player's own
/// roads and never entering a vertex built on by another player.
pub fn road_network(board: &Board, player: PlayerId) -> BTreeSet<VertexId> {
    let mut reached: BTreeSet<VertexId> = board.buildings_of(player).map(|v| v.id).collect();
    let mut queue: VecDeque<VertexId> = reached.iter().copied().collect();

    while let Some(current) = queue.pop_front() {
        let Some(vertex) = board.vertex(current) else {
            continue;
        };
        for &next in &vertex.neighbor_vertices {
            if reached.contains(&next) || vertex.road_to(next) != Some(player) {
                continue;
            }
            let blocked = board
                .get_building(next)
                .owner()
                .is_some_and(|owner| owner != player);
            if blocked {
                continue;
            }
            reached.insert(next);
            queue.push_back(next);
        }
    }

    reached
}

/// Road slots the player may build on, as sorted `(min, max)` pairs.
///
/// Any free edge touching the road network qualifies. Affordability is
/// checked by the caller.
pub fn valid_road_spots(board: &Board, player: PlayerId) -> Vec<(VertexId, VertexId)> {
    let mut spots = BTreeSet::new();
    for origin in road_network(board, player) {
        let Some(vertex) = board.vertex(origin) else {
            continue;
        };
        for &next in &vertex.neighbor_vertices {
            if vertex.road_to(next).is_none() {
                spots.insert(edge_key(origin, next));
            }
        }
    }
    spots.into_iter().collect()
}

// ==================== Action Report ====================

/// Everything the player can do right now, gated on resources and piece limits
pub fn action_report(board: &Board, player: &Player) -> ActionReport {
    let mut report = ActionReport::default();

    if player.can_afford_city() {
        report.city = Some(valid_city_spots(board, player.id));
    }
    if player.can_afford_settlement() && board.settlement_count(player.id) < MAX_SETTLEMENTS {
        report.settlement = Some(valid_settlement_spots(board, player.id, false));
    }
    if player.can_afford_road() {
        report.road = Some(valid_road_spots(board, player.id));
    }

    report
}

// ==================== Production Heuristic ====================

/// Dice probability weight of a number token (0 for desert/unset)
pub fn pip_value(dice_number: Option<u8>) -> u32 {
    match dice_number {
        Some(2 | 12) => 1,
        Some(3 | 11) => 2,
        Some(4 | 10) => 3,
        Some(5 | 9) => 4,
        Some(6 | 8) => 5,
        _ => 0,
    }
}

/// Sum of pip values of the hexes around a vertex
pub fn production_score(board: &Board, vertex: VertexId) -> u32 {
    board
        .hexes_at_vertex(vertex)
        .iter()
        .map(|h| pip_value(h.dice_number))
        .sum()
}

/// The open settlement spot with the highest production score.
///
/// Ties go to the lowest vertex id. `None` when no spot is open.
pub fn highest_production_spot(board: &Board) -> Option<VertexId> {
    let mut best: Option<(VertexId, u32)> = None;
    for spot in open_settlement_spots(board) {
        let score = production_score(board, spot);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((spot, score));
        }
    }
    best.map(|(spot, _)| spot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::ResourceHand;

    fn neighbors(board: &Board, id: VertexId) -> Vec<VertexId> {
        board.vertex(id).unwrap().neighbor_vertices.clone()
    }

    #[test]
    fn test_every_vertex_open_on_empty_board() {
        let board = Board::standard_topology();
        assert_eq!(open_settlement_spots(&board).len(), 54);
        assert_eq!(valid_settlement_spots(&board, 1, true).len(), 54);
        assert!(valid_settlement_spots(&board, 1, false).is_empty());
    }

    #[test]
    fn test_distance_rule_excludes_neighbors() {
        let mut board = Board::standard_topology();
        board.place_settlement(8, 1);
        let open = open_settlement_spots(&board);
        assert!(!open.contains(&8));
        for n in neighbors(&board, 8) {
            assert!(!open.contains(&n));
        }
    }

    #[test]
    fn test_settlement_needs_road_reach_outside_setup() {
        let mut board = Board::standard_topology();
        board.place_settlement(8, 1);
        let a = neighbors(&board, 8)[0];
        let b = *neighbors(&board, a).iter().find(|&&n| n != 8).unwrap();
        board.place_road(8, a, 1);
        // One road away is still too close
        assert!(valid_settlement_spots(&board, 1, false).is_empty());

        board.place_road(a, b, 1);
        assert_eq!(valid_settlement_spots(&board, 1, false), vec![b]);
        assert!(valid_settlement_spots(&board, 2, false).is_empty());
    }

    #[test]
    fn test_road_network_stops_at_opponent_building() {
        let mut board = Board::standard_topology();
        board.place_settlement(8, 1);
        let a = neighbors(&board, 8)[0];
        let b = *neighbors(&board, a).iter().find(|&&n| n != 8).unwrap();
        board.place_road(8, a, 1);
        board.place_road(a, b, 1);
        board.place_settlement(b, 2);

        let network = road_network(&board, 1);
        assert!(network.contains(&8));
        assert!(network.contains(&a));
        assert!(!network.contains(&b));
    }

    #[test]
    fn test_road_network_ignores_other_players_roads() {
        let mut board = Board::standard_topology();
        board.place_settlement(8, 1);
        let a = neighbors(&board, 8)[0];
        board.place_road(8, a, 2);
        let network = road_network(&board, 1);
        assert_eq!(network.into_iter().collect::<Vec<_>>(), vec![8]);
    }

    #[test]
    fn test_valid_roads_from_lone_settlement() {
        let mut board = Board::standard_topology();
        board.place_settlement(8, 3);
        let expected: Vec<_> = neighbors(&board, 8).iter().map(|&n| edge_key(8, n)).collect();
        assert_eq!(valid_road_spots(&board, 3), expected);

        let taken = neighbors(&board, 8)[0];
        board.place_road(8, taken, 3);
        let spots = valid_road_spots(&board, 3);
        assert!(!spots.contains(&edge_key(8, taken)));
        assert!(spots.iter().all(|(a, b)| a < b));
    }

    #[test]
    fn test_city_spots_and_piece_cap() {
        let mut board = Board::standard_topology();
        let spots = [0, 5, 14, 30, 45];
        for &spot in &spots[..4] {
            board.place_settlement(spot, 1);
        }
        assert_eq!(valid_city_spots(&board, 1), spots[..4].to_vec());

        board.place_settlement(spots[4], 1);
        assert!(valid_city_spots(&board, 1).is_empty());
    }

    #[test]
    fn test_pip_values() {
        assert_eq!(pip_value(Some(2)), 1);
        assert_eq!(pip_value(Some(12)), 1);
        assert_eq!(pip_value(Some(6)), 5);
        assert_eq!(pip_value(Some(9)), 4);
        assert_eq!(pip_value(None), 0);
    }

    #[test]
    fn test_highest_production_prefers_rich_corner() {
        let mut board = Board::standard_topology();
        let target = 9;
        let touching = board.vertex(target).unwrap().neighbor_hexes.clone();
        assert_eq!(touching.len(), 3);
        for hex in touching {
            board.hex_mut(hex).unwrap().dice_number = Some(6);
        }
        assert_eq!(highest_production_spot(&board), Some(target));

        // An empty board scores zero everywhere, so the first open vertex wins
        let blank = Board::standard_topology();
        assert_eq!(highest_production_spot(&blank), Some(0));
    }

    #[test]
    fn test_report_gates_on_resources() {
        let mut board = Board::standard_topology();
        board.place_settlement(8, 1);
        let mut player = Player::new(1);

        assert_eq!(action_report(&board, &player), ActionReport::default());

        player.resources = ResourceHand::with_amounts(1, 1, 0, 0, 0);
        let report = action_report(&board, &player);
        assert!(report.city.is_none());
        assert!(report.settlement.is_none());
        assert_eq!(report.road.map(|r| r.len()), Some(neighbors(&board, 8).len()));

        player.resources = ResourceHand::with_amounts(0, 0, 5, 0, 3);
        let report = action_report(&board, &player);
        assert_eq!(report.city, Some(vec![8]));
        assert!(report.road.is_none());
    }
}
