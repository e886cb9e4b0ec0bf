//! Game board representation: hex cells, vertex cells, buildings and roads.
//!
//! This module contains:
//! - Resource and tile types
//! - Building types (settlements, cities)
//! - The id-indexed cell arena that makes up the board graph
//! - Board query and mutation methods
//!
//! Cells refer to each other only by id. Neighbour lists are computed once by
//! [`HexGridGenerator`](crate::grid::HexGridGenerator) and never change; only
//! tile attributes, buildings and roads are mutated afterwards.

use crate::grid::HexGridGenerator;
use crate::hex::HexCoord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Player identifier (1-4 for a 4-player game)
pub type PlayerId = u8;

/// Identifier of a vertex cell
pub type VertexId = u16;

/// Identifier of a hex cell
pub type HexId = u16;

/// Resource types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Wood,
    Brick,
    Wheat,
    Sheep,
    Ore,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Wood,
        Resource::Brick,
        Resource::Wheat,
        Resource::Sheep,
        Resource::Ore,
    ];

    /// Lowercase name used in snapshots
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Wood => "wood",
            Resource::Brick => "brick",
            Resource::Wheat => "wheat",
            Resource::Sheep => "sheep",
            Resource::Ore => "ore",
        }
    }
}

/// Type of hex tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileType {
    /// Produces a resource when its number is rolled
    Resource(Resource),
    /// Desert - no production, starts with the robber
    Desert,
}

impl TileType {
    /// Lowercase name used in snapshots
    pub fn name(&self) -> &'static str {
        match self {
            TileType::Resource(resource) => resource.name(),
            TileType::Desert => "desert",
        }
    }

    /// The resource this tile produces, if any
    pub fn resource(&self) -> Option<Resource> {
        match self {
            TileType::Resource(resource) => Some(*resource),
            TileType::Desert => None,
        }
    }
}

/// A single hex tile on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexCell {
    pub id: HexId,
    /// Position on the lattice
    pub coord: HexCoord,
    /// What the tile is; `None` until resources are assigned
    pub tile_type: Option<TileType>,
    /// Dice number that triggers production (2-12, None for desert/unset)
    pub dice_number: Option<u8>,
    /// Whether the robber is on this tile
    pub has_robber: bool,
    /// Hexes sharing at least one vertex with this one, sorted
    pub neighbor_hexes: Vec<HexId>,
    /// The six corners of this hex, sorted
    pub neighbor_vertices: Vec<VertexId>,
}

impl HexCell {
    /// Create a blank hex with no tile attributes
    pub fn new(id: HexId, coord: HexCoord) -> Self {
        Self {
            id,
            coord,
            tile_type: None,
            dice_number: None,
            has_robber: false,
            neighbor_hexes: Vec::new(),
            neighbor_vertices: Vec::new(),
        }
    }

    /// Get the resource this tile produces, if any
    pub fn resource(&self) -> Option<Resource> {
        self.tile_type.and_then(|t| t.resource())
    }

    /// The resource produced when `roll` comes up, if this tile pays out
    pub fn produces_on(&self, roll: u8) -> Option<Resource> {
        if self.has_robber || self.dice_number != Some(roll) {
            return None;
        }
        self.resource()
    }
}

/// What's built on a vertex (corner)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VertexBuilding {
    /// Nothing built
    #[default]
    Empty,
    /// Settlement (1 resource per adjacent tile)
    Settlement(PlayerId),
    /// City (2 resources per adjacent tile)
    City(PlayerId),
}

impl VertexBuilding {
    /// Get the owner of this building, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            VertexBuilding::Empty => None,
            VertexBuilding::Settlement(p) | VertexBuilding::City(p) => Some(*p),
        }
    }

    /// Resource multiplier (how many resources per production)
    pub fn resource_multiplier(&self) -> u32 {
        match self {
            VertexBuilding::Empty => 0,
            VertexBuilding::Settlement(_) => 1,
            VertexBuilding::City(_) => 2,
        }
    }

    /// Building name used in snapshots
    pub fn name(&self) -> Option<&'static str> {
        match self {
            VertexBuilding::Empty => None,
            VertexBuilding::Settlement(_) => Some("settlement"),
            VertexBuilding::City(_) => Some("city"),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, VertexBuilding::Empty)
    }
}

/// A corner of one or more hexes, where buildings go and roads meet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexCell {
    pub id: VertexId,
    /// Position on the lattice
    pub coord: HexCoord,
    /// Building and its owner
    pub building: VertexBuilding,
    /// Vertices one edge away, sorted
    pub neighbor_vertices: Vec<VertexId>,
    /// Hexes touching this corner, sorted
    pub neighbor_hexes: Vec<HexId>,
    /// Roads incident to this vertex: other endpoint -> owner.
    /// Every road is recorded on both of its endpoints.
    pub roads: BTreeMap<VertexId, PlayerId>,
}

impl VertexCell {
    /// Create an empty vertex
    pub fn new(id: VertexId, coord: HexCoord) -> Self {
        Self {
            id,
            coord,
            building: VertexBuilding::Empty,
            neighbor_vertices: Vec::new(),
            neighbor_hexes: Vec::new(),
            roads: BTreeMap::new(),
        }
    }

    /// Owner of the road towards `other`, if one exists
    pub fn road_to(&self, other: VertexId) -> Option<PlayerId> {
        self.roads.get(&other).copied()
    }
}

/// A road between two vertices, normalised so that `from < to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Road {
    pub from: VertexId,
    pub to: VertexId,
    pub owner: PlayerId,
}

/// Normalise an unordered vertex pair to `(min, max)`
pub fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    (a.min(b), a.max(b))
}

/// The board graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// All hexes indexed by id
    hexes: BTreeMap<HexId, HexCell>,
    /// All vertices indexed by id
    vertices: BTreeMap<VertexId, VertexCell>,
}

impl Board {
    /// Assemble a board from generated cells
    pub fn from_cells(hexes: Vec<HexCell>, vertices: Vec<VertexCell>) -> Self {
        Self {
            hexes: hexes.into_iter().map(|h| (h.id, h)).collect(),
            vertices: vertices.into_iter().map(|v| (v.id, v)).collect(),
        }
    }

    /// The standard 19-hex topology with no tile attributes assigned
    pub fn standard_topology() -> Self {
        HexGridGenerator::standard().generate()
    }

    // ==================== Query Methods ====================

    /// Get a hex by id
    pub fn hex(&self, id: HexId) -> Option<&HexCell> {
        self.hexes.get(&id)
    }

    pub(crate) fn hex_mut(&mut self, id: HexId) -> Option<&mut HexCell> {
        self.hexes.get_mut(&id)
    }

    /// Get a vertex by id
    pub fn vertex(&self, id: VertexId) -> Option<&VertexCell> {
        self.vertices.get(&id)
    }

    /// All hexes in id order
    pub fn hexes(&self) -> impl Iterator<Item = &HexCell> {
        self.hexes.values()
    }

    pub(crate) fn hexes_mut(&mut self) -> impl Iterator<Item = &mut HexCell> {
        self.hexes.values_mut()
    }

    /// All vertices in id order
    pub fn vertices(&self) -> impl Iterator<Item = &VertexCell> {
        self.vertices.values()
    }

    pub fn hex_count(&self) -> usize {
        self.hexes.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of vertex-to-vertex edges (road slots)
    pub fn edge_count(&self) -> usize {
        self.vertices
            .values()
            .map(|v| v.neighbor_vertices.len())
            .sum::<usize>()
            / 2
    }

    /// Get building at a vertex (`Empty` for unknown ids)
    pub fn get_building(&self, id: VertexId) -> VertexBuilding {
        self.vertices
            .get(&id)
            .map(|v| v.building)
            .unwrap_or_default()
    }

    /// Owner of the road between two vertices, if any
    pub fn road_between(&self, a: VertexId, b: VertexId) -> Option<PlayerId> {
        self.vertices.get(&a).and_then(|v| v.road_to(b))
    }

    /// Whether `a` and `b` are one edge apart
    pub fn are_adjacent(&self, a: VertexId, b: VertexId) -> bool {
        self.vertices
            .get(&a)
            .is_some_and(|v| v.neighbor_vertices.binary_search(&b).is_ok())
    }

    /// Vertices where `player` has a settlement or city
    pub fn buildings_of(&self, player: PlayerId) -> impl Iterator<Item = &VertexCell> + '_ {
        self.vertices
            .values()
            .filter(move |v| v.building.owner() == Some(player))
    }

    /// Number of settlements (not cities) owned by `player`
    pub fn settlement_count(&self, player: PlayerId) -> usize {
        self.vertices
            .values()
            .filter(|v| v.building == VertexBuilding::Settlement(player))
            .count()
    }

    /// Tiles touching a vertex
    pub fn hexes_at_vertex(&self, id: VertexId) -> Vec<&HexCell> {
        self.vertices
            .get(&id)
            .map(|v| {
                v.neighbor_hexes
                    .iter()
                    .filter_map(|h| self.hexes.get(h))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All roads, each listed once with `from < to`
    pub fn roads(&self) -> Vec<Road> {
        self.vertices
            .values()
            .flat_map(|v| {
                v.roads
                    .iter()
                    .filter(move |(&other, _)| v.id < other)
                    .map(move |(&other, &owner)| Road {
                        from: v.id,
                        to: other,
                        owner,
                    })
            })
            .collect()
    }

    /// Whether every road is recorded identically on both endpoints
    pub fn roads_are_symmetric(&self) -> bool {
        self.vertices.values().all(|v| {
            v.roads
                .iter()
                .all(|(&other, &owner)| self.road_between(other, v.id) == Some(owner))
        })
    }

    // ==================== Validation Methods ====================

    /// Check if a vertex satisfies the distance rule (no adjacent buildings)
    pub fn satisfies_distance_rule(&self, id: VertexId) -> bool {
        match self.vertices.get(&id) {
            Some(vertex) => vertex
                .neighbor_vertices
                .iter()
                .all(|n| self.get_building(*n).is_empty()),
            None => false,
        }
    }

    // ==================== Mutation Methods ====================

    /// Place a settlement (assumes validation already done)
    pub fn place_settlement(&mut self, id: VertexId, player: PlayerId) {
        if let Some(vertex) = self.vertices.get_mut(&id) {
            vertex.building = VertexBuilding::Settlement(player);
        }
    }

    /// Upgrade a settlement to a city (assumes validation already done)
    pub fn upgrade_to_city(&mut self, id: VertexId, player: PlayerId) {
        if let Some(vertex) = self.vertices.get_mut(&id) {
            vertex.building = VertexBuilding::City(player);
        }
    }

    /// Place a road on both endpoints (assumes validation already done)
    pub fn place_road(&mut self, a: VertexId, b: VertexId, player: PlayerId) {
        if !self.vertices.contains_key(&a) || !self.vertices.contains_key(&b) {
            return;
        }
        if let Some(vertex) = self.vertices.get_mut(&a) {
            vertex.roads.insert(b, player);
        }
        if let Some(vertex) = self.vertices.get_mut(&b) {
            vertex.roads.insert(a, player);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_topology_counts() {
        let board = Board::standard_topology();
        assert_eq!(board.hex_count(), 19);
        assert_eq!(board.vertex_count(), 54);
        assert_eq!(board.edge_count(), 72);
    }

    #[test]
    fn test_every_hex_has_six_corners() {
        let board = Board::standard_topology();
        for hex in board.hexes() {
            assert_eq!(hex.neighbor_vertices.len(), 6);
            for v in &hex.neighbor_vertices {
                let vertex = board.vertex(*v).unwrap();
                assert!(vertex.neighbor_hexes.contains(&hex.id));
            }
        }
    }

    #[test]
    fn test_distance_rule() {
        let mut board = Board::standard_topology();
        let vertex = board.vertex(8).unwrap().clone();
        assert!(board.satisfies_distance_rule(vertex.id));

        board.place_settlement(vertex.id, 1);
        for n in &vertex.neighbor_vertices {
            assert!(!board.satisfies_distance_rule(*n));
        }
        // The occupied vertex itself has no occupied neighbours
        assert!(board.satisfies_distance_rule(vertex.id));
        assert!(!board.satisfies_distance_rule(9999));
    }

    #[test]
    fn test_place_road_is_symmetric() {
        let mut board = Board::standard_topology();
        let a = 8;
        let b = board.vertex(a).unwrap().neighbor_vertices[0];
        board.place_road(a, b, 2);

        assert_eq!(board.road_between(a, b), Some(2));
        assert_eq!(board.road_between(b, a), Some(2));
        assert!(board.roads_are_symmetric());
        assert_eq!(
            board.roads(),
            vec![Road {
                from: a.min(b),
                to: a.max(b),
                owner: 2
            }]
        );
    }

    #[test]
    fn test_place_road_ignores_unknown_vertex() {
        let mut board = Board::standard_topology();
        board.place_road(0, 500, 1);
        assert!(board.roads().is_empty());
        assert!(board.roads_are_symmetric());
    }

    #[test]
    fn test_city_upgrade_and_counts() {
        let mut board = Board::standard_topology();
        board.place_settlement(0, 3);
        board.place_settlement(20, 3);
        assert_eq!(board.settlement_count(3), 2);

        board.upgrade_to_city(20, 3);
        assert_eq!(board.settlement_count(3), 1);
        assert_eq!(board.buildings_of(3).count(), 2);
        assert_eq!(board.get_building(20), VertexBuilding::City(3));
        assert_eq!(board.get_building(20).resource_multiplier(), 2);
    }

    #[test]
    fn test_hex_produces_only_on_matching_roll_without_robber() {
        let mut hex = HexCell::new(54, HexCoord::new(0, 0));
        hex.tile_type = Some(TileType::Resource(Resource::Ore));
        hex.dice_number = Some(9);
        assert_eq!(hex.produces_on(9), Some(Resource::Ore));
        assert_eq!(hex.produces_on(8), None);

        hex.has_robber = true;
        assert_eq!(hex.produces_on(9), None);
    }

    #[test]
    fn test_serde_keeps_ids() {
        let mut board = Board::standard_topology();
        board.place_road(3, 8, 4);
        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);
    }
}
