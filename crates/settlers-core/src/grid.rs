//! Board topology generation.
//!
//! Every lattice point within a bounding radius is classified as a hex
//! centre or a corner. Hexes missing any of their six corners are dropped
//! (this trims the incomplete outer ring), then corners touching none of the
//! surviving hexes are dropped. Survivors get sequential ids, vertices first
//! and hexes after, both in enumeration order.

use crate::board::{Board, HexCell, HexId, VertexCell, VertexId};
use crate::hex::HexCoord;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Bounding radius that yields the standard 19-hex board
pub const STANDARD_RADIUS: i32 = 5;

/// Builds the hex/vertex graph for a board.
///
/// Generation is deterministic: the same radius always gives the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexGridGenerator {
    radius: i32,
}

impl HexGridGenerator {
    pub fn new(radius: i32) -> Self {
        Self { radius }
    }

    /// Generator for the standard board
    pub fn standard() -> Self {
        Self::new(STANDARD_RADIUS)
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Generate the board graph with all neighbour lists populated
    pub fn generate(&self) -> Board {
        let candidates = HexCoord::within_radius(self.radius);

        let corner_candidates: HashSet<HexCoord> = candidates
            .iter()
            .copied()
            .filter(|c| !c.is_hex_center())
            .collect();

        let hex_coords: Vec<HexCoord> = candidates
            .iter()
            .copied()
            .filter(|c| c.is_hex_center())
            .filter(|c| {
                c.neighbors()
                    .iter()
                    .filter(|n| corner_candidates.contains(n))
                    .count()
                    == 6
            })
            .collect();
        let hex_set: HashSet<HexCoord> = hex_coords.iter().copied().collect();

        let vertex_coords: Vec<HexCoord> = candidates
            .iter()
            .copied()
            .filter(|c| corner_candidates.contains(c))
            .filter(|c| c.neighbors().iter().any(|n| hex_set.contains(n)))
            .collect();

        let mut ids: HashMap<HexCoord, u16> = HashMap::new();
        for (i, coord) in vertex_coords.iter().chain(hex_coords.iter()).enumerate() {
            // The standard board has 73 cells; radius is never large enough to overflow
            ids.insert(*coord, i as u16);
        }

        let neighbor_ids = |coord: &HexCoord, wanted: &HashSet<HexCoord>| -> Vec<u16> {
            let mut found: Vec<u16> = coord
                .neighbors()
                .iter()
                .filter(|n| wanted.contains(n))
                .filter_map(|n| ids.get(n).copied())
                .collect();
            found.sort_unstable();
            found
        };

        let vertex_set: HashSet<HexCoord> = vertex_coords.iter().copied().collect();

        let vertices: Vec<VertexCell> = vertex_coords
            .iter()
            .filter_map(|coord| {
                let id: VertexId = *ids.get(coord)?;
                let mut cell = VertexCell::new(id, *coord);
                cell.neighbor_vertices = neighbor_ids(coord, &vertex_set);
                cell.neighbor_hexes = neighbor_ids(coord, &hex_set);
                Some(cell)
            })
            .collect();

        let corners_of: HashMap<HexId, Vec<VertexId>> = hex_coords
            .iter()
            .filter_map(|coord| Some((*ids.get(coord)?, neighbor_ids(coord, &vertex_set))))
            .collect();

        let hexes: Vec<HexCell> = hex_coords
            .iter()
            .filter_map(|coord| {
                let id: HexId = *ids.get(coord)?;
                let mut cell = HexCell::new(id, *coord);
                cell.neighbor_vertices = corners_of.get(&id).cloned().unwrap_or_default();
                cell.neighbor_hexes = shared_corner_hexes(id, &cell.neighbor_vertices, &vertices);
                Some(cell)
            })
            .collect();

        debug!(
            radius = self.radius,
            hexes = hexes.len(),
            vertices = vertices.len(),
            "generated board topology"
        );

        Board::from_cells(hexes, vertices)
    }
}

impl Default for HexGridGenerator {
    fn default() -> Self {
        Self::standard()
    }
}

/// Hexes that share at least one corner with `hex`, sorted and excluding itself
fn shared_corner_hexes(hex: HexId, corners: &[VertexId], vertices: &[VertexCell]) -> Vec<HexId> {
    let mut found = BTreeSet::new();
    for corner in corners {
        // Vertex ids are their index in generation order
        if let Some(vertex) = vertices.get(*corner as usize) {
            found.extend(vertex.neighbor_hexes.iter().copied().filter(|h| *h != hex));
        }
    }
    found.into_iter().collect()
}
