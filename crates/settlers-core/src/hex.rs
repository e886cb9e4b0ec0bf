//! Axial coordinate system for the board lattice.
//!
//! Hex centres and corners share a single triangular lattice addressed by
//! axial coordinates `(q, r)`:
//! - a lattice point is a hex centre when `(q - r) mod 3 == 0`
//!   (and therefore `(2q + r) mod 3 == 0`)
//! - every other point is a corner (vertex) candidate
//!
//! Two points are neighbours only when their delta is one of the six unit
//! directions. A hex centre's six neighbours are all corners; a corner has
//! three neighbouring corners and up to three neighbouring hex centres.

use serde::{Deserialize, Serialize};

/// The six axial unit directions, clockwise starting from East.
pub const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Axial coordinate on the board lattice.
///
/// - `q` increases going east
/// - `r` increases going southeast
/// - The third coordinate `s` (not stored) satisfies: q + r + s = 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct HexCoord {
    /// Column (increases going east)
    pub q: i32,
    /// Row (increases going southeast)
    pub r: i32,
}

impl HexCoord {
    /// Create a new coordinate
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The implicit third coordinate (s = -q - r)
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// The six neighbouring lattice points in clockwise order starting from East
    pub fn neighbors(&self) -> [HexCoord; 6] {
        DIRECTIONS.map(|(dq, dr)| HexCoord::new(self.q + dq, self.r + dr))
    }

    /// Whether `other` is exactly one unit step away.
    ///
    /// Only the six axial directions count; `(1, 1)` and `(-1, -1)` are two
    /// steps apart even though both components differ by one.
    pub fn is_adjacent(&self, other: &HexCoord) -> bool {
        let delta = (self.q - other.q, self.r - other.r);
        DIRECTIONS.contains(&delta)
    }

    /// Whether this lattice point is the centre of a hex tile
    pub fn is_hex_center(&self) -> bool {
        (self.q - self.r).rem_euclid(3) == 0 && (2 * self.q + self.r).rem_euclid(3) == 0
    }

    /// Distance to another point (in lattice steps)
    pub fn distance_to(&self, other: &HexCoord) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Every lattice point within `radius` steps of the origin.
    ///
    /// Ordered with `q` as the outer loop and `r` as the inner loop, which
    /// fixes the id assignment of the generated board.
    pub fn within_radius(radius: i32) -> Vec<HexCoord> {
        let mut coords = Vec::new();
        for q in -radius..=radius {
            let r_min = (-radius).max(-q - radius);
            let r_max = radius.min(-q + radius);
            for r in r_min..=r_max {
                coords.push(HexCoord::new(q, r));
            }
        }
        coords
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_neighbors_are_distinct_and_adjacent() {
        let center = HexCoord::new(0, 0);
        let neighbors = center.neighbors();

        let unique: HashSet<_> = neighbors.iter().collect();
        assert_eq!(unique.len(), 6);

        for neighbor in &neighbors {
            assert_eq!(center.distance_to(neighbor), 1);
            assert!(center.is_adjacent(neighbor));
            assert!(neighbor.is_adjacent(&center));
        }
    }

    #[test]
    fn test_diagonal_is_not_adjacent() {
        let origin = HexCoord::new(0, 0);
        assert!(!origin.is_adjacent(&HexCoord::new(1, 1)));
        assert!(!origin.is_adjacent(&HexCoord::new(-1, -1)));
        assert!(!origin.is_adjacent(&origin));
    }

    #[test]
    fn test_hex_center_classification() {
        assert!(HexCoord::new(0, 0).is_hex_center());
        assert!(HexCoord::new(1, 1).is_hex_center());
        assert!(HexCoord::new(-3, 0).is_hex_center());
        assert!(HexCoord::new(2, -1).is_hex_center());
        assert!(!HexCoord::new(1, 0).is_hex_center());
        assert!(!HexCoord::new(-1, 0).is_hex_center());
        assert!(!HexCoord::new(0, -2).is_hex_center());
    }

    #[test]
    fn test_hex_center_neighbors_are_all_corners() {
        for coord in HexCoord::within_radius(4) {
            if coord.is_hex_center() {
                assert!(coord.neighbors().iter().all(|n| !n.is_hex_center()));
            }
        }
    }

    #[test]
    fn test_corner_has_three_corner_neighbors() {
        let corner = HexCoord::new(1, 0);
        let corners = corner.neighbors().iter().filter(|n| !n.is_hex_center()).count();
        assert_eq!(corners, 3);
    }

    #[test]
    fn test_within_radius_count() {
        // 3r^2 + 3r + 1 points in a hexagon of radius r
        assert_eq!(HexCoord::within_radius(0).len(), 1);
        assert_eq!(HexCoord::within_radius(1).len(), 7);
        assert_eq!(HexCoord::within_radius(5).len(), 91);
        assert!(HexCoord::within_radius(5)
            .iter()
            .all(|c| c.distance_to(&HexCoord::default()) <= 5));
    }

    #[test]
    fn test_distance() {
        let a = HexCoord::new(0, 0);
        assert_eq!(a.distance_to(&HexCoord::new(2, -1)), 2);
        assert_eq!(a.distance_to(&HexCoord::new(-3, 3)), 3);
    }
}
