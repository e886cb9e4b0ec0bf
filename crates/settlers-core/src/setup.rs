//! Random tile and dice number assignment.
//!
//! Tiles are dealt from a fixed pool in hex id order. Dice numbers are then
//! dealt to the non-desert hexes by rejection sampling until no two hexes
//! showing 6 or 8 share a corner.

use crate::board::{Board, Resource, TileType};
use crate::error::{GameError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

/// Attempts allowed before number assignment gives up
pub const MAX_NUMBER_ATTEMPTS: u32 = 1000;

/// Tile multiset for the standard board
pub const TILE_POOL: [(TileType, usize); 6] = [
    (TileType::Resource(Resource::Wood), 4),
    (TileType::Resource(Resource::Brick), 3),
    (TileType::Resource(Resource::Ore), 3),
    (TileType::Resource(Resource::Wheat), 4),
    (TileType::Resource(Resource::Sheep), 4),
    (TileType::Desert, 1),
];

/// Dice number multiset for the non-desert hexes
pub const NUMBER_POOL: [u8; 18] = [2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];

/// Numbers that may not sit next to each other
pub fn is_high_number(number: u8) -> bool {
    number == 6 || number == 8
}

/// Expand [`TILE_POOL`] into one entry per tile
pub fn tile_pool() -> Vec<TileType> {
    TILE_POOL
        .iter()
        .flat_map(|&(tile, count)| std::iter::repeat(tile).take(count))
        .collect()
}

/// Whether any hex showing 6 or 8 shares a corner with another such hex
pub fn has_adjacent_high_numbers(board: &Board) -> bool {
    board.hexes().any(|hex| {
        hex.dice_number.is_some_and(is_high_number)
            && hex.neighbor_hexes.iter().any(|n| {
                board
                    .hex(*n)
                    .and_then(|other| other.dice_number)
                    .is_some_and(is_high_number)
            })
    })
}

/// Deals tiles and dice numbers onto a freshly generated board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceAssigner {
    max_attempts: u32,
}

impl Default for ResourceAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceAssigner {
    pub fn new() -> Self {
        Self {
            max_attempts: MAX_NUMBER_ATTEMPTS,
        }
    }

    /// Use a custom attempt budget for number assignment
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Deal tiles, then dice numbers
    pub fn assign<R: Rng>(&self, board: &mut Board, rng: &mut R) -> Result<()> {
        self.assign_tiles(board, rng)?;
        self.assign_numbers(board, rng)?;
        Ok(())
    }

    /// Shuffle the tile pool and deal one tile per hex in id order.
    ///
    /// The desert gets the robber and never gets a number.
    pub fn assign_tiles<R: Rng>(&self, board: &mut Board, rng: &mut R) -> Result<()> {
        let mut tiles = tile_pool();
        if tiles.len() != board.hex_count() {
            return Err(GameError::CountMismatch {
                pool: "tile".to_string(),
                expected: board.hex_count(),
                found: tiles.len(),
            });
        }
        tiles.shuffle(rng);

        for (hex, tile) in board.hexes_mut().zip(tiles) {
            hex.tile_type = Some(tile);
            hex.dice_number = None;
            hex.has_robber = tile == TileType::Desert;
        }
        Ok(())
    }

    /// Deal dice numbers to non-desert hexes, retrying until the 6/8 rule holds.
    ///
    /// Returns the number of attempts used.
    pub fn assign_numbers<R: Rng>(&self, board: &mut Board, rng: &mut R) -> Result<u32> {
        let producing: Vec<_> = board
            .hexes()
            .filter(|h| h.resource().is_some())
            .map(|h| h.id)
            .collect();
        if producing.len() != NUMBER_POOL.len() {
            return Err(GameError::CountMismatch {
                pool: "number".to_string(),
                expected: producing.len(),
                found: NUMBER_POOL.len(),
            });
        }

        let mut numbers = NUMBER_POOL.to_vec();
        for attempt in 1..=self.max_attempts {
            numbers.shuffle(rng);
            for (id, number) in producing.iter().zip(&numbers) {
                if let Some(hex) = board.hex_mut(*id) {
                    hex.dice_number = Some(*number);
                }
            }

            if !has_adjacent_high_numbers(board) {
                debug!(attempts = attempt, "dice numbers assigned");
                return Ok(attempt);
            }

            trace!(attempt, "adjacent 6/8 found, reshuffling numbers");
            for hex in board.hexes_mut() {
                hex.dice_number = None;
            }
        }

        Err(GameError::SetupInfeasible {
            attempts: self.max_attempts,
        })
    }
}
