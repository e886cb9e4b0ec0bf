//! Player state and resource management.
//!
//! This module contains:
//! - ResourceHand for managing resource counts (used by players and the bank)
//! - Building costs and the stricter thresholds that gate the action report
//! - Player struct

use crate::board::{PlayerId, Resource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of players seated at every game
pub const PLAYER_COUNT: u8 = 4;

/// Cards of each resource the bank holds at the start of a game
pub const BANK_STARTING_STOCK: u32 = 19;

/// A hand of resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHand {
    pub wood: u32,
    pub brick: u32,
    pub wheat: u32,
    pub sheep: u32,
    pub ore: u32,
}

impl ResourceHand {
    /// Create an empty hand
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hand with specific amounts
    pub fn with_amounts(wood: u32, brick: u32, wheat: u32, sheep: u32, ore: u32) -> Self {
        Self {
            wood,
            brick,
            wheat,
            sheep,
            ore,
        }
    }

    /// The bank's opening stock
    pub fn bank() -> Self {
        let n = BANK_STARTING_STOCK;
        Self::with_amounts(n, n, n, n, n)
    }

    /// Total number of resource cards
    pub fn total(&self) -> u32 {
        self.wood + self.brick + self.wheat + self.sheep + self.ore
    }

    /// Check if hand is empty
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Get count of a specific resource
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Wood => self.wood,
            Resource::Brick => self.brick,
            Resource::Wheat => self.wheat,
            Resource::Sheep => self.sheep,
            Resource::Ore => self.ore,
        }
    }

    fn slot_mut(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Wood => &mut self.wood,
            Resource::Brick => &mut self.brick,
            Resource::Wheat => &mut self.wheat,
            Resource::Sheep => &mut self.sheep,
            Resource::Ore => &mut self.ore,
        }
    }

    /// Set count of a specific resource
    pub fn set(&mut self, resource: Resource, count: u32) {
        *self.slot_mut(resource) = count;
    }

    /// Add resources to hand
    pub fn add(&mut self, resource: Resource, amount: u32) {
        *self.slot_mut(resource) += amount;
    }

    /// Add another hand to this one
    pub fn add_hand(&mut self, other: &ResourceHand) {
        for resource in Resource::ALL {
            self.add(resource, other.get(resource));
        }
    }

    /// Remove up to `amount` of a resource, returning how many were removed
    pub fn take(&mut self, resource: Resource, amount: u32) -> u32 {
        let slot = self.slot_mut(resource);
        let taken = amount.min(*slot);
        *slot -= taken;
        taken
    }

    /// Check if can afford a cost
    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        Resource::ALL
            .iter()
            .all(|&resource| self.get(resource) >= cost.get(resource))
    }

    /// Try to subtract, returning false (and leaving the hand untouched) if insufficient
    pub fn try_subtract(&mut self, cost: &ResourceHand) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        for resource in Resource::ALL {
            *self.slot_mut(resource) -= cost.get(resource);
        }
        true
    }

    /// Counts keyed by resource name, in a stable order
    pub fn to_named_map(&self) -> BTreeMap<String, u32> {
        Resource::ALL
            .iter()
            .map(|&resource| (resource.name().to_string(), self.get(resource)))
            .collect()
    }
}

/// Building costs
pub mod costs {
    use super::ResourceHand;

    /// Cost to build a road: 1 wood, 1 brick
    pub fn road() -> ResourceHand {
        ResourceHand::with_amounts(1, 1, 0, 0, 0)
    }

    /// Cost to build a settlement: 1 wood, 1 brick, 1 wheat, 1 sheep
    pub fn settlement() -> ResourceHand {
        ResourceHand::with_amounts(1, 1, 1, 1, 0)
    }

    /// Cost to upgrade to city: 2 wheat, 3 ore
    pub fn city() -> ResourceHand {
        ResourceHand::with_amounts(0, 0, 2, 0, 3)
    }

    /// Holding needed before city upgrades are offered: 5 wheat, 3 ore.
    ///
    /// Deliberately above [`city`]; the offer threshold and the debit differ.
    pub fn city_threshold() -> ResourceHand {
        ResourceHand::with_amounts(0, 0, 5, 0, 3)
    }
}

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player ID (1-4)
    pub id: PlayerId,
    /// Current resources
    pub resources: ResourceHand,
}

impl Player {
    /// Create a new player with an empty hand
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            resources: ResourceHand::new(),
        }
    }

    /// Can this player afford a road?
    pub fn can_afford_road(&self) -> bool {
        self.resources.can_afford(&costs::road())
    }

    /// Can this player afford a settlement?
    pub fn can_afford_settlement(&self) -> bool {
        self.resources.can_afford(&costs::settlement())
    }

    /// Does this player hold enough to be offered a city upgrade?
    pub fn can_afford_city(&self) -> bool {
        self.resources.can_afford(&costs::city_threshold())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_hand_total() {
        let hand = ResourceHand::with_amounts(1, 2, 3, 4, 5);
        assert_eq!(hand.total(), 15);
        assert!(!hand.is_empty());
        assert!(ResourceHand::new().is_empty());
    }

    #[test]
    fn test_bank_starts_with_19_of_each() {
        let bank = ResourceHand::bank();
        for resource in Resource::ALL {
            assert_eq!(bank.get(resource), 19);
        }
        assert_eq!(bank.total(), 95);
    }

    #[test]
    fn test_resource_hand_can_afford() {
        let hand = ResourceHand::with_amounts(2, 2, 2, 2, 2);
        assert!(hand.can_afford(&ResourceHand::with_amounts(1, 1, 1, 1, 1)));
        assert!(!hand.can_afford(&ResourceHand::with_amounts(3, 0, 0, 0, 0)));
    }

    #[test]
    fn test_try_subtract_is_all_or_nothing() {
        let mut hand = ResourceHand::with_amounts(1, 0, 5, 5, 5);
        assert!(!hand.try_subtract(&costs::road()));
        assert_eq!(hand, ResourceHand::with_amounts(1, 0, 5, 5, 5));

        assert!(hand.try_subtract(&costs::city()));
        assert_eq!(hand, ResourceHand::with_amounts(1, 0, 3, 5, 2));
    }

    #[test]
    fn test_take_never_goes_negative() {
        let mut bank = ResourceHand::with_amounts(0, 1, 0, 0, 0);
        assert_eq!(bank.take(Resource::Brick, 2), 1);
        assert_eq!(bank.take(Resource::Brick, 1), 0);
        assert_eq!(bank.brick, 0);
    }

    #[test]
    fn test_add_hand() {
        let mut hand = ResourceHand::with_amounts(1, 1, 1, 1, 1);
        hand.add_hand(&costs::city());
        assert_eq!(hand, ResourceHand::with_amounts(1, 1, 3, 1, 4));
    }

    #[test]
    fn test_building_costs() {
        assert_eq!(costs::road().total(), 2);
        assert_eq!(costs::settlement().total(), 4);
        assert_eq!(costs::city().total(), 5);
        assert!(costs::city_threshold().can_afford(&costs::city()));
    }

    #[test]
    fn test_named_map_covers_every_resource() {
        let map = ResourceHand::with_amounts(1, 2, 3, 4, 5).to_named_map();
        assert_eq!(map.len(), 5);
        assert_eq!(map["wood"], 1);
        assert_eq!(map["ore"], 5);
    }

    #[test]
    fn test_city_offer_needs_five_wheat() {
        let mut player = Player::new(1);
        player.resources = ResourceHand::with_amounts(0, 0, 4, 0, 3);
        assert!(!player.can_afford_city());
        player.resources.add(Resource::Wheat, 1);
        assert!(player.can_afford_city());
    }
}
