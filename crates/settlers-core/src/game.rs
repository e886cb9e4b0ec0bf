//! Core game state and turn engine.
//!
//! This module contains the `GameState` aggregate (board, bank, players,
//! current player) and every operation that mutates it. Each operation either
//! completes fully or leaves the state untouched.

use crate::actions::{ActionReport, Command, CommandOutcome};
use crate::board::{edge_key, Board, PlayerId, Resource, VertexId};
use crate::error::{GameError, Result};
use crate::player::{costs, Player, ResourceHand, PLAYER_COUNT};
use crate::rules::{self, MAX_SETTLEMENTS};
use crate::setup::ResourceAssigner;
use crate::snapshot::BoardSnapshot;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The game board
    pub board: Board,
    /// Resources not held by any player
    pub bank: ResourceHand,
    /// All players, ordered by id
    pub players: Vec<Player>,
    /// Whose turn it is (1-based)
    pub current_player: PlayerId,
}

impl GameState {
    /// Create a new game on a randomly laid out standard board
    pub fn new() -> Result<Self> {
        let mut rng = rand::thread_rng();
        Self::with_rng(&mut rng)
    }

    /// Create a new game with a provided RNG.
    /// This allows for deterministic board generation when needed
    pub fn with_rng<R: Rng>(rng: &mut R) -> Result<Self> {
        let mut board = Board::standard_topology();
        ResourceAssigner::new().assign(&mut board, rng)?;
        info!(
            hexes = board.hex_count(),
            vertices = board.vertex_count(),
            "board set up"
        );
        Ok(Self::from_board(board))
    }

    /// Start a game on an already prepared board
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            bank: ResourceHand::bank(),
            players: (1..=PLAYER_COUNT).map(Player::new).collect(),
            current_player: 1,
        }
    }

    /// Get a player by ID
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Get a mutable player by ID
    fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// What `player` may do right now; empty for unknown players
    pub fn action_report(&self, player: PlayerId) -> ActionReport {
        self.get_player(player)
            .map(|p| rules::action_report(&self.board, p))
            .unwrap_or_default()
    }

    /// Client-facing state without next actions
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(self, false)
    }

    /// Client-facing state including every player's next actions
    pub fn snapshot_with_actions(&self) -> BoardSnapshot {
        BoardSnapshot::capture(self, true)
    }

    // ==================== Dice Rolling ====================

    /// Roll both dice and distribute production
    pub fn roll_dice(&mut self) -> (u8, u8) {
        let mut rng = rand::thread_rng();
        self.roll_dice_with_rng(&mut rng)
    }

    /// Roll both dice with a provided RNG and distribute production
    pub fn roll_dice_with_rng<R: Rng>(&mut self, rng: &mut R) -> (u8, u8) {
        let die1 = rng.gen_range(1..=6);
        let die2 = rng.gen_range(1..=6);
        debug!(player = self.current_player, die1, die2, "dice rolled");
        self.collect_resources(die1 + die2);
        (die1, die2)
    }

    /// Pay out production for `roll` from the bank.
    ///
    /// Players are served starting with the current player and wrapping
    /// around, so whoever comes first gets the cards when the bank runs short.
    /// A building owed more than the bank holds gets what is left (at most
    /// one card short). Returns every transfer made.
    pub fn collect_resources(&mut self, roll: u8) -> Vec<(PlayerId, Resource, u32)> {
        let mut transfers = Vec::new();

        for offset in 0..PLAYER_COUNT {
            let player_id = (self.current_player - 1 + offset) % PLAYER_COUNT + 1;

            let owed: Vec<(Resource, u32)> = self
                .board
                .buildings_of(player_id)
                .flat_map(|vertex| {
                    let multiplier = vertex.building.resource_multiplier();
                    self.board
                        .hexes_at_vertex(vertex.id)
                        .into_iter()
                        .filter_map(move |hex| hex.produces_on(roll).map(|r| (r, multiplier)))
                })
                .collect();

            for (resource, amount) in owed {
                let taken = self.bank.take(resource, amount);
                if taken < amount {
                    debug!(
                        player = player_id,
                        resource = resource.name(),
                        owed = amount,
                        paid = taken,
                        "bank short"
                    );
                }
                if taken == 0 {
                    continue;
                }
                if let Some(player) = self.get_player_mut(player_id) {
                    player.resources.add(resource, taken);
                    trace!(player = player_id, resource = resource.name(), taken, "collected");
                    transfers.push((player_id, resource, taken));
                } else {
                    // Cannot happen for ids 1..=4; return the cards rather than lose them
                    self.bank.add(resource, taken);
                }
            }
        }

        transfers
    }

    // ==================== Building ====================

    /// Pay `cost` from a player's hand into the bank
    fn pay_to_bank(&mut self, player: PlayerId, cost: &ResourceHand) -> bool {
        let paid = self
            .get_player_mut(player)
            .is_some_and(|p| p.resources.try_subtract(cost));
        if paid {
            self.bank.add_hand(cost);
        }
        paid
    }

    /// Build a settlement. Illegal requests are ignored.
    ///
    /// Returns whether the settlement was built.
    pub fn place_settlement(&mut self, vertex: VertexId, player: PlayerId) -> bool {
        if !self.action_report(player).allows_settlement(vertex) {
            debug!(player, vertex, "settlement rejected");
            return false;
        }
        if !self.pay_to_bank(player, &costs::settlement()) {
            return false;
        }
        self.board.place_settlement(vertex, player);
        debug!(player, vertex, "settlement built");
        true
    }

    /// Build a road between two adjacent vertices
    pub fn place_road(&mut self, from: VertexId, to: VertexId, player: PlayerId) -> Result<()> {
        if self.get_player(player).is_none() {
            return Err(GameError::UnknownPlayer(player));
        }
        if !self.action_report(player).allows_road(edge_key(from, to)) {
            debug!(player, from, to, "road rejected");
            return Err(GameError::InvalidPlacement { from, to });
        }
        if !self.pay_to_bank(player, &costs::road()) {
            return Err(GameError::InvalidPlacement { from, to });
        }
        self.board.place_road(from, to, player);
        debug!(player, from, to, "road built");
        Ok(())
    }

    /// Upgrade a settlement to a city. Illegal requests are ignored.
    ///
    /// Returns whether the city was built.
    pub fn build_city(&mut self, vertex: VertexId, player: PlayerId) -> bool {
        if !self.action_report(player).allows_city(vertex) {
            debug!(player, vertex, "city rejected");
            return false;
        }
        if !self.pay_to_bank(player, &costs::city()) {
            return false;
        }
        self.board.upgrade_to_city(vertex, player);
        debug!(player, vertex, "city built");
        true
    }

    // ==================== Initial Placement ====================

    /// Place a free opening settlement anywhere the distance rule allows.
    ///
    /// The player receives one card from the bank for each producing hex
    /// around it. Illegal requests are ignored; returns whether it was placed.
    pub fn place_initial_settlement(&mut self, vertex: VertexId, player: PlayerId) -> bool {
        let legal = self.get_player(player).is_some()
            && self.board.settlement_count(player) < MAX_SETTLEMENTS
            && rules::valid_settlement_spots(&self.board, player, true).contains(&vertex);
        if !legal {
            debug!(player, vertex, "initial settlement rejected");
            return false;
        }

        self.board.place_settlement(vertex, player);

        let starting: Vec<Resource> = self
            .board
            .hexes_at_vertex(vertex)
            .iter()
            .filter_map(|hex| hex.resource())
            .collect();
        for resource in starting {
            let taken = self.bank.take(resource, 1);
            if let Some(p) = self.get_player_mut(player) {
                p.resources.add(resource, taken);
            }
        }
        debug!(player, vertex, "initial settlement placed");
        true
    }

    /// Place a free opening road on any slot the player's network touches
    pub fn place_initial_road(&mut self, from: VertexId, to: VertexId, player: PlayerId) -> Result<()> {
        if self.get_player(player).is_none() {
            return Err(GameError::UnknownPlayer(player));
        }
        if !rules::valid_road_spots(&self.board, player).contains(&edge_key(from, to)) {
            debug!(player, from, to, "initial road rejected");
            return Err(GameError::InvalidPlacement { from, to });
        }
        self.board.place_road(from, to, player);
        Ok(())
    }

    /// Give every player an opening settlement on the best remaining spot,
    /// plus a road towards a random neighbour.
    ///
    /// Returns the chosen settlement spots in player order.
    pub fn auto_place_initial_settlements<R: Rng>(&mut self, rng: &mut R) -> Result<Vec<VertexId>> {
        let mut placed = Vec::new();
        for player in 1..=PLAYER_COUNT {
            let Some(spot) = rules::highest_production_spot(&self.board) else {
                break;
            };
            if !self.place_initial_settlement(spot, player) {
                break;
            }

            let neighbors = self
                .board
                .vertex(spot)
                .map(|v| v.neighbor_vertices.clone())
                .unwrap_or_default();
            if let Some(&next) = neighbors.choose(rng) {
                self.place_initial_road(spot, next, player)?;
            }
            placed.push(spot);
        }
        info!(spots = ?placed, "initial settlements placed");
        Ok(placed)
    }

    // ==================== Turn Management ====================

    /// Pass play to the next player, returning the new current player
    pub fn end_turn(&mut self) -> PlayerId {
        self.current_player = self.current_player % PLAYER_COUNT + 1;
        self.current_player
    }

    /// Hand play back to the previous player, returning the new current player
    pub fn previous_turn(&mut self) -> PlayerId {
        self.current_player = (self.current_player + PLAYER_COUNT - 2) % PLAYER_COUNT + 1;
        self.current_player
    }

    // ==================== Commands ====================

    /// Apply a command, returning the dice (if rolled) and the new snapshot
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome> {
        let mut rng = rand::thread_rng();
        self.apply_with_rng(command, &mut rng)
    }

    /// Apply a command using a provided RNG for dice
    pub fn apply_with_rng<R: Rng>(&mut self, command: Command, rng: &mut R) -> Result<CommandOutcome> {
        let mut dice = None;
        match command {
            Command::RollDice => dice = Some(self.roll_dice_with_rng(rng)),
            Command::PlaceSettlement { vertex, player } => {
                self.place_settlement(vertex, player);
            }
            Command::PlaceRoad { from, to, player } => self.place_road(from, to, player)?,
            Command::BuildCity { vertex, player } => {
                self.build_city(vertex, player);
            }
            Command::EndTurn => {
                self.end_turn();
            }
            Command::PreviousTurn => {
                self.previous_turn();
            }
        }

        Ok(CommandOutcome {
            dice,
            snapshot: self.snapshot_with_actions(),
        })
    }
}
