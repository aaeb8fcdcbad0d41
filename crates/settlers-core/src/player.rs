//! Player state and resource management.
//!
//! This module contains:
//! - Player struct with resources and owned structures
//! - ResourceHand for managing resource counts
//! - Building costs

use crate::board::{LocationId, PlayerId, Resource};
use crate::game::GameError;
use crate::structures::Structure;
use serde::{Deserialize, Serialize};

/// Cards given up in a bank trade
pub const BANK_TRADE_RATE: u32 = 4;

/// Settlements and roads a player may place for free at the start
pub const SETUP_PLACEMENTS: usize = 2;

/// Player color, also the ownership key shown on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Blue,
    Pink,
    Purple,
    Orange,
}

impl PlayerColor {
    /// Get color for a player index
    pub fn for_player(id: PlayerId) -> Self {
        match id % 4 {
            0 => PlayerColor::Blue,
            1 => PlayerColor::Pink,
            2 => PlayerColor::Purple,
            _ => PlayerColor::Orange,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlayerColor::Blue => "blue",
            PlayerColor::Pink => "pink",
            PlayerColor::Purple => "purple",
            PlayerColor::Orange => "orange",
        }
    }
}

/// A hand of resources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHand {
    pub wheat: u32,
    pub wool: u32,
    pub wood: u32,
    pub ore: u32,
    pub brick: u32,
}

impl ResourceHand {
    /// Create an empty hand
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hand with specific amounts
    pub fn with_amounts(wheat: u32, wool: u32, wood: u32, ore: u32, brick: u32) -> Self {
        Self {
            wheat,
            wool,
            wood,
            ore,
            brick,
        }
    }

    /// The hand every player starts with: enough for a first road and settlement
    pub fn starter() -> Self {
        Self::with_amounts(2, 2, 4, 0, 4)
    }

    /// Create a hand with a single resource
    pub fn single(resource: Resource, amount: u32) -> Self {
        let mut hand = Self::new();
        hand.add(resource, amount);
        hand
    }

    /// Total number of resource cards
    pub fn total(&self) -> u32 {
        Resource::ALL.iter().map(|r| self.get(*r)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Get count of a specific resource
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Wheat => self.wheat,
            Resource::Wool => self.wool,
            Resource::Wood => self.wood,
            Resource::Ore => self.ore,
            Resource::Brick => self.brick,
        }
    }

    fn slot(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Wheat => &mut self.wheat,
            Resource::Wool => &mut self.wool,
            Resource::Wood => &mut self.wood,
            Resource::Ore => &mut self.ore,
            Resource::Brick => &mut self.brick,
        }
    }

    /// Set count of a specific resource
    pub fn set(&mut self, resource: Resource, count: u32) {
        *self.slot(resource) = count;
    }

    /// Add resources to hand
    pub fn add(&mut self, resource: Resource, amount: u32) {
        *self.slot(resource) += amount;
    }

    /// Check if can afford a cost
    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        Resource::ALL.iter().all(|r| self.get(*r) >= cost.get(*r))
    }

    /// Deduct a cost, leaving the hand untouched if any count would go negative
    pub fn spend(&mut self, cost: &ResourceHand) -> Result<(), GameError> {
        if !self.can_afford(cost) {
            return Err(GameError::InsufficientResources);
        }
        for r in Resource::ALL {
            *self.slot(r) -= cost.get(r);
        }
        Ok(())
    }
}

/// Building costs
pub mod costs {
    use super::ResourceHand;

    /// Cost to build a road: 1 brick, 1 wood
    pub fn road() -> ResourceHand {
        ResourceHand::with_amounts(0, 0, 1, 0, 1)
    }

    /// Cost to build a settlement: 1 wheat, 1 wool, 1 wood, 1 brick
    pub fn settlement() -> ResourceHand {
        ResourceHand::with_amounts(1, 1, 1, 0, 1)
    }

    /// Cost to upgrade to city: 2 wheat, 3 ore
    pub fn city() -> ResourceHand {
        ResourceHand::with_amounts(2, 0, 0, 3, 0)
    }
}

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player ID (0-3)
    pub id: PlayerId,
    pub name: String,
    pub color: PlayerColor,
    pub resources: ResourceHand,
    /// Everything this player has built, in build order
    pub structures: Vec<Structure>,
}

impl Player {
    /// Create a new player with an empty hand
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            color: PlayerColor::for_player(id),
            resources: ResourceHand::new(),
            structures: Vec::new(),
        }
    }

    /// Total victory points: the sum over owned structures
    pub fn victory_points(&self) -> u32 {
        self.structures.iter().map(Structure::victory_points).sum()
    }

    /// Settlements and cities owned
    pub fn settlement_count(&self) -> usize {
        self.structures.iter().filter(|s| s.site().is_some()).count()
    }

    pub fn city_count(&self) -> usize {
        self.structures
            .iter()
            .filter(|s| matches!(s, Structure::City(_)))
            .count()
    }

    pub fn road_count(&self) -> usize {
        self.structures
            .iter()
            .filter(|s| matches!(s, Structure::Road(_)))
            .count()
    }

    /// Whether the next settlement is still a free setup placement
    pub fn places_settlement_for_free(&self) -> bool {
        self.settlement_count() < SETUP_PLACEMENTS
    }

    /// Whether the next road is still a free setup placement
    pub fn places_road_for_free(&self) -> bool {
        self.road_count() < SETUP_PLACEMENTS
    }

    /// The settlement or city standing on a location
    pub fn structure_at_mut(&mut self, location: LocationId) -> Option<&mut Structure> {
        self.structures
            .iter_mut()
            .find(|s| s.site().is_some_and(|site| site.location == location))
    }

    /// Gain resources
    pub fn receive(&mut self, resource: Resource, amount: u32) {
        self.resources.add(resource, amount);
    }

    /// Pay a cost, failing without mutation if the hand is short
    pub fn spend(&mut self, cost: &ResourceHand) -> Result<(), GameError> {
        self.resources.spend(cost)
    }

    /// Hand four of one resource to the bank.
    ///
    /// What the player receives in exchange is chosen separately.
    pub fn trade_in(&mut self, resource: Resource) -> Result<(), GameError> {
        self.spend(&ResourceHand::single(resource, BANK_TRADE_RATE))
    }
}
