//! Settings that vary between games.

use crate::dice::DiceMode;
use crate::player::ResourceHand;
use crate::rules::RoadRule;
use serde::{Deserialize, Serialize};

/// Players in a standard game
pub const PLAYER_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for board layout and dice; random when absent
    pub seed: Option<u64>,
    pub dice: DiceMode,
    pub road_rule: RoadRule,
    /// Hand each player starts with
    pub starting_hand: ResourceHand,
    /// One name per player, in turn order
    pub player_names: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            dice: DiceMode::default(),
            road_rule: RoadRule::default(),
            starting_hand: ResourceHand::starter(),
            player_names: (1..=PLAYER_COUNT).map(|i| format!("Player {i}")).collect(),
        }
    }
}

impl GameConfig {
    /// Default settings with a fixed seed, for reproducible games
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}
