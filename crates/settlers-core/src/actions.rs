//! Game actions that players can take.
//!
//! This module defines all possible actions in the game, the events that
//! result from those actions, and the sink those events are sent to.

use crate::board::{HexTile, LocationId, PlayerId, Resource, TileId};
use crate::player::{PlayerColor, ResourceHand};
use crate::structures::Structure;
use serde::{Deserialize, Serialize};

/// All possible actions a player can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Build a settlement (free during setup)
    PlaceSettlement(LocationId),
    /// Build a road between two neighbouring locations (free during setup)
    PlaceRoad(LocationId, LocationId),
    /// Upgrade an own settlement to a city
    PlaceCity(LocationId),
    /// Roll the dice (must be done at start of turn)
    RollDice,
    /// Move the robber after a 7
    MoveRobber(TileId),
    /// Give four of one resource to the bank for one of another
    BankTrade { give: Resource, receive: Resource },
    EndTurn,
}

/// Notifications for whatever draws the game.
///
/// Emitted after each change to the state; nothing is ever read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum GameEvent {
    /// A tile became visible (all tiles are revealed when the game starts)
    TileRevealed { tile: HexTile },

    /// The robber was moved
    RobberMoved { from: TileId, to: TileId },

    /// A settlement, city or road was built
    StructurePlaced {
        player: PlayerId,
        color: PlayerColor,
        structure: Structure,
    },

    /// A player's hand changed
    ResourcesChanged {
        player: PlayerId,
        resources: ResourceHand,
        victory_points: u32,
    },

    /// The instruction shown to the acting player changed
    TurnTextChanged { text: String },

    /// Dice were rolled
    DiceRolled { player: PlayerId, total: u8 },
}

/// One-way receiver for game events
pub trait RenderSink {
    fn notify(&mut self, event: GameEvent);
}

impl RenderSink for Vec<GameEvent> {
    fn notify(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// A sink that drops everything, for headless use
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn notify(&mut self, _event: GameEvent) {}
}
