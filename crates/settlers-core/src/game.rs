//! Core game state machine.
//!
//! This module contains the main `GameState` struct, which walks the players
//! through the snake-draft setup and then through roll, robber and building
//! stages turn after turn.

use crate::actions::{GameAction, GameEvent};
use crate::board::{Board, LocationId, PlayerId, Resource, TileId};
use crate::config::GameConfig;
use crate::dice::{distribute_resources, relocate_robber, ROBBER_ROLL};
use crate::player::Player;
use crate::rules::{try_place_city, try_place_road, try_place_settlement};
use crate::structures::Structure;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// First setup round, first player to last
    SetupForward { placing: SetupPlacing },
    /// Second setup round, last player back to first
    SetupBackward { placing: SetupPlacing },
    /// Regular play
    Turn(TurnStage),
}

/// What we're placing during setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupPlacing {
    Settlement,
    Road,
}

/// Where the acting player is within a regular turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStage {
    /// Before rolling dice at start of turn
    AwaitingRoll,
    /// After rolling 7, must move robber
    AwaitingRobber,
    /// Build and trade freely until the turn ends
    Building,
}

impl GamePhase {
    pub fn is_setup(&self) -> bool {
        !matches!(self, GamePhase::Turn(_))
    }
}

/// Why a placement was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Violation {
    #[error("location is already occupied")]
    Occupied,

    #[error("too close to another settlement")]
    DistanceRule,

    #[error("locations are not neighbours")]
    NotAdjacent,

    #[error("a road is already there")]
    RoadExists,

    #[error("road must connect to your own road or settlement")]
    NotConnected,

    #[error("only your own settlements can become cities")]
    NotYourSettlement,

    #[error("the robber must move to a different tile")]
    RobberMustMove,
}

/// Errors that can occur when applying actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Invalid placement: {0}")]
    InvalidPlacement(Violation),

    #[error("Not enough resources")]
    InsufficientResources,

    #[error("No location there")]
    NoSuchLocation,

    #[error("No tile there")]
    NoSuchTile,

    #[error("Invalid action for current phase")]
    InvalidPhase,
}

/// The complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// The game board
    pub board: Board,
    /// All players
    pub players: Vec<Player>,
    /// Current player index
    pub current_player: PlayerId,
    /// Current game phase
    pub phase: GamePhase,
    /// Turn number (0 during setup, then starts at 1)
    pub turn_number: u32,
    /// Last dice roll
    pub last_roll: Option<u8>,
    config: GameConfig,
    /// Setup phase tracking: which settlement the next setup road must touch
    setup_settlement: Option<LocationId>,
    rng: StdRng,
}

impl GameState {
    /// Create a new game from the given settings
    pub fn new(config: GameConfig) -> Self {
        let player_count = config.player_names.len();
        assert!((2..=4).contains(&player_count), "Must have 2-4 players");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let board = Board::standard_with_rng(&mut rng);

        let players = config
            .player_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut player = Player::new(i as PlayerId, name.clone());
                player.resources = config.starting_hand;
                player
            })
            .collect();

        info!(players = player_count, seed = ?config.seed, "new game");

        Self {
            board,
            players,
            current_player: 0,
            phase: GamePhase::SetupForward {
                placing: SetupPlacing::Settlement,
            },
            turn_number: 0,
            last_roll: None,
            config,
            setup_settlement: None,
            rng,
        }
    }

    /// Create a standard 4-player game with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(GameConfig::seeded(seed))
    }

    /// Get the number of players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// The player whose turn it is
    pub fn active_player(&self) -> &Player {
        &self.players[self.current_player as usize]
    }

    /// Instruction for the acting player in the current phase
    pub fn prompt(&self) -> String {
        let player = self.active_player();
        let task = match self.phase {
            GamePhase::SetupForward { placing } | GamePhase::SetupBackward { placing } => {
                match placing {
                    SetupPlacing::Settlement => "place a free settlement",
                    SetupPlacing::Road => "place a free road next to your new settlement",
                }
            }
            GamePhase::Turn(TurnStage::AwaitingRoll) => "roll the dice",
            GamePhase::Turn(TurnStage::AwaitingRobber) => "move the robber to another tile",
            GamePhase::Turn(TurnStage::Building) => "build, trade or end your turn",
        };
        format!("{} ({}): {}", player.name, player.color.name(), task)
    }

    /// Everything a fresh renderer needs to draw the game from scratch
    pub fn announce(&self) -> Vec<GameEvent> {
        let mut events: Vec<GameEvent> = self
            .board
            .tiles()
            .iter()
            .map(|tile| GameEvent::TileRevealed { tile: tile.clone() })
            .collect();
        events.extend(self.players.iter().map(resources_changed));
        events.push(self.turn_text());
        events
    }

    fn turn_text(&self) -> GameEvent {
        GameEvent::TurnTextChanged {
            text: self.prompt(),
        }
    }

    /// Apply an action for the current player.
    ///
    /// On error the state is unchanged and no events are produced.
    pub fn apply_action(&mut self, action: GameAction) -> Result<Vec<GameEvent>, GameError> {
        let mut events = Vec::new();

        match action {
            // ==================== Setup Phase ====================
            GameAction::PlaceSettlement(location) if self.is_setup_step(SetupPlacing::Settlement) => {
                let structure = self.place_settlement(location)?;
                self.setup_settlement = Some(location);
                events.push(self.structure_placed(structure));
                self.set_phase(self.setup_phase(SetupPlacing::Road), &mut events);
            }

            GameAction::PlaceRoad(a, b) if self.is_setup_step(SetupPlacing::Road) => {
                if let Some(anchor) = self.setup_settlement {
                    if self.board.location(a).is_some()
                        && self.board.location(b).is_some()
                        && self.board.are_neighbors(a, b)
                        && a != anchor
                        && b != anchor
                    {
                        return Err(GameError::InvalidPlacement(Violation::NotConnected));
                    }
                }
                let structure = self.place_road(a, b)?;
                self.setup_settlement = None;
                events.push(self.structure_placed(structure));
                self.advance_setup_phase(&mut events);
            }

            // ==================== Building ====================
            GameAction::PlaceSettlement(location) if self.is_building() => {
                let structure = self.place_settlement(location)?;
                events.push(self.structure_placed(structure));
                events.push(resources_changed(self.active_player()));
            }

            GameAction::PlaceRoad(a, b) if self.is_building() => {
                let structure = self.place_road(a, b)?;
                events.push(self.structure_placed(structure));
                events.push(resources_changed(self.active_player()));
            }

            GameAction::PlaceCity(location) if self.is_building() => {
                let player = &mut self.players[self.current_player as usize];
                let structure = try_place_city(&mut self.board, location, player)?;
                events.push(self.structure_placed(structure));
                events.push(resources_changed(self.active_player()));
            }

            GameAction::BankTrade { give, receive } if self.is_building() => {
                self.bank_trade(give, receive)?;
                events.push(resources_changed(self.active_player()));
            }

            GameAction::EndTurn if self.is_building() => {
                let player_count = self.player_count() as PlayerId;
                self.current_player = (self.current_player + 1) % player_count;
                self.turn_number += 1;
                self.last_roll = None;
                self.set_phase(GamePhase::Turn(TurnStage::AwaitingRoll), &mut events);
            }

            // ==================== Dice Rolling ====================
            GameAction::RollDice if self.phase == GamePhase::Turn(TurnStage::AwaitingRoll) => {
                let roll = self.config.dice.roll(&mut self.rng);
                events.extend(self.resolve_roll(roll)?);
            }

            // ==================== Robber ====================
            GameAction::MoveRobber(tile) if self.phase == GamePhase::Turn(TurnStage::AwaitingRobber) => {
                events.extend(self.move_robber(tile)?);
            }

            _ => return Err(GameError::InvalidPhase),
        }

        Ok(events)
    }

    /// Settle a dice total for the current player as if it had just been rolled.
    ///
    /// A 7 hands control to the robber; anything else pays out and opens the
    /// building stage.
    pub fn resolve_roll(&mut self, roll: u8) -> Result<Vec<GameEvent>, GameError> {
        if self.phase != GamePhase::Turn(TurnStage::AwaitingRoll) {
            return Err(GameError::InvalidPhase);
        }

        let mut events = vec![GameEvent::DiceRolled {
            player: self.current_player,
            total: roll,
        }];
        self.last_roll = Some(roll);
        info!(player = self.current_player, roll, "dice rolled");

        if roll == ROBBER_ROLL {
            self.set_phase(GamePhase::Turn(TurnStage::AwaitingRobber), &mut events);
            return Ok(events);
        }

        let paid = distribute_resources(&self.board, &mut self.players, roll);
        let mut paid_players: Vec<PlayerId> = paid.iter().map(|income| income.player).collect();
        paid_players.dedup();
        for id in paid_players {
            events.push(resources_changed(&self.players[id as usize]));
        }

        self.set_phase(GamePhase::Turn(TurnStage::Building), &mut events);
        Ok(events)
    }

    fn move_robber(&mut self, tile: TileId) -> Result<Vec<GameEvent>, GameError> {
        let from = relocate_robber(&mut self.board, tile)?;
        let mut events = vec![GameEvent::RobberMoved { from, to: tile }];
        self.set_phase(GamePhase::Turn(TurnStage::Building), &mut events);
        Ok(events)
    }

    fn place_settlement(&mut self, location: LocationId) -> Result<Structure, GameError> {
        let player = &mut self.players[self.current_player as usize];
        let is_setup = player.places_settlement_for_free();
        try_place_settlement(&mut self.board, location, player, is_setup)
    }

    fn place_road(&mut self, a: LocationId, b: LocationId) -> Result<Structure, GameError> {
        let player = &mut self.players[self.current_player as usize];
        let is_setup = player.places_road_for_free();
        try_place_road(&mut self.board, [a, b], player, is_setup, self.config.road_rule)
    }

    fn bank_trade(&mut self, give: Resource, receive: Resource) -> Result<(), GameError> {
        let player = &mut self.players[self.current_player as usize];
        player.trade_in(give)?;
        player.receive(receive, 1);
        debug!(player = player.id, %give, %receive, "bank trade");
        Ok(())
    }

    fn structure_placed(&self, structure: Structure) -> GameEvent {
        let player = self.active_player();
        GameEvent::StructurePlaced {
            player: player.id,
            color: player.color,
            structure,
        }
    }

    fn is_setup_step(&self, step: SetupPlacing) -> bool {
        match self.phase {
            GamePhase::SetupForward { placing } | GamePhase::SetupBackward { placing } => {
                placing == step
            }
            GamePhase::Turn(_) => false,
        }
    }

    fn is_building(&self) -> bool {
        self.phase == GamePhase::Turn(TurnStage::Building)
    }

    /// The current setup round with a different placement step
    fn setup_phase(&self, placing: SetupPlacing) -> GamePhase {
        match self.phase {
            GamePhase::SetupBackward { .. } => GamePhase::SetupBackward { placing },
            _ => GamePhase::SetupForward { placing },
        }
    }

    fn set_phase(&mut self, phase: GamePhase, events: &mut Vec<GameEvent>) {
        if phase != self.phase {
            info!(player = self.current_player, ?phase, "phase changed");
        }
        self.phase = phase;
        events.push(self.turn_text());
    }

    /// Setup uses snake draft order: 0,1,2,3,3,2,1,0
    fn advance_setup_phase(&mut self, events: &mut Vec<GameEvent>) {
        let last = self.player_count() as PlayerId - 1;
        let next_settlement = SetupPlacing::Settlement;

        let next = match self.phase {
            GamePhase::SetupForward { .. } if self.current_player < last => {
                self.current_player += 1;
                GamePhase::SetupForward {
                    placing: next_settlement,
                }
            }
            // Last player places twice in a row
            GamePhase::SetupForward { .. } => GamePhase::SetupBackward {
                placing: next_settlement,
            },
            GamePhase::SetupBackward { .. } if self.current_player > 0 => {
                self.current_player -= 1;
                GamePhase::SetupBackward {
                    placing: next_settlement,
                }
            }
            _ => {
                self.current_player = 0;
                self.turn_number = 1;
                GamePhase::Turn(TurnStage::AwaitingRoll)
            }
        };

        self.set_phase(next, events);
    }
}

fn resources_changed(player: &Player) -> GameEvent {
    GameEvent::ResourcesChanged {
        player: player.id,
        resources: player.resources,
        victory_points: player.victory_points(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::ResourceHand;
    use pretty_assertions::assert_eq;

    /// Location ids of a settlement spot and one of its neighbours for each
    /// of the eight setup placements, all far enough apart.
    fn setup_spots(board: &Board) -> Vec<(LocationId, LocationId)> {
        let mut chosen: Vec<LocationId> = Vec::new();
        for location in board.locations() {
            let clear = chosen
                .iter()
                .all(|c| *c != location.id && !board.are_neighbors(*c, location.id));
            if clear {
                chosen.push(location.id);
            }
            if chosen.len() == 8 {
                break;
            }
        }
        chosen
            .into_iter()
            .map(|id| (id, board.locations()[id].neighbors[0]))
            .collect()
    }

    fn finish_setup(game: &mut GameState) {
        for (settlement, neighbor) in setup_spots(&game.board) {
            game.apply_action(GameAction::PlaceSettlement(settlement))
                .unwrap();
            game.apply_action(GameAction::PlaceRoad(settlement, neighbor))
                .unwrap();
        }
    }

    #[test]
    fn test_new_game_starts_in_setup() {
        let game = GameState::seeded(1);
        assert_eq!(
            game.phase,
            GamePhase::SetupForward {
                placing: SetupPlacing::Settlement
            }
        );
        assert_eq!(game.current_player, 0);
        assert_eq!(game.player_count(), 4);
        assert!(game
            .players
            .iter()
            .all(|p| p.resources == ResourceHand::starter()));
    }

    #[test]
    fn test_snake_draft_order() {
        let mut game = GameState::seeded(3);
        let mut order = Vec::new();
        for (settlement, neighbor) in setup_spots(&game.board) {
            order.push(game.current_player);
            game.apply_action(GameAction::PlaceSettlement(settlement))
                .unwrap();
            game.apply_action(GameAction::PlaceRoad(settlement, neighbor))
                .unwrap();
        }

        assert_eq!(order, vec![0, 1, 2, 3, 3, 2, 1, 0]);
        assert_eq!(game.phase, GamePhase::Turn(TurnStage::AwaitingRoll));
        assert_eq!(game.current_player, 0);
        assert_eq!(game.turn_number, 1);
    }

    #[test]
    fn test_setup_is_free() {
        let mut game = GameState::seeded(5);
        finish_setup(&mut game);
        for player in &game.players {
            assert_eq!(player.resources, ResourceHand::starter());
            assert_eq!(player.victory_points(), 2);
            assert_eq!(player.road_count(), 2);
        }
    }

    #[test]
    fn test_setup_road_must_touch_new_settlement() {
        let mut game = GameState::seeded(7);
        let spots = setup_spots(&game.board);
        let (settlement, _) = spots[0];
        game.apply_action(GameAction::PlaceSettlement(settlement))
            .unwrap();

        // An edge elsewhere on the board
        let (far, far_neighbor) = spots[1];
        assert_eq!(
            game.apply_action(GameAction::PlaceRoad(far, far_neighbor)),
            Err(GameError::InvalidPlacement(Violation::NotConnected))
        );
        assert_eq!(
            game.phase,
            GamePhase::SetupForward {
                placing: SetupPlacing::Road
            }
        );
    }

    #[test]
    fn test_wrong_phase_actions_rejected() {
        let mut game = GameState::seeded(9);
        assert_eq!(
            game.apply_action(GameAction::RollDice),
            Err(GameError::InvalidPhase)
        );
        assert_eq!(game.apply_action(GameAction::EndTurn), Err(GameError::InvalidPhase));
        assert_eq!(
            game.apply_action(GameAction::PlaceRoad(0, 1)),
            Err(GameError::InvalidPhase)
        );

        finish_setup(&mut game);
        assert_eq!(
            game.apply_action(GameAction::PlaceSettlement(0)),
            Err(GameError::InvalidPhase)
        );
        assert_eq!(
            game.apply_action(GameAction::MoveRobber(3)),
            Err(GameError::InvalidPhase)
        );
    }

    #[test]
    fn test_roll_seven_requires_robber() {
        let mut game = GameState::seeded(11);
        finish_setup(&mut game);

        let events = game.resolve_roll(7).unwrap();
        assert_eq!(events[0], GameEvent::DiceRolled { player: 0, total: 7 });
        assert_eq!(game.phase, GamePhase::Turn(TurnStage::AwaitingRobber));

        let from = game.board.robber_tile();
        assert_eq!(
            game.apply_action(GameAction::MoveRobber(from)),
            Err(GameError::InvalidPlacement(Violation::RobberMustMove))
        );

        let to = (from + 1) % game.board.tiles().len();
        let events = game.apply_action(GameAction::MoveRobber(to)).unwrap();
        assert_eq!(events[0], GameEvent::RobberMoved { from, to });
        assert_eq!(game.board.robber_tile(), to);
        assert_eq!(game.phase, GamePhase::Turn(TurnStage::Building));
    }

    #[test]
    fn test_roll_other_than_seven_opens_building() {
        let mut game = GameState::seeded(13);
        finish_setup(&mut game);

        game.apply_action(GameAction::RollDice).unwrap();
        let roll = game.last_roll.unwrap();
        assert!((2..=12).contains(&roll));
        let expected = if roll == ROBBER_ROLL {
            TurnStage::AwaitingRobber
        } else {
            TurnStage::Building
        };
        assert_eq!(game.phase, GamePhase::Turn(expected));
    }

    #[test]
    fn test_end_turn_passes_to_next_player() {
        let mut game = GameState::seeded(15);
        finish_setup(&mut game);
        game.resolve_roll(6).unwrap();

        let events = game.apply_action(GameAction::EndTurn).unwrap();
        assert_eq!(game.current_player, 1);
        assert_eq!(game.turn_number, 2);
        assert_eq!(game.phase, GamePhase::Turn(TurnStage::AwaitingRoll));
        assert_eq!(
            events,
            vec![GameEvent::TurnTextChanged {
                text: game.prompt()
            }]
        );

        for _ in 0..3 {
            game.resolve_roll(6).unwrap();
            game.apply_action(GameAction::EndTurn).unwrap();
        }
        assert_eq!(game.current_player, 0);
    }

    #[test]
    fn test_bank_trade() {
        let mut game = GameState::seeded(17);
        finish_setup(&mut game);
        game.resolve_roll(6).unwrap();
        game.players[0].resources = ResourceHand::with_amounts(0, 0, 4, 0, 0);

        game.apply_action(GameAction::BankTrade {
            give: Resource::Wood,
            receive: Resource::Ore,
        })
        .unwrap();
        assert_eq!(game.players[0].resources, ResourceHand::with_amounts(0, 0, 0, 1, 0));

        assert_eq!(
            game.apply_action(GameAction::BankTrade {
                give: Resource::Wood,
                receive: Resource::Ore,
            }),
            Err(GameError::InsufficientResources)
        );
        assert_eq!(game.players[0].resources, ResourceHand::with_amounts(0, 0, 0, 1, 0));
    }

    #[test]
    fn test_third_settlement_costs_resources() {
        let mut game = GameState::seeded(19);
        finish_setup(&mut game);
        game.resolve_roll(6).unwrap();

        let target = game
            .board
            .locations()
            .iter()
            .map(|l| l.id)
            .find(|id| {
                !game.board.locations()[*id].has_settlement()
                    && game.board.satisfies_distance_rule(*id)
            })
            .unwrap();

        game.players[0].resources = ResourceHand::new();
        assert_eq!(
            game.apply_action(GameAction::PlaceSettlement(target)),
            Err(GameError::InsufficientResources)
        );

        game.players[0].resources = ResourceHand::with_amounts(1, 1, 1, 0, 1);
        let events = game.apply_action(GameAction::PlaceSettlement(target)).unwrap();
        assert!(game.players[0].resources.is_empty());
        assert_eq!(game.players[0].victory_points(), 3);
        assert!(matches!(events[0], GameEvent::StructurePlaced { player: 0, .. }));
    }

    #[test]
    fn test_announce_reveals_board() {
        let game = GameState::seeded(21);
        let events = game.announce();
        let tiles = events
            .iter()
            .filter(|e| matches!(e, GameEvent::TileRevealed { .. }))
            .count();
        assert_eq!(tiles, 19);
        assert!(matches!(
            events.last(),
            Some(GameEvent::TurnTextChanged { .. })
        ));
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = GameState::seeded(99);
        let b = GameState::seeded(99);
        assert_eq!(a.board.tiles(), b.board.tiles());
    }
}
