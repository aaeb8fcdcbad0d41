//! Settlers - a hex-tile settlement game engine
//!
//! This crate provides the core game logic, including:
//! - Pixel-space hex geometry and a generated 19-tile board
//! - Placement rules for settlements, roads and cities
//! - Player hands, build costs and bank trades
//! - Dice, resource income and the robber
//! - A turn sequencer driven one pointer click at a time
//!
//! # Architecture
//!
//! The engine does no I/O. Clicks come in through an [`InputSource`] and every
//! visible change goes out as a [`GameEvent`] to a [`RenderSink`], so the same
//! game runs behind a terminal, a window or a test script.
//!
//! # Modules
//!
//! - [`geometry`]: Points, hex corners and button rectangles
//! - [`board`]: Tiles, locations, adjacency and the robber
//! - [`structures`]: Settlements, cities and roads
//! - [`player`]: Player state, resources and build costs
//! - [`rules`]: Placement validation
//! - [`dice`]: Dice strategies and resource distribution
//! - [`game`]: Game state machine
//! - [`input`]: Click interpretation and the input loop

pub mod actions;
pub mod board;
pub mod config;
pub mod dice;
pub mod game;
pub mod geometry;
pub mod input;
pub mod player;
pub mod rules;
pub mod structures;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent, NullSink, RenderSink};
pub use board::{Board, HexTile, Location, LocationId, Occupant, PlayerId, Resource, TileId, TileKind};
pub use config::GameConfig;
pub use dice::{DiceMode, Income};
pub use game::{GameError, GamePhase, GameState, SetupPlacing, TurnStage, Violation};
pub use geometry::{Point, Rect};
pub use input::{run, Button, Controller, Flow, InputEvent, InputSource, ScriptedInput};
pub use player::{Player, PlayerColor, ResourceHand};
pub use rules::RoadRule;
pub use structures::{RoadSpan, Site, Structure};
