//! Construction rules for settlements, cities and roads.
//!
//! Each operation validates against the board and the player's hand, and only
//! mutates once every check has passed. A rejected placement leaves both the
//! board and the hand exactly as they were.

use crate::board::{Board, LocationId, Occupant};
use crate::game::{GameError, Violation};
use crate::player::{costs, Player};
use crate::structures::{RoadSpan, Site, Structure};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How strictly a road must connect to existing structures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadRule {
    /// An endpoint must carry the player's own road or building
    #[default]
    Strict,
    /// Any road or building at an endpoint will do, whoever owns it
    Lenient,
}

fn location_exists(board: &Board, id: LocationId) -> Result<(), GameError> {
    board
        .location(id)
        .map(|_| ())
        .ok_or(GameError::NoSuchLocation)
}

/// Place a settlement at `location` for `player`.
///
/// The distance rule always applies. Outside setup the settlement costs one
/// each of wheat, brick, wood and wool.
pub fn try_place_settlement(
    board: &mut Board,
    location: LocationId,
    player: &mut Player,
    is_setup: bool,
) -> Result<Structure, GameError> {
    location_exists(board, location)?;

    let spot = &board.locations()[location];
    if spot.has_settlement() {
        return Err(GameError::InvalidPlacement(Violation::Occupied));
    }
    if !board.satisfies_distance_rule(location) {
        return Err(GameError::InvalidPlacement(Violation::DistanceRule));
    }

    if !is_setup {
        player.spend(&costs::settlement())?;
    }

    let site = Site {
        location,
        position: spot.point,
        surrounding_tiles: spot.tiles.clone(),
    };
    let structure = Structure::Settlement(site);

    board.set_occupant(location, Occupant::Settlement(player.id));
    player.structures.push(structure.clone());

    debug!(player = player.id, location, is_setup, "settlement placed");
    Ok(structure)
}

/// Place a road between two neighbouring locations.
///
/// Outside setup the road costs one brick and one wood.
pub fn try_place_road(
    board: &mut Board,
    ends: [LocationId; 2],
    player: &mut Player,
    is_setup: bool,
    rule: RoadRule,
) -> Result<Structure, GameError> {
    let [a, b] = ends;
    location_exists(board, a)?;
    location_exists(board, b)?;

    if !board.are_neighbors(a, b) {
        return Err(GameError::InvalidPlacement(Violation::NotAdjacent));
    }
    if board.road_owner(a, b).is_some() {
        return Err(GameError::InvalidPlacement(Violation::RoadExists));
    }

    let connected = ends.iter().any(|id| match rule {
        RoadRule::Strict => board.touches_own_network(*id, player.id),
        RoadRule::Lenient => board.touches_any_network(*id),
    });
    if !connected {
        return Err(GameError::InvalidPlacement(Violation::NotConnected));
    }

    if !is_setup {
        player.spend(&costs::road())?;
    }

    let points = ends.map(|id| board.locations()[id].point);
    let structure = Structure::Road(RoadSpan { ends, points });

    board.add_road(a, b, player.id);
    player.structures.push(structure.clone());

    debug!(player = player.id, from = a, to = b, is_setup, "road placed");
    Ok(structure)
}

/// Upgrade one of the player's settlements to a city, for 2 wheat and 3 ore.
pub fn try_place_city(
    board: &mut Board,
    location: LocationId,
    player: &mut Player,
) -> Result<Structure, GameError> {
    location_exists(board, location)?;

    if board.locations()[location].occupant != Occupant::Settlement(player.id) {
        return Err(GameError::InvalidPlacement(Violation::NotYourSettlement));
    }

    player.spend(&costs::city())?;

    // The occupant is only ever set together with the player's structure
    let Some(structure) = player.structure_at_mut(location) else {
        return Err(GameError::InvalidPlacement(Violation::NotYourSettlement));
    };
    structure.upgrade();
    let structure = structure.clone();

    board.set_occupant(location, Occupant::City(player.id));

    debug!(player = player.id, location, "settlement upgraded to city");
    Ok(structure)
}
