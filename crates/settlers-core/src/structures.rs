//! Settlements, cities and roads owned by players.

use crate::board::{LocationId, TileId};
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Where a settlement or city stands and which tiles feed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub location: LocationId,
    pub position: Point,
    /// The 1-3 tiles that have this position as a corner
    pub surrounding_tiles: Vec<TileId>,
}

/// The two endpoints of a road
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadSpan {
    pub ends: [LocationId; 2],
    pub points: [Point; 2],
}

/// Anything a player can build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Structure {
    Settlement(Site),
    City(Site),
    Road(RoadSpan),
}

impl Structure {
    pub fn victory_points(&self) -> u32 {
        match self {
            Structure::Settlement(_) => 1,
            Structure::City(_) => 2,
            Structure::Road(_) => 0,
        }
    }

    /// Resources produced per matching tile
    pub fn resource_multiplier(&self) -> u32 {
        match self {
            Structure::Settlement(_) => 1,
            Structure::City(_) => 2,
            Structure::Road(_) => 0,
        }
    }

    /// The site of a settlement or city
    pub fn site(&self) -> Option<&Site> {
        match self {
            Structure::Settlement(site) | Structure::City(site) => Some(site),
            Structure::Road(_) => None,
        }
    }

    /// Turn a settlement into a city in place. Returns false for anything else.
    pub fn upgrade(&mut self) -> bool {
        match self {
            Structure::Settlement(site) => {
                *self = Structure::City(site.clone());
                true
            }
            _ => false,
        }
    }
}
