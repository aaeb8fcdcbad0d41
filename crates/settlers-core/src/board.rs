//! Game board: hex tiles, buildable locations and the roads between them.
//!
//! This module contains:
//! - Resource and tile kinds
//! - The randomised board generator for the fixed 19-tile layout
//! - The location registry with its adjacency graph
//! - Occupancy queries used by the construction rules

use crate::game::GameError;
use crate::geometry::{hex_corners, inner_radius, Point, HEX_SIZE, PICK_RADIUS, TILE_CENTERS};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::debug;

/// Player identifier (0-3 for a 4-player game)
pub type PlayerId = u8;

/// Index of a hex tile on the board
pub type TileId = usize;

/// Index of a buildable location on the board
pub type LocationId = usize;

/// The five resource kinds a tile can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Wheat,
    Wool,
    Wood,
    Ore,
    Brick,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Wheat,
        Resource::Wool,
        Resource::Wood,
        Resource::Ore,
        Resource::Brick,
    ];

    /// Lowercase display name
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Wheat => "wheat",
            Resource::Wool => "wool",
            Resource::Wood => "wood",
            Resource::Ore => "ore",
            Resource::Brick => "brick",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a tile produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Resource(Resource),
    /// No production, no token; holds the robber at the start
    Desert,
}

/// A single hex tile on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexTile {
    pub id: TileId,
    pub kind: TileKind,
    /// Dice number that triggers production (2-12, None for desert)
    pub token: Option<u8>,
    pub center: Point,
    /// Corners clockwise from the top vertex
    pub corners: [Point; 6],
    pub has_robber: bool,
}

impl HexTile {
    /// Create a producing tile
    pub fn new_resource(id: TileId, center: Point, resource: Resource, token: u8) -> Self {
        Self {
            id,
            kind: TileKind::Resource(resource),
            token: Some(token),
            center,
            corners: hex_corners(center, HEX_SIZE),
            has_robber: false,
        }
    }

    /// Create the desert tile, with the robber on it
    pub fn desert(id: TileId, center: Point) -> Self {
        Self {
            id,
            kind: TileKind::Desert,
            token: None,
            center,
            corners: hex_corners(center, HEX_SIZE),
            has_robber: true,
        }
    }

    /// The resource this tile produces, if any
    pub fn resource(&self) -> Option<Resource> {
        match self.kind {
            TileKind::Resource(r) => Some(r),
            TileKind::Desert => None,
        }
    }
}

/// What stands on a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Occupant {
    #[default]
    Empty,
    Settlement(PlayerId),
    City(PlayerId),
}

impl Occupant {
    /// Get the owner of this building, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            Occupant::Empty => None,
            Occupant::Settlement(p) | Occupant::City(p) => Some(*p),
        }
    }
}

/// A buildable intersection where up to three tiles meet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub point: Point,
    /// Locations one edge away, sorted
    pub neighbors: Vec<LocationId>,
    /// Tiles that have this location as a corner
    pub tiles: Vec<TileId>,
    pub has_road: bool,
    pub occupant: Occupant,
}

impl Location {
    fn new(id: LocationId, point: Point) -> Self {
        Self {
            id,
            point,
            neighbors: Vec::new(),
            tiles: Vec::new(),
            has_road: false,
            occupant: Occupant::Empty,
        }
    }

    /// True for a settlement and for a city
    pub fn has_settlement(&self) -> bool {
        self.occupant != Occupant::Empty
    }

    pub fn is_city(&self) -> bool {
        matches!(self.occupant, Occupant::City(_))
    }
}

/// An edge between two neighbouring locations, smaller id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey(pub LocationId, pub LocationId);

impl EdgeKey {
    pub fn new(a: LocationId, b: LocationId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

/// The complete game board
#[derive(Debug, Clone)]
pub struct Board {
    tiles: Vec<HexTile>,
    locations: Vec<Location>,
    by_point: HashMap<Point, LocationId>,
    roads: HashMap<EdgeKey, PlayerId>,
    robber: TileId,
}

impl Board {
    /// Create the standard layout with randomized kinds, tokens and positions,
    /// drawn from the game's RNG so a seed reproduces the board
    pub fn standard_with_rng<R: Rng>(rng: &mut R) -> Self {
        // 4 wheat, 4 wool, 4 wood, 3 ore, 3 brick
        let mut kinds: Vec<Resource> = [Resource::Wheat, Resource::Wool, Resource::Wood]
            .repeat(4)
            .into_iter()
            .chain([Resource::Ore, Resource::Brick].repeat(3))
            .collect();
        let mut tokens: Vec<u8> = vec![2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];
        let mut centers = TILE_CENTERS.to_vec();

        kinds.shuffle(rng);
        tokens.shuffle(rng);
        centers.shuffle(rng);

        let mut tiles: Vec<HexTile> = kinds
            .iter()
            .zip(tokens.iter())
            .zip(centers.iter())
            .enumerate()
            .map(|(id, ((kind, token), center))| HexTile::new_resource(id, *center, *kind, *token))
            .collect();

        // Desert goes last so it takes the one remaining position
        tiles.push(HexTile::desert(tiles.len(), centers[tiles.len()]));

        Self::with_tiles(tiles)
    }

    /// Build the location registry for a fixed set of tiles.
    ///
    /// Tile ids are reassigned to match their index. The robber starts on the
    /// first tile that claims it, falling back to the desert.
    pub fn with_tiles(mut tiles: Vec<HexTile>) -> Self {
        for (id, tile) in tiles.iter_mut().enumerate() {
            tile.id = id;
        }

        let robber = tiles
            .iter()
            .position(|t| t.has_robber)
            .or_else(|| tiles.iter().position(|t| t.kind == TileKind::Desert))
            .unwrap_or(0);
        for tile in tiles.iter_mut() {
            tile.has_robber = tile.id == robber;
        }

        let mut locations: Vec<Location> = Vec::new();
        let mut by_point: HashMap<Point, LocationId> = HashMap::new();
        let mut neighbor_sets: Vec<BTreeSet<LocationId>> = Vec::new();

        for tile in &tiles {
            let mut ids = [0; 6];
            for (i, corner) in tile.corners.iter().enumerate() {
                let id = *by_point.entry(*corner).or_insert_with(|| {
                    locations.push(Location::new(locations.len(), *corner));
                    neighbor_sets.push(BTreeSet::new());
                    locations.len() - 1
                });
                locations[id].tiles.push(tile.id);
                ids[i] = id;
            }

            // Consecutive corners share a tile edge
            for i in 0..6 {
                let (a, b) = (ids[i], ids[(i + 1) % 6]);
                neighbor_sets[a].insert(b);
                neighbor_sets[b].insert(a);
            }
        }

        for (location, neighbors) in locations.iter_mut().zip(neighbor_sets) {
            location.neighbors = neighbors.into_iter().collect();
        }

        debug!(
            tiles = tiles.len(),
            locations = locations.len(),
            "board topology built"
        );

        Self {
            tiles,
            locations,
            by_point,
            roads: HashMap::new(),
            robber,
        }
    }

    // ==================== Query Methods ====================

    pub fn tiles(&self) -> &[HexTile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&HexTile> {
        self.tiles.get(id)
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id)
    }

    /// Location whose coordinate is exactly this point
    pub fn location_id(&self, point: Point) -> Option<LocationId> {
        self.by_point.get(&point).copied()
    }

    /// Tile currently holding the robber
    pub fn robber_tile(&self) -> TileId {
        self.robber
    }

    /// Nearest location within the pick radius of a click
    pub fn location_at(&self, point: Point) -> Result<LocationId, GameError> {
        let max = (PICK_RADIUS as i64) * (PICK_RADIUS as i64);
        self.locations
            .iter()
            .map(|l| (l.point.distance_squared(&point), l.id))
            .filter(|(d, _)| *d <= max)
            .min()
            .map(|(_, id)| id)
            .ok_or(GameError::NoSuchLocation)
    }

    /// Tile whose inscribed circle contains the click
    pub fn tile_at(&self, point: Point) -> Result<TileId, GameError> {
        let r = inner_radius(HEX_SIZE);
        let max = (r * r) as i64;
        self.tiles
            .iter()
            .map(|t| (t.center.distance_squared(&point), t.id))
            .filter(|(d, _)| *d <= max)
            .min()
            .map(|(_, id)| id)
            .ok_or(GameError::NoSuchTile)
    }

    pub fn are_neighbors(&self, a: LocationId, b: LocationId) -> bool {
        self.location(a).is_some_and(|l| l.neighbors.contains(&b))
    }

    /// Owner of the road between two locations, if one was built
    pub fn road_owner(&self, a: LocationId, b: LocationId) -> Option<PlayerId> {
        self.roads.get(&EdgeKey::new(a, b)).copied()
    }

    /// Number of distinct edges in the adjacency graph
    pub fn edge_count(&self) -> usize {
        self.locations.iter().map(|l| l.neighbors.len()).sum::<usize>() / 2
    }

    /// No neighbouring location carries a settlement or city
    pub fn satisfies_distance_rule(&self, id: LocationId) -> bool {
        self.location(id).is_some_and(|l| {
            l.neighbors
                .iter()
                .all(|n| !self.locations[*n].has_settlement())
        })
    }

    /// Whether the location carries a road or building belonging to `player`
    pub fn touches_own_network(&self, id: LocationId, player: PlayerId) -> bool {
        let Some(location) = self.location(id) else {
            return false;
        };
        if location.occupant.owner() == Some(player) {
            return true;
        }
        location
            .neighbors
            .iter()
            .any(|n| self.road_owner(id, *n) == Some(player))
    }

    /// Whether the location carries any road or building at all
    pub fn touches_any_network(&self, id: LocationId) -> bool {
        self.location(id)
            .is_some_and(|l| l.has_road || l.has_settlement())
    }

    // ==================== Mutation Methods ====================

    /// Set what stands on a location (assumes validation already done)
    pub(crate) fn set_occupant(&mut self, id: LocationId, occupant: Occupant) {
        if let Some(location) = self.locations.get_mut(id) {
            location.occupant = occupant;
        }
    }

    /// Record a road and flag both endpoints
    pub(crate) fn add_road(&mut self, a: LocationId, b: LocationId, player: PlayerId) {
        self.roads.insert(EdgeKey::new(a, b), player);
        for id in [a, b] {
            if let Some(location) = self.locations.get_mut(id) {
                location.has_road = true;
            }
        }
    }

    /// Move the robber, returning the tile it left
    pub(crate) fn move_robber(&mut self, to: TileId) -> TileId {
        let from = self.robber;
        if let Some(tile) = self.tiles.get_mut(from) {
            tile.has_robber = false;
        }
        if let Some(tile) = self.tiles.get_mut(to) {
            tile.has_robber = true;
        }
        self.robber = to;
        from
    }
}
