//! Pixel-space geometry for the game board.
//!
//! The board lives in screen coordinates: every hex tile has a fixed center and
//! its six corners are derived from that center. Corners are rounded to whole
//! pixels so that the corners shared by neighbouring tiles compare equal, which
//! is what lets the board deduplicate them into buildable locations.

use serde::{Deserialize, Serialize};

/// Size parameter of a hex tile, in pixels. The circumradius is half of this.
pub const HEX_SIZE: f64 = 120.0;

/// Clicks further than this from every location do not select one.
pub const PICK_RADIUS: i32 = 15;

/// The 19 tile centers in a 3-4-5-4-3 layout, row by row.
pub const TILE_CENTERS: [Point; 19] = [
    Point::new(321, 100),
    Point::new(425, 100),
    Point::new(529, 100),
    Point::new(269, 190),
    Point::new(373, 190),
    Point::new(477, 190),
    Point::new(581, 190),
    Point::new(217, 280),
    Point::new(321, 280),
    Point::new(425, 280),
    Point::new(529, 280),
    Point::new(633, 280),
    Point::new(269, 370),
    Point::new(373, 370),
    Point::new(477, 370),
    Point::new(581, 370),
    Point::new(321, 460),
    Point::new(425, 460),
    Point::new(529, 460),
];

/// An integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to another point
    pub fn distance_squared(&self, other: &Point) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Corners of a pointy-top hexagon, clockwise from the top vertex.
///
/// With `a = size / 4` and `b = √3·a` the corners are
/// `(x, y-2a) (x+b, y-a) (x+b, y+a) (x, y+2a) (x-b, y+a) (x-b, y-a)`,
/// each rounded to the nearest pixel.
pub fn hex_corners(center: Point, size: f64) -> [Point; 6] {
    let a = size / 4.0;
    let b = 3.0_f64.sqrt() * a;
    let (x, y) = (center.x as f64, center.y as f64);

    [
        (x, y - 2.0 * a),
        (x + b, y - a),
        (x + b, y + a),
        (x, y + 2.0 * a),
        (x - b, y + a),
        (x - b, y - a),
    ]
    .map(|(cx, cy)| Point::new(cx.round() as i32, cy.round() as i32))
}

/// Radius of the circle inscribed in a hex of the given size.
pub fn inner_radius(size: f64) -> f64 {
    3.0_f64.sqrt() * size / 4.0
}

/// Axis-aligned rectangle, used for on-screen controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the point lies inside (left/top edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}
