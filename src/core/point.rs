//! Point and grid coordinate types.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// World coordinates (meters, f32).
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// X coordinate in meters.
    pub x: f32,
    /// Y coordinate in meters.
    pub y: f32,
}

impl WorldPoint {
    /// Create a new world point.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Origin.
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &WorldPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance (avoids the sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Rotate this point around the origin by `angle` radians.
    #[inline]
    pub fn rotate(&self, angle: f32) -> WorldPoint {
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        WorldPoint::new(
            self.x * cos_a - self.y * sin_a,
            self.x * sin_a + self.y * cos_a,
        )
    }
}

impl Add for WorldPoint {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        WorldPoint::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for WorldPoint {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        WorldPoint::new(self.x - other.x, self.y - other.y)
    }
}

/// Grid coordinates (integer cell indices).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl GridCoord {
    /// Create a new grid coordinate.
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The 8 neighbors with their step cost in cells (1 orthogonal, √2 diagonal).
    #[inline]
    pub fn neighbors_8(&self) -> [(GridCoord, f32); 8] {
        const DIAG: f32 = std::f32::consts::SQRT_2;
        [
            (GridCoord::new(self.x, self.y + 1), 1.0),
            (GridCoord::new(self.x + 1, self.y), 1.0),
            (GridCoord::new(self.x, self.y - 1), 1.0),
            (GridCoord::new(self.x - 1, self.y), 1.0),
            (GridCoord::new(self.x + 1, self.y + 1), DIAG),
            (GridCoord::new(self.x + 1, self.y - 1), DIAG),
            (GridCoord::new(self.x - 1, self.y - 1), DIAG),
            (GridCoord::new(self.x - 1, self.y + 1), DIAG),
        ]
    }
}
