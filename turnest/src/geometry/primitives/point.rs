use std::hash::{Hash, Hasher};

use crate::geometry::Rotation;
use crate::geometry::geo_traits::DistanceTo;

/// Geometric primitive representing a point
#[derive(Debug, Clone, PartialEq, Copy)]
pub struct Point(pub f32, pub f32);

impl Point {
    pub fn x(&self) -> f32 {
        self.0
    }

    pub fn y(&self) -> f32 {
        self.1
    }

    /// Rotates the point around the origin by an arbitrary angle in radians.
    pub fn rotated(self, angle: f32) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point(self.0 * cos - self.1 * sin, self.0 * sin + self.1 * cos)
    }

    /// Rotates the point around the origin by a quarter-turn multiple.
    /// Exact: no trigonometry is involved, so quarter turns do not accumulate
    /// floating point error.
    pub fn rotated_quarter(self, rotation: Rotation) -> Point {
        let Point(x, y) = self;
        match rotation {
            Rotation::R0 => Point(x, y),
            Rotation::R90 => Point(-y, x),
            Rotation::R180 => Point(-x, -y),
            Rotation::R270 => Point(y, -x),
        }
    }
}

impl DistanceTo<Point> for Point {
    fn distance_to(&self, other: &Point) -> f32 {
        self.sq_distance_to(other).sqrt()
    }

    fn sq_distance_to(&self, other: &Point) -> f32 {
        (self.0 - other.0).powi(2) + (self.1 - other.1).powi(2)
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
        self.1.to_bits().hash(state);
    }
}

impl From<Point> for (f32, f32) {
    fn from(p: Point) -> Self {
        (p.0, p.1)
    }
}

impl From<(f32, f32)> for Point {
    fn from(p: (f32, f32)) -> Self {
        Point(p.0, p.1)
    }
}
