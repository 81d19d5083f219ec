use std::f32::consts::TAU;

use crate::geometry::primitives::Point;
use crate::geometry::primitives::Rect;

/// Circular arc, swept counter-clockwise from `start_angle` to `end_angle`.
/// Angles are in radians, measured from the positive x-axis.
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Arc {
    pub center: Point,
    pub radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
}

impl Arc {
    pub fn new(center: Point, radius: f32, start_angle: f32, end_angle: f32) -> Self {
        debug_assert!(
            radius.is_finite() && radius >= 0.0,
            "invalid arc radius: {radius}"
        );
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// The counter-clockwise sweep from start to end, normalized to (0, 2π].
    pub fn sweep(&self) -> f32 {
        let sweep = (self.end_angle - self.start_angle).rem_euclid(TAU);
        if sweep == 0.0 { TAU } else { sweep }
    }

    /// True iff `angle` lies within the arc's angular span.
    pub fn contains_angle(&self, angle: f32) -> bool {
        let rel = (angle - self.start_angle).rem_euclid(TAU);
        rel <= self.sweep()
    }

    pub fn start_point(&self) -> Point {
        self.point_at(self.start_angle)
    }

    pub fn end_point(&self) -> Point {
        self.point_at(self.end_angle)
    }

    fn point_at(&self, angle: f32) -> Point {
        Point(
            self.center.0 + self.radius * angle.cos(),
            self.center.1 + self.radius * angle.sin(),
        )
    }

    /// Tight bounding box: the arc endpoints, plus every axis extreme of the
    /// full circle that falls within the angular span.
    pub fn bbox(&self) -> Rect {
        let (s, e) = (self.start_point(), self.end_point());
        let mut x_min = f32::min(s.0, e.0);
        let mut y_min = f32::min(s.1, e.1);
        let mut x_max = f32::max(s.0, e.0);
        let mut y_max = f32::max(s.1, e.1);

        let cardinals = [
            (0.0, Point(self.center.0 + self.radius, self.center.1)),
            (0.25 * TAU, Point(self.center.0, self.center.1 + self.radius)),
            (0.5 * TAU, Point(self.center.0 - self.radius, self.center.1)),
            (0.75 * TAU, Point(self.center.0, self.center.1 - self.radius)),
        ];
        for (angle, p) in cardinals {
            if self.contains_angle(angle) {
                x_min = f32::min(x_min, p.0);
                y_min = f32::min(y_min, p.1);
                x_max = f32::max(x_max, p.0);
                y_max = f32::max(y_max, p.1);
            }
        }

        Rect {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }
}
