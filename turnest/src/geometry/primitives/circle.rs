use crate::geometry::geo_traits::{CollidesWith, DistanceTo};
use crate::geometry::primitives::Edge;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::Rect;

/// Geometric primitive representing a circle
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Point, radius: f32) -> Self {
        debug_assert!(
            radius.is_finite() && radius >= 0.0,
            "invalid circle radius: {radius}"
        );
        debug_assert!(
            center.0.is_finite() && center.1.is_finite(),
            "invalid circle center: {center:?}"
        );

        Self { center, radius }
    }

    pub fn bbox(&self) -> Rect {
        let (r, x, y) = (self.radius, self.center.0, self.center.1);
        Rect {
            x_min: x - r,
            y_min: y - r,
            x_max: x + r,
            y_max: y + r,
        }
    }
}

impl CollidesWith<Point> for Circle {
    fn collides_with(&self, point: &Point) -> bool {
        point.sq_distance_to(&self.center) <= self.radius.powi(2)
    }
}

impl CollidesWith<Edge> for Circle {
    fn collides_with(&self, edge: &Edge) -> bool {
        edge.sq_distance_to(&self.center) <= self.radius.powi(2)
    }
}

impl CollidesWith<Circle> for Circle {
    fn collides_with(&self, other: &Circle) -> bool {
        let sq_d = self.center.sq_distance_to(&other.center);
        sq_d <= (self.radius + other.radius).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_containment() {
        let c = Circle::new(Point(5.0, 5.0), 3.0);
        assert!(c.collides_with(&Point(5.0, 5.0)));
        assert!(c.collides_with(&Point(7.9, 5.0)));
        assert!(!c.collides_with(&Point(8.5, 5.0)));
    }

    #[test]
    fn edge_intersection() {
        let c = Circle::new(Point(0.0, 0.0), 2.0);
        //secant through the center
        assert!(c.collides_with(&Edge::new(Point(-5.0, 0.0), Point(5.0, 0.0))));
        //passes well clear of the circle
        assert!(!c.collides_with(&Edge::new(Point(-5.0, 3.0), Point(5.0, 3.0))));
        //ends before reaching the circle
        assert!(!c.collides_with(&Edge::new(Point(3.0, 0.0), Point(5.0, 0.0))));
    }

    #[test]
    fn circle_overlap() {
        let a = Circle::new(Point(0.0, 0.0), 2.0);
        let b = Circle::new(Point(3.0, 0.0), 1.5);
        let c = Circle::new(Point(10.0, 0.0), 1.0);
        assert!(a.collides_with(&b));
        assert!(!a.collides_with(&c));
    }
}
