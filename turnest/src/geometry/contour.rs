use crate::geometry::geo_traits::CollidesWith;
use crate::geometry::primitives::{Arc, Circle, Edge, Point, Rect};
use crate::util::FPA;

/// A geometric entity of a part contour, in the part's local coordinate frame
/// (origin at the bounding-box minimum corner).
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Line(Edge),
    /// Open or closed chain of line segments. A closed polyline repeats its
    /// first point at the end.
    Polyline(Vec<Point>),
    Circle(Circle),
    Arc(Arc),
}

impl Entity {
    pub fn bbox(&self) -> Option<Rect> {
        match self {
            Entity::Line(e) => Some(Rect {
                x_min: e.x_min(),
                y_min: e.y_min(),
                x_max: e.x_max(),
                y_max: e.y_max(),
            }),
            Entity::Polyline(pts) => {
                let first = pts.first()?;
                let mut bbox = Rect {
                    x_min: first.0,
                    y_min: first.1,
                    x_max: first.0,
                    y_max: first.1,
                };
                for p in &pts[1..] {
                    bbox.x_min = f32::min(bbox.x_min, p.0);
                    bbox.y_min = f32::min(bbox.y_min, p.1);
                    bbox.x_max = f32::max(bbox.x_max, p.0);
                    bbox.y_max = f32::max(bbox.y_max, p.1);
                }
                Some(bbox)
            }
            Entity::Circle(c) => Some(c.bbox()),
            Entity::Arc(a) => Some(a.bbox()),
        }
    }
}

/// Ray-casting point-in-contour test generalized to mixed entity types.
///
/// Casts a horizontal ray from `point` in the +x direction and counts entity
/// crossings; the point is inside iff the count is odd. Line and polyline
/// crossings are counted segment-wise with a vertex guard; circle and arc
/// crossings are solved analytically.
///
/// This is the single source of truth for "does this point lie inside the
/// part's material": mask rasterization and nesting-intersection tests all
/// route through it. A contour with no entities contains nothing.
pub fn point_inside_contour(point: Point, entities: &[Entity], bbox: Rect) -> bool {
    //cheap bounding-box rejection first
    if !bbox.collides_with(&point) {
        return false;
    }

    let mut n_crossings: u32 = 0;
    for entity in entities {
        match entity {
            Entity::Line(edge) => {
                if ray_crosses_segment(point, edge.start, edge.end) {
                    n_crossings += 1;
                }
            }
            Entity::Polyline(pts) => {
                for w in pts.windows(2) {
                    if w[0] != w[1] && ray_crosses_segment(point, w[0], w[1]) {
                        n_crossings += 1;
                    }
                }
            }
            Entity::Circle(circle) => {
                n_crossings += ray_circle_crossings(point, circle.center, circle.radius, None);
            }
            Entity::Arc(arc) => {
                n_crossings += ray_circle_crossings(point, arc.center, arc.radius, Some(arc));
            }
        }
    }

    n_crossings % 2 == 1
}

/// Counts whether the horizontal +x ray from `p` crosses segment `s`-`e`.
///
/// When the ray passes through (or dangerously close to) a vertex, the
/// crossing is only counted if the segment extends below the ray, so a
/// vertex shared by two segments is never double counted.
fn ray_crosses_segment(p: Point, s: Point, e: Point) -> bool {
    if (FPA(s.1) == FPA(p.1) && s.0 > p.0) || (FPA(e.1) == FPA(p.1) && e.0 > p.0) {
        return s.1 < p.1 || e.1 < p.1;
    }
    if (s.1 > p.1) == (e.1 > p.1) {
        //segment does not span the ray's y-coordinate
        return false;
    }
    let t = (p.1 - s.1) / (e.1 - s.1);
    let x = s.0 + t * (e.0 - s.0);
    x > p.0
}

/// Counts the crossings of the horizontal +x ray from `p` with a circle of
/// the given center and radius, solved analytically: `|dy| ≤ r` yields up to
/// two intersection x-coordinates, each counted if it lies right of `p`.
/// For arcs, an intersection additionally has to fall within the angular span.
fn ray_circle_crossings(p: Point, center: Point, radius: f32, arc: Option<&Arc>) -> u32 {
    let dy = p.1 - center.1;
    if dy.abs() > radius {
        return 0;
    }
    let dx = (radius.powi(2) - dy.powi(2)).sqrt();

    let mut crossings = 0;
    for ix in [center.0 - dx, center.0 + dx] {
        if ix <= p.0 {
            continue;
        }
        match arc {
            None => crossings += 1,
            Some(arc) => {
                let angle = f32::atan2(dy, ix - center.0);
                if arc.contains_angle(angle) {
                    crossings += 1;
                }
            }
        }
    }
    crossings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn unit_square() -> (Vec<Entity>, Rect) {
        let pts = vec![
            Point(0.0, 0.0),
            Point(10.0, 0.0),
            Point(10.0, 10.0),
            Point(0.0, 10.0),
            Point(0.0, 0.0),
        ];
        (
            vec![Entity::Polyline(pts)],
            Rect::try_new(0.0, 0.0, 10.0, 10.0).unwrap(),
        )
    }

    #[test]
    fn square_contains_center_but_not_exterior() {
        let (entities, bbox) = unit_square();
        assert!(point_inside_contour(Point(5.0, 5.0), &entities, bbox));
        assert!(!point_inside_contour(Point(15.0, 5.0), &entities, bbox));
        assert!(!point_inside_contour(Point(-1.0, 5.0), &entities, bbox));
    }

    #[test]
    fn square_with_circular_hole() {
        let (mut entities, bbox) = unit_square();
        entities.push(Entity::Circle(Circle::new(Point(5.0, 5.0), 2.0)));

        //inside the hole: crossed square once and circle once -> even -> outside material
        assert!(!point_inside_contour(Point(5.0, 5.0), &entities, bbox));
        //between hole and outline
        assert!(point_inside_contour(Point(5.0, 8.5), &entities, bbox));
    }

    #[test]
    fn circle_contour() {
        let circle = Circle::new(Point(5.0, 5.0), 5.0);
        let bbox = circle.bbox();
        let entities = vec![Entity::Circle(circle)];
        assert!(point_inside_contour(Point(5.0, 5.0), &entities, bbox));
        assert!(point_inside_contour(Point(8.0, 5.0), &entities, bbox));
        assert!(!point_inside_contour(Point(9.5, 9.5), &entities, bbox));
    }

    #[test]
    fn arc_closed_with_chord() {
        //upper half-disc: arc from 0 to π closed by a chord along the x-axis
        let arc = Arc::new(Point(5.0, 5.0), 5.0, 0.0, PI);
        let chord = Edge::new(Point(0.0, 5.0), Point(10.0, 5.0));
        let entities = vec![Entity::Arc(arc), Entity::Line(chord)];
        let bbox = Rect::try_new(0.0, 5.0, 10.0, 10.0).unwrap();

        assert!(point_inside_contour(Point(5.0, 7.0), &entities, bbox));
        assert!(!point_inside_contour(Point(1.0, 9.0), &entities, bbox));
    }

    #[test]
    fn empty_contour_contains_nothing() {
        let bbox = Rect::try_new(0.0, 0.0, 10.0, 10.0).unwrap();
        assert!(!point_inside_contour(Point(5.0, 5.0), &[], bbox));
    }
}
