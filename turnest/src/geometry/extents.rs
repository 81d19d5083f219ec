use crate::geometry::Rotation;
use crate::geometry::primitives::Point;

/// Axis-aligned bounding footprint of a rotated shape.
///
/// `(ox, oy)` is the offset needed to shift the rotated shape so its minimum
/// corner sits at the local origin: a point `p` of the rotated shape maps to
/// `p + (ox, oy)` in footprint coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extents {
    pub width: f32,
    pub height: f32,
    pub ox: f32,
    pub oy: f32,
}

impl Extents {
    /// Bounding extents of a point cloud. `None` for an empty iterator.
    pub fn of_points(points: impl IntoIterator<Item = Point>) -> Option<Extents> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut x_min, mut y_min, mut x_max, mut y_max) = (first.0, first.1, first.0, first.1);
        for Point(x, y) in points {
            x_min = f32::min(x_min, x);
            y_min = f32::min(y_min, y);
            x_max = f32::max(x_max, x);
            y_max = f32::max(y_max, y);
        }
        Some(Extents {
            width: x_max - x_min,
            height: y_max - y_min,
            ox: -x_min,
            oy: -y_min,
        })
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Extents of this footprint rotated by a further quarter-turn multiple,
    /// staying within the bounding-rectangle abstraction. Exact: derived from
    /// the corner mapping of the box `[-ox, w-ox] × [-oy, h-oy]`.
    pub fn rotated_quarter(&self, rotation: Rotation) -> Extents {
        let Extents {
            width: w,
            height: h,
            ox,
            oy,
        } = *self;
        match rotation {
            Rotation::R0 => *self,
            Rotation::R90 => Extents {
                width: h,
                height: w,
                ox: h - oy,
                oy: ox,
            },
            Rotation::R180 => Extents {
                width: w,
                height: h,
                ox: w - ox,
                oy: h - oy,
            },
            Rotation::R270 => Extents {
                width: h,
                height: w,
                ox: oy,
                oy: w - ox,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_points_offsets_to_origin() {
        let e = Extents::of_points([Point(-2.0, 1.0), Point(3.0, 4.0)]).unwrap();
        assert_eq!(e.width, 5.0);
        assert_eq!(e.height, 3.0);
        assert_eq!(e.ox, 2.0);
        assert_eq!(e.oy, -1.0);
    }

    #[test]
    fn quarter_rotations_cycle() {
        let e = Extents {
            width: 30.0,
            height: 20.0,
            ox: 0.0,
            oy: 0.0,
        };
        let r90 = e.rotated_quarter(Rotation::R90);
        assert_eq!((r90.width, r90.height), (20.0, 30.0));
        assert_eq!((r90.ox, r90.oy), (20.0, 0.0));

        let r180 = e.rotated_quarter(Rotation::R180);
        assert_eq!((r180.width, r180.height), (30.0, 20.0));
        assert_eq!((r180.ox, r180.oy), (30.0, 20.0));
    }
}
