use anyhow::Result;
use log::{debug, trace};

use crate::entities::Spacing;
use crate::geometry::Rotation;
use crate::geometry::primitives::Rect;
use crate::packing::{PlacedResult, SheetPacker};
use crate::prep::PackerItem;

/// Free rectangles thinner than this are discarded after a split.
const MIN_FREE_DIM: f32 = 1.0;

/// Guillotine free-rectangle packer treating every part as its rotated
/// bounding rectangle.
///
/// Shape-oblivious: concave or irregular outlines are nested no tighter than
/// their bounding boxes. It is the fast strategy for rectangular and
/// near-rectangular production parts.
///
/// The free list covers the unplaced sheet area with disjoint rectangles.
/// Residuals are never merged back together, which can grow the list on
/// pathological inputs but does not affect correctness.
pub struct RectPacker {
    bin: Rect,
    spacing: Spacing,
    free: Vec<Rect>,
    placed: Vec<(usize, PlacedResult)>,
}

impl RectPacker {
    /// Creates a packer over a usable area of `width`×`height`, with the
    /// given clamp-protection zones (already clipped to the usable area)
    /// carved out of the free space up front.
    pub fn new(
        width: f32,
        height: f32,
        spacing: Spacing,
        clamp_zones: &[Rect],
    ) -> Result<Self> {
        let bin = Rect::try_new(0.0, 0.0, width, height)?;
        let mut packer = RectPacker {
            bin,
            spacing,
            free: vec![bin],
            placed: Vec::new(),
        };
        for zone in clamp_zones {
            packer.split_free_rects(*zone);
        }
        Ok(packer)
    }

    /// Splits every free rectangle intersecting `footprint` into up to four
    /// residual rectangles, discarding degenerate leftovers. Left/right
    /// slivers are limited to the footprint's vertical band, bottom/top
    /// slivers span the free rectangle's full width, so residuals stay
    /// disjoint and the right sliver of a bottom-left placement scores a
    /// perfect height fit for equally tall items (left-to-right fill).
    fn split_free_rects(&mut self, footprint: Rect) {
        let mut next = Vec::with_capacity(self.free.len() + 4);
        for free in self.free.drain(..) {
            if Rect::intersection(free, footprint).is_none() {
                next.push(free);
                continue;
            }
            let band_y_min = f32::max(free.y_min, footprint.y_min);
            let band_y_max = f32::min(free.y_max, footprint.y_max);
            let residuals = [
                //left sliver
                (free.x_min, band_y_min, footprint.x_min, band_y_max),
                //right sliver
                (footprint.x_max, band_y_min, free.x_max, band_y_max),
                //bottom sliver
                (free.x_min, free.y_min, free.x_max, footprint.y_min),
                //top sliver
                (free.x_min, footprint.y_max, free.x_max, free.y_max),
            ];
            for (x_min, y_min, x_max, y_max) in residuals {
                if x_max - x_min > MIN_FREE_DIM && y_max - y_min > MIN_FREE_DIM {
                    next.push(Rect {
                        x_min,
                        y_min,
                        x_max,
                        y_max,
                    });
                }
            }
        }
        self.free = next;
    }

    /// Candidate rotations for the rectangle strategy: 0°, plus 90° when the
    /// item permits quarter turns. 180°/270° footprints duplicate 0°/90° and
    /// are never tried.
    fn candidate_rotations(item: &PackerItem) -> impl Iterator<Item = Rotation> + '_ {
        [Rotation::R0, Rotation::R90]
            .into_iter()
            .filter(|r| match r {
                Rotation::R0 => true,
                _ => item
                    .allowed_rotations
                    .iter()
                    .any(|a| a.is_quarter_turn()),
            })
    }
}

impl SheetPacker for RectPacker {
    fn find_position(&mut self, item: &PackerItem) -> Option<PlacedResult> {
        let mut best: Option<(f32, PlacedResult)> = None;

        for rotation in Self::candidate_rotations(item) {
            let footprint = item.footprint(rotation);
            for free in &self.free {
                //spacing is added only on the sides away from the sheet
                //origin; the sheet edge itself needs no gap
                let sx = if free.x_min <= 0.0 { 0.0 } else { self.spacing.x };
                let sy = if free.y_min <= 0.0 { 0.0 } else { self.spacing.y };
                let needed_w = footprint.width + sx;
                let needed_h = footprint.height + sy;
                if needed_w > free.width() || needed_h > free.height() {
                    continue;
                }
                //best-area-fit: least leftover along the tighter axis wins
                let leftover = f32::min(free.width() - needed_w, free.height() - needed_h);
                if best.as_ref().is_none_or(|(s, _)| leftover < *s) {
                    best = Some((
                        leftover,
                        PlacedResult {
                            x: free.x_min + sx,
                            y: free.y_min + sy,
                            rotation,
                            extents: footprint,
                        },
                    ));
                }
            }
        }

        trace!(
            "[RECT] item {}: {} across {} free rects",
            item.id,
            if best.is_some() { "fit" } else { "no fit" },
            self.free.len()
        );
        best.map(|(_, placement)| placement)
    }

    fn place_item(&mut self, item: &PackerItem, placement: &PlacedResult) {
        let footprint = Rect {
            x_min: placement.x,
            y_min: placement.y,
            x_max: placement.x + placement.extents.width,
            y_max: placement.y + placement.extents.height,
        };
        assert!(
            footprint.x_min >= self.bin.x_min
                && footprint.y_min >= self.bin.y_min
                && footprint.x_max <= self.bin.x_max
                && footprint.y_max <= self.bin.y_max,
            "placement {footprint:?} outside sheet {:?}",
            self.bin
        );

        self.split_free_rects(footprint);
        self.placed.push((item.id, *placement));

        debug!(
            "[RECT] placed item {} at ({:.1}, {:.1}) rot {}°, {} free rects",
            item.id,
            placement.x,
            placement.y,
            placement.rotation.degrees(),
            self.free.len()
        );
    }

    fn placed_items(&self) -> &[(usize, PlacedResult)] {
        &self.placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Extents;

    fn item(id: usize, w: f32, h: f32, rotations: Vec<Rotation>) -> PackerItem {
        PackerItem {
            id,
            part_id: id,
            extents: Extents {
                width: w,
                height: h,
                ox: 0.0,
                oy: 0.0,
            },
            allowed_rotations: rotations,
            preferred_rotation: None,
            area: w * h,
            aspect: w / h,
            has_common_line: false,
        }
    }

    #[test]
    fn fills_left_to_right() {
        let mut packer =
            RectPacker::new(1000.0, 500.0, Spacing { x: 0.0, y: 0.0 }, &[]).unwrap();
        let a = item(0, 300.0, 200.0, vec![Rotation::R0]);
        let b = item(1, 300.0, 200.0, vec![Rotation::R0]);

        let pa = packer.find_position(&a).unwrap();
        assert_eq!((pa.x, pa.y), (0.0, 0.0));
        packer.place_item(&a, &pa);

        let pb = packer.find_position(&b).unwrap();
        assert_eq!((pb.x, pb.y), (300.0, 0.0));
        packer.place_item(&b, &pb);
    }

    #[test]
    fn oversized_item_returns_none() {
        let mut packer =
            RectPacker::new(500.0, 500.0, Spacing { x: 0.0, y: 0.0 }, &[]).unwrap();
        let big = item(0, 600.0, 600.0, vec![Rotation::R0]);
        assert!(packer.find_position(&big).is_none());
    }

    #[test]
    fn quarter_turn_rescues_narrow_sheet() {
        let mut packer =
            RectPacker::new(100.0, 400.0, Spacing { x: 0.0, y: 0.0 }, &[]).unwrap();
        //300x80 does not fit upright, but fits rotated
        let long = item(0, 300.0, 80.0, vec![Rotation::R0, Rotation::R90, Rotation::R270]);
        let p = packer.find_position(&long).unwrap();
        assert_eq!(p.rotation, Rotation::R90);
        assert_eq!((p.extents.width, p.extents.height), (80.0, 300.0));
    }

    #[test]
    fn spacing_only_away_from_origin() {
        let mut packer =
            RectPacker::new(1000.0, 500.0, Spacing { x: 10.0, y: 10.0 }, &[]).unwrap();
        let a = item(0, 300.0, 200.0, vec![Rotation::R0]);
        let b = item(1, 300.0, 200.0, vec![Rotation::R0]);

        //first placement touches the sheet origin, no spacing added there
        let pa = packer.find_position(&a).unwrap();
        assert_eq!((pa.x, pa.y), (0.0, 0.0));
        packer.place_item(&a, &pa);

        //second placement sits one spacing gap to the right
        let pb = packer.find_position(&b).unwrap();
        assert_eq!((pb.x, pb.y), (310.0, 0.0));
    }

    #[test]
    fn clamp_zone_is_never_used() {
        let zone = Rect::try_new(480.0, 0.0, 520.0, 100.0).unwrap();
        let mut packer =
            RectPacker::new(1000.0, 100.0, Spacing { x: 0.0, y: 0.0 }, &[zone]).unwrap();
        //a 200-wide item cannot straddle the clamp band
        let a = item(0, 200.0, 100.0, vec![Rotation::R0]);
        let pa = packer.find_position(&a).unwrap();
        packer.place_item(&a, &pa);
        let placed = Rect {
            x_min: pa.x,
            y_min: pa.y,
            x_max: pa.x + 200.0,
            y_max: pa.y + 100.0,
        };
        assert!(Rect::intersection(placed, zone).is_none());
    }
}
