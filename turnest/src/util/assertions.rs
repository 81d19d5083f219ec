//Various checks to verify correctness of produced layouts
//Used in debug_assert!() blocks and by the test suites

use itertools::Itertools;

use crate::entities::{NestResultSheet, SheetMargins};
use crate::prep::PackerItem;

/// Every placed footprint lies within the sheet minus its edge margins.
pub fn placements_within_bounds(sheet: &NestResultSheet, margins: &SheetMargins) -> bool {
    sheet.placed.iter().all(|p| {
        p.x >= margins.left
            && p.y >= margins.bottom
            && p.x + p.width <= sheet.width - margins.right
            && p.y + p.height <= sheet.height - margins.top
    })
}

/// No two placed bounding footprints overlap in their interiors.
///
/// Only meaningful for rectangle-packed sheets: the raster packer legally
/// interleaves bounding boxes of concave parts.
pub fn footprints_disjoint(sheet: &NestResultSheet) -> bool {
    sheet.placed.iter().tuple_combinations().all(|(a, b)| {
        let separated_x = a.x + a.width <= b.x || b.x + b.width <= a.x;
        let separated_y = a.y + a.height <= b.y || b.y + b.height <= a.y;
        separated_x || separated_y
    })
}

/// Every placement's rotation is in its item's declared legal set.
pub fn rotations_legal(sheet: &NestResultSheet, items: &[PackerItem]) -> bool {
    sheet.placed.iter().all(|p| {
        items
            .iter()
            .find(|it| it.id == p.item_id)
            .is_some_and(|it| it.allowed_rotations.contains(&p.rotation))
    })
}
