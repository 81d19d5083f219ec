//! The two interchangeable sheet-packing strategies and their shared
//! interface.

pub mod raster;
pub mod rect_packer;

#[doc(inline)]
pub use raster::RasterPacker;
#[doc(inline)]
pub use rect_packer::RectPacker;

use crate::geometry::{Extents, Rotation};
use crate::prep::PackerItem;

/// Output of a placement search, in usable-area coordinates (sheet minus
/// edge margins). Never mutated after creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedResult {
    /// Minimum corner of the rotated bounding footprint.
    pub x: f32,
    pub y: f32,
    pub rotation: Rotation,
    /// The rotated footprint.
    pub extents: Extents,
}

/// A packing strategy filling one sheet. Instantiated fresh per sheet;
/// placements are permanent for the instance's lifetime.
///
/// Not safe for concurrent use: `find_position` and `place_item` mutate and
/// read the same single-owner state, and a [`PlacedResult`] must only ever be
/// fed back to the instance that produced it.
pub trait SheetPacker {
    /// Searches for a position for `item`. Returns `None` when no legal
    /// rotation fits anywhere in the remaining free space.
    fn find_position(&mut self, item: &PackerItem) -> Option<PlacedResult>;

    /// Commits a placement previously obtained from
    /// [`find_position`](SheetPacker::find_position) on this same instance.
    fn place_item(&mut self, item: &PackerItem, placement: &PlacedResult);

    /// All placements committed to this sheet so far, in order.
    fn placed_items(&self) -> &[(usize, PlacedResult)];
}
