//! Shape-aware raster packing: part contours are rasterized into bitmap
//! masks and placed onto a sheet-sized occupancy grid by an exhaustive
//! leftmost-first scan.

mod grid;
mod mask;
mod packer;

#[doc(inline)]
pub use grid::OccupancyGrid;
#[doc(inline)]
pub use mask::{MaskCache, RasterMask};
#[doc(inline)]
pub use packer::RasterPacker;
