use anyhow::{Result, ensure};
use ndarray::Array2;

use crate::geometry::primitives::Rect;
use crate::packing::raster::RasterMask;

/// Occupancy grid covering one sheet's usable area at a fixed resolution.
/// Cell value 1 = occupied.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    /// Indexed `[row, col]` = `[y, x]`.
    cells: Array2<u8>,
    pub n_cols: usize,
    pub n_rows: usize,
    pub resolution: f32,
}

impl OccupancyGrid {
    pub fn new(width: f32, height: f32, resolution: f32) -> Result<Self> {
        ensure!(
            width > 0.0 && height > 0.0 && resolution > 0.0,
            "invalid occupancy grid dimensions: {width}x{height} @ {resolution}"
        );
        let n_cols = (width / resolution).ceil() as usize;
        let n_rows = (height / resolution).ceil() as usize;
        Ok(OccupancyGrid {
            cells: Array2::zeros((n_rows, n_cols)),
            n_cols,
            n_rows,
            resolution,
        })
    }

    /// Marks every cell touching `zone` (in usable-area coordinates) as
    /// permanently occupied. Used to seed clamp-protection zones.
    pub fn mark_zone(&mut self, zone: Rect) {
        let col_min = (zone.x_min / self.resolution).floor().max(0.0) as usize;
        let row_min = (zone.y_min / self.resolution).floor().max(0.0) as usize;
        let col_max = usize::min((zone.x_max / self.resolution).ceil() as usize, self.n_cols);
        let row_max = usize::min((zone.y_max / self.resolution).ceil() as usize, self.n_rows);
        for row in row_min..row_max {
            for col in col_min..col_max {
                self.cells[[row, col]] = 1;
            }
        }
    }

    /// True iff placing `mask` with its minimum corner at `(col, row)` would
    /// overlap an occupied cell. Out-of-bounds placements collide.
    ///
    /// The mask's probe cells are checked first to short-circuit the common
    /// case before the full row-by-row scan.
    pub fn collides(&self, col: usize, row: usize, mask: &RasterMask) -> bool {
        if col + mask.n_cols > self.n_cols || row + mask.n_rows > self.n_rows {
            return true;
        }
        for &(pr, pc) in &mask.probes {
            if self.cells[[row + pr, col + pc]] != 0 {
                return true;
            }
        }
        for mr in 0..mask.n_rows {
            for mc in 0..mask.n_cols {
                if mask.cells[[mr, mc]] != 0 && self.cells[[row + mr, col + mc]] != 0 {
                    return true;
                }
            }
        }
        false
    }

    /// ORs `mask` into the grid at `(col, row)`. Placements are permanent.
    pub fn write_mask(&mut self, col: usize, row: usize, mask: &RasterMask) {
        debug_assert!(
            col + mask.n_cols <= self.n_cols && row + mask.n_rows <= self.n_rows,
            "mask write out of bounds"
        );
        for mr in 0..mask.n_rows {
            for mc in 0..mask.n_cols {
                if mask.cells[[mr, mc]] != 0 {
                    self.cells[[row + mr, col + mc]] = 1;
                }
            }
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    pub fn cell_count(&self) -> usize {
        self.n_rows * self.n_cols
    }
}
