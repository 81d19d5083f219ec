use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use log::{debug, trace};

use crate::entities::{PartCatalog, ToolCatalog};
use crate::geometry::Rotation;
use crate::geometry::primitives::Rect;
use crate::nest::CancelToken;
use crate::packing::raster::{MaskCache, OccupancyGrid, RasterMask};
use crate::packing::{PlacedResult, SheetPacker};
use crate::prep::PackerItem;

/// The placement scan checks for cancellation every this many columns. This
/// is the engine's only suspension point: between checks the search runs
/// uninterruptibly.
pub const YIELD_INTERVAL: usize = 50;

/// Pixel-exact packer: rasterizes each part's true contour into a dilated
/// bitmap mask and scans the sheet's occupancy grid for the leftmost (then
/// lowest) position it fits.
///
/// Shape-aware and materially denser than the rectangle strategy for
/// irregular or curved parts, at `O(sheet cells × mask cells)` worst-case
/// work per placement. The mask cache is shared across the sheets of a run.
pub struct RasterPacker {
    grid: OccupancyGrid,
    parts: Arc<PartCatalog>,
    tools: Arc<ToolCatalog>,
    cache: Rc<RefCell<MaskCache>>,
    cancel: CancelToken,
    placed: Vec<(usize, PlacedResult)>,
}

impl RasterPacker {
    /// Creates a packer over a usable area of `width`×`height`, with clamp
    /// protection zones pre-marked as permanently occupied.
    pub fn new(
        width: f32,
        height: f32,
        clamp_zones: &[Rect],
        parts: Arc<PartCatalog>,
        tools: Arc<ToolCatalog>,
        cache: Rc<RefCell<MaskCache>>,
        cancel: CancelToken,
    ) -> Result<Self> {
        let resolution = cache.borrow().resolution();
        let mut grid = OccupancyGrid::new(width, height, resolution)?;
        for zone in clamp_zones {
            grid.mark_zone(*zone);
        }
        Ok(RasterPacker {
            grid,
            parts,
            tools,
            cache,
            cancel,
            placed: Vec::new(),
        })
    }

    /// Rotations in attempt order: the preferred rotation first when set,
    /// then the legal set in its declared order.
    fn rotation_order(item: &PackerItem) -> Vec<Rotation> {
        let mut order = Vec::with_capacity(item.allowed_rotations.len() + 1);
        if let Some(preferred) = item.preferred_rotation {
            order.push(preferred);
        }
        for &r in &item.allowed_rotations {
            if !order.contains(&r) {
                order.push(r);
            }
        }
        order
    }

    /// Scans one rotation's mask over the grid, leftmost-first then lowest.
    /// For a fixed column, the first collision-free row wins and ends the
    /// scan for this rotation. Columns beyond `best`'s column cannot improve
    /// and are pruned. Returns `None` on cancellation.
    fn scan_rotation(
        &self,
        mask: &RasterMask,
        best: &Option<(usize, usize)>,
    ) -> Option<Option<(usize, usize)>> {
        if mask.n_cols > self.grid.n_cols || mask.n_rows > self.grid.n_rows {
            return Some(None);
        }
        let col_limit = self.grid.n_cols - mask.n_cols;
        let row_limit = self.grid.n_rows - mask.n_rows;

        for col in 0..=col_limit {
            if let Some((best_col, _)) = best {
                if col > *best_col {
                    break;
                }
            }
            if col % YIELD_INTERVAL == 0 && col > 0 && self.cancel.is_cancelled() {
                return None;
            }
            for row in 0..=row_limit {
                if !self.grid.collides(col, row, mask) {
                    return Some(Some((col, row)));
                }
            }
        }
        Some(None)
    }
}

impl SheetPacker for RasterPacker {
    fn find_position(&mut self, item: &PackerItem) -> Option<PlacedResult> {
        let Some(part) = self.parts.get(item.part_id) else {
            debug_assert!(false, "item references part {} not in catalog", item.part_id);
            return None;
        };

        let mut best: Option<(usize, usize)> = None;
        let mut best_rotation = Rotation::R0;
        let mut best_mask: Option<Arc<RasterMask>> = None;

        for rotation in Self::rotation_order(item) {
            let mask = self
                .cache
                .borrow_mut()
                .get(part, &self.tools, rotation);

            let candidate = self.scan_rotation(&mask, &best)?;
            if let Some((col, row)) = candidate {
                let better = match best {
                    None => true,
                    //smallest column wins, ties broken by smallest row
                    Some((bc, br)) => col < bc || (col == bc && row < br),
                };
                if better {
                    best = Some((col, row));
                    best_rotation = rotation;
                    best_mask = Some(mask);
                }
            }
        }

        let (col, row) = best?;
        let mask = best_mask.expect("best position always has a mask");
        let resolution = self.grid.resolution;
        trace!(
            "[RAST] item {}: best ({col}, {row}) rot {}°",
            item.id,
            best_rotation.degrees()
        );
        Some(PlacedResult {
            x: col as f32 * resolution,
            y: row as f32 * resolution,
            rotation: best_rotation,
            extents: mask.extents,
        })
    }

    fn place_item(&mut self, item: &PackerItem, placement: &PlacedResult) {
        let part = self
            .parts
            .get(item.part_id)
            .expect("placement for item whose part is not in the catalog");
        let mask = self
            .cache
            .borrow_mut()
            .get(part, &self.tools, placement.rotation);

        let resolution = self.grid.resolution;
        let col = (placement.x / resolution).round() as usize;
        let row = (placement.y / resolution).round() as usize;

        debug_assert!(
            !self.grid.collides(col, row, &mask),
            "placement of item {} at ({col}, {row}) overlaps occupied cells; \
             results must come from find_position on the same packer state",
            item.id
        );

        self.grid.write_mask(col, row, &mask);
        self.placed.push((item.id, *placement));

        debug!(
            "[RAST] placed item {} at ({:.1}, {:.1}) rot {}°, grid {}/{} cells occupied",
            item.id,
            placement.x,
            placement.y,
            placement.rotation.degrees(),
            self.grid.occupied_count(),
            self.grid.cell_count()
        );
    }

    fn placed_items(&self) -> &[(usize, PlacedResult)] {
        &self.placed
    }
}
