use std::collections::HashMap;
use std::sync::Arc;

use ndarray::Array2;

use crate::entities::{Part, Spacing, ToolCatalog};
use crate::geometry::primitives::Point;
use crate::geometry::{Extents, Rotation};

/// Rasterized bitmap of a part's true silhouette at one rotation, dilated by
/// the spacing margin.
///
/// Invariant: the dilation extends toward increasing column and increasing
/// row only, matching the placement scan that proceeds in increasing x then
/// increasing y — the neighbor on the opposite side brings its own margin.
/// Changing the scan direction requires re-deriving the dilation direction.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterMask {
    /// Cell value 1 = occupied. Indexed `[row, col]` = `[y, x]`.
    pub cells: Array2<u8>,
    pub n_cols: usize,
    pub n_rows: usize,
    /// The footprint the mask was rasterized from.
    pub extents: Extents,
    /// Probe cells checked before a full scan: the mask's center cell and its
    /// top-left-most occupied cell, the common hot spots.
    pub probes: Vec<(usize, usize)>,
}

impl RasterMask {
    /// Rasterizes `part` at `rotation`. Every cell center inside the
    /// rotation-aligned bounding box is inverse-rotated into the part's local
    /// frame and tested against the true contour; occupied cells are dilated
    /// by `dilation` cells right- and upward. The mask is widened by the
    /// dilation so the margin is never clipped.
    ///
    /// A part with no contour entities yields an all-empty mask: it then
    /// nests as a zero-footprint point, a documented sharp edge callers
    /// should guard against upstream.
    pub fn rasterize(
        part: &Part,
        tools: &ToolCatalog,
        rotation: Rotation,
        resolution: f32,
        dilation: usize,
    ) -> Self {
        let extents = part.rotated_extents(tools, rotation);
        let body_cols = (extents.width / resolution).ceil() as usize;
        let body_rows = (extents.height / resolution).ceil() as usize;
        let n_cols = body_cols + dilation;
        let n_rows = body_rows + dilation;

        let mut cells = Array2::<u8>::zeros((n_rows, n_cols));
        let mut interior = Vec::new();

        let inverse = match rotation {
            Rotation::R0 => Rotation::R0,
            Rotation::R90 => Rotation::R270,
            Rotation::R180 => Rotation::R180,
            Rotation::R270 => Rotation::R90,
        };

        for row in 0..body_rows {
            for col in 0..body_cols {
                //cell center in footprint coordinates
                let fx = (col as f32 + 0.5) * resolution;
                let fy = (row as f32 + 0.5) * resolution;
                //back into the part's local frame: undo the offset, then the rotation
                let local =
                    Point(fx - extents.ox, fy - extents.oy).rotated_quarter(inverse);
                if part.geometry.contains_point(local) {
                    cells[[row, col]] = 1;
                    interior.push((row, col));
                }
            }
        }

        //asymmetric spacing margin: right- and upward only
        for &(row, col) in &interior {
            for d in 1..=dilation {
                cells[[row, col + d]] = 1;
                cells[[row + d, col]] = 1;
            }
        }

        let probes = Self::probe_cells(&cells, n_rows, n_cols);

        RasterMask {
            cells,
            n_cols,
            n_rows,
            extents,
            probes,
        }
    }

    fn probe_cells(cells: &Array2<u8>, n_rows: usize, n_cols: usize) -> Vec<(usize, usize)> {
        let mut probes = Vec::with_capacity(2);
        if n_rows == 0 || n_cols == 0 {
            return probes;
        }
        let center = (n_rows / 2, n_cols / 2);
        if cells[center] != 0 {
            probes.push(center);
        }
        //top-left-most occupied cell in row-major order
        'outer: for row in 0..n_rows {
            for col in 0..n_cols {
                if cells[[row, col]] != 0 {
                    if (row, col) != center {
                        probes.push((row, col));
                    }
                    break 'outer;
                }
            }
        }
        probes
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

/// Memoizes masks per `(part id, rotation)` for the lifetime of a run.
///
/// Masks depend only on the part contour, rotation, resolution and spacing —
/// never on sheet-relative state — so one cache serves every sheet of a run.
#[derive(Debug)]
pub struct MaskCache {
    masks: HashMap<(usize, Rotation), Arc<RasterMask>>,
    resolution: f32,
    dilation: usize,
}

impl MaskCache {
    pub fn new(resolution: f32, spacing: Spacing) -> Self {
        let dilation = (f32::max(spacing.x, spacing.y) / resolution).ceil() as usize;
        MaskCache {
            masks: HashMap::new(),
            resolution,
            dilation,
        }
    }

    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Returns the mask for `(part, rotation)`, rasterizing it on first
    /// request and reusing the cached bitmap afterwards.
    pub fn get(
        &mut self,
        part: &Part,
        tools: &ToolCatalog,
        rotation: Rotation,
    ) -> Arc<RasterMask> {
        let (resolution, dilation) = (self.resolution, self.dilation);
        self.masks
            .entry((part.id, rotation))
            .or_insert_with(|| {
                Arc::new(RasterMask::rasterize(part, tools, rotation, resolution, dilation))
            })
            .clone()
    }
}
