use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::entities::SheetDef;
use crate::geometry::primitives::Rect;

/// Minimum spacing kept between neighboring part footprints, per axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub x: f32,
    pub y: f32,
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing { x: 5.0, y: 5.0 }
    }
}

/// Margins kept free along the sheet edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheetMargins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for SheetMargins {
    fn default() -> Self {
        SheetMargins {
            left: 5.0,
            right: 5.0,
            top: 5.0,
            bottom: 5.0,
        }
    }
}

/// A workholding clamp gripping the sheet along its bottom edge.
/// The protected zone around it must stay clear of part footprints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clamp {
    /// Center of the clamp along the bottom edge.
    pub x: f32,
    pub width: f32,
    /// How far the protected zone reaches into the sheet.
    pub depth: f32,
}

impl Clamp {
    /// Protected rectangle in sheet coordinates.
    pub fn protection_zone(&self) -> Rect {
        Rect {
            x_min: self.x - self.width / 2.0,
            y_min: 0.0,
            x_max: self.x + self.width / 2.0,
            y_max: self.depth,
        }
    }
}

/// Which stock sheet definition to draw from next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetStrategy {
    /// First eligible definition in list order.
    ListedOrder,
    /// Eligible definition with the smallest area.
    SmallestFirst,
    /// Smallest eligible definition whose usable area still admits the next
    /// item to place.
    BestFit,
    /// Only the definition marked `selected`.
    SelectedOnly,
    /// First eligible definition, with its width cut down to the estimated
    /// need of the remaining items.
    AutoLength,
}

impl Default for SheetStrategy {
    fn default() -> Self {
        SheetStrategy::ListedOrder
    }
}

/// Which packing strategy fills a sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackerKind {
    /// Guillotine free-rectangle packing of bounding rectangles. Fast,
    /// shape-oblivious.
    Rectangle,
    /// Pixel-exact packing of rasterized true contours. Slow, shape-aware.
    Raster,
}

impl Default for PackerKind {
    fn default() -> Self {
        PackerKind::Rectangle
    }
}

/// Run-wide configuration snapshot. Validated once at the orchestrator
/// boundary; immutable for the duration of a run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NestingSettings {
    pub sheets: Vec<SheetDef>,
    #[serde(default)]
    pub spacing: Spacing,
    #[serde(default)]
    pub margins: SheetMargins,
    #[serde(default)]
    pub clamps: Vec<Clamp>,
    #[serde(default)]
    pub strategy: SheetStrategy,
    #[serde(default)]
    pub packer: PackerKind,
    /// Cell size of the raster packer's occupancy grid, in mm.
    #[serde(default = "default_resolution")]
    pub raster_resolution: f32,
    /// Permits part footprints to overlap clamp protection zones.
    #[serde(default)]
    pub allow_clamp_overlap: bool,
    /// Common-line cutting switch. Carried through to items; placement does
    /// not geometrically enforce shared edges.
    #[serde(default)]
    pub common_line: bool,
    #[serde(default)]
    pub vertex_snap: bool,
}

fn default_resolution() -> f32 {
    1.0
}

impl Default for NestingSettings {
    fn default() -> Self {
        NestingSettings {
            sheets: vec![],
            spacing: Spacing::default(),
            margins: SheetMargins::default(),
            clamps: vec![],
            strategy: SheetStrategy::default(),
            packer: PackerKind::default(),
            raster_resolution: default_resolution(),
            allow_clamp_overlap: false,
            common_line: false,
            vertex_snap: false,
        }
    }
}

impl NestingSettings {
    /// Usable placement area of a sheet of the given dimensions, after the
    /// edge margins are taken off.
    pub fn usable_size(&self, sheet_width: f32, sheet_height: f32) -> (f32, f32) {
        (
            sheet_width - self.margins.left - self.margins.right,
            sheet_height - self.margins.top - self.margins.bottom,
        )
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.sheets.is_empty(),
            "no stock sheets configured, nothing to nest onto"
        );
        ensure!(
            self.spacing.x >= 0.0 && self.spacing.y >= 0.0,
            "part spacing must be non-negative"
        );
        ensure!(
            self.raster_resolution > 0.0,
            "raster resolution must be positive"
        );
        ensure!(
            self.margins.left >= 0.0
                && self.margins.right >= 0.0
                && self.margins.top >= 0.0
                && self.margins.bottom >= 0.0,
            "sheet margins must be non-negative"
        );
        for def in &self.sheets {
            let (uw, uh) = self.usable_size(def.width, def.height);
            ensure!(
                uw > 0.0 && uh > 0.0,
                "sheet definition {} has no usable area left after margins",
                def.id
            );
        }
        for clamp in &self.clamps {
            ensure!(
                clamp.width > 0.0 && clamp.depth > 0.0,
                "clamp protection zones must have positive dimensions"
            );
        }
        if self.strategy == SheetStrategy::SelectedOnly {
            ensure!(
                self.sheets.iter().any(|s| s.selected),
                "SelectedOnly strategy requires a selected sheet definition"
            );
        }
        Ok(())
    }
}
