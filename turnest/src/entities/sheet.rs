use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::entities::Material;
use crate::geometry::Rotation;

/// A stock sheet definition available to the nesting run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SheetDef {
    pub id: usize,
    pub width: f32,
    pub height: f32,
    /// Number of physical sheets of this definition in stock.
    pub quantity: usize,
    /// Definitions not marked for nesting are skipped by sheet selection.
    pub use_in_nesting: bool,
    /// Marks the definition chosen under the `SelectedOnly` strategy.
    pub selected: bool,
    pub material: Material,
}

/// One placed part instance on a sheet, in sheet coordinates.
/// `(x, y)` is the minimum corner of the rotated bounding footprint;
/// `width`/`height` are the footprint's dimensions at `rotation`.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedPart {
    pub item_id: usize,
    pub part_id: usize,
    pub x: f32,
    pub y: f32,
    pub rotation: Rotation,
    pub width: f32,
    pub height: f32,
}

new_key_type! {
    /// Unique key for each [`PlacedPart`] in a [`SheetLayout`]
    pub struct PPartKey;
}

/// Mutable working layout of one sheet while it is being filled.
#[derive(Clone, Debug)]
pub struct SheetLayout {
    pub def_id: usize,
    pub width: f32,
    pub height: f32,
    pub material: Material,
    pub placed: SlotMap<PPartKey, PlacedPart>,
}

impl SheetLayout {
    pub fn new(def_id: usize, width: f32, height: f32, material: Material) -> Self {
        SheetLayout {
            def_id,
            width,
            height,
            material,
            placed: SlotMap::with_key(),
        }
    }

    pub fn place(&mut self, placed_part: PlacedPart) -> PPartKey {
        self.placed.insert(placed_part)
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Ratio of placed bounding-footprint area to sheet area, in percent.
    pub fn utilization(&self) -> f32 {
        let placed_area: f32 = self.placed.values().map(|p| p.width * p.height).sum();
        placed_area / (self.width * self.height) * 100.0
    }

    /// Seals the layout into an immutable result sheet.
    pub fn close(self) -> NestResultSheet {
        let utilization = self.utilization();
        NestResultSheet {
            def_id: self.def_id,
            width: self.width,
            height: self.height,
            material: self.material,
            placed: self.placed.values().cloned().collect(),
            quantity: 1,
            utilization,
            scrap: 100.0 - utilization,
        }
    }
}

/// One produced sheet layout of a nesting run. Immutable once closed;
/// `quantity` counts how many identical physical sheets it stands for.
#[derive(Clone, Debug)]
pub struct NestResultSheet {
    pub def_id: usize,
    pub width: f32,
    pub height: f32,
    pub material: Material,
    pub placed: Vec<PlacedPart>,
    pub quantity: usize,
    pub utilization: f32,
    pub scrap: f32,
}

impl NestResultSheet {
    /// True iff both sheets use the same stock definition and carry the same
    /// placements. Item ids differ between physical sheets and are ignored.
    pub fn layout_matches(&self, other: &NestResultSheet) -> bool {
        self.def_id == other.def_id
            && self.placed.len() == other.placed.len()
            && self
                .placed
                .iter()
                .zip(&other.placed)
                .all(|(a, b)| {
                    a.part_id == b.part_id
                        && a.x == b.x
                        && a.y == b.y
                        && a.rotation == b.rotation
                })
    }
}
