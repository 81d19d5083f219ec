//! Converts a schedule into the flat, sorted list of atomic placement items
//! the packers consume.

use anyhow::{Result, bail};
use log::info;

use crate::entities::{PartCatalog, ScheduledPart, ToolCatalog};
use crate::geometry::{Extents, Rotation};

/// One physical unit to place. Created fresh per run and consumed exactly
/// once by a successful placement, or reported as a failure if no sheet can
/// take it.
#[derive(Clone, Debug)]
pub struct PackerItem {
    /// Unique within one run.
    pub id: usize,
    pub part_id: usize,
    /// Bounding footprint at rotation 0, including punch extents.
    pub extents: Extents,
    /// Legal rotations, in the fixed order they are attempted.
    pub allowed_rotations: Vec<Rotation>,
    pub preferred_rotation: Option<Rotation>,
    /// Rotation-0 bounding area. Deliberately not the true polygon area:
    /// sorting and reporting use the bounding rectangle even in raster mode.
    pub area: f32,
    pub aspect: f32,
    pub has_common_line: bool,
}

impl PackerItem {
    /// Footprint of the item at the given rotation, within the
    /// bounding-rectangle abstraction.
    pub fn footprint(&self, rotation: Rotation) -> Extents {
        self.extents.rotated_quarter(rotation)
    }
}

/// Expands the schedule into independent [`PackerItem`]s, one per physical
/// unit, sorted by descending bounding area so large items are placed first
/// and smaller items can fill the remaining gaps. Items of equal area keep
/// their scheduling order (stable sort).
///
/// Rotation-0 extents are computed once per scheduled entry; the expanded
/// units share the geometry data.
pub fn prepare_packer_items(
    schedule: &[ScheduledPart],
    parts: &PartCatalog,
    tools: &ToolCatalog,
) -> Result<Vec<PackerItem>> {
    let mut items = Vec::new();
    let mut next_id = 0;

    for scheduled in schedule {
        let Some(part) = parts.get(scheduled.part_id) else {
            bail!(
                "schedule references part {} which is not in the catalog",
                scheduled.part_id
            );
        };
        let constraints = scheduled.constraints.unwrap_or(part.constraints);
        let extents = part.rotated_extents(tools, Rotation::R0);
        let allowed_rotations = constraints.allowed_rotations();
        let area = extents.area();
        let aspect = if extents.height > 0.0 {
            extents.width / extents.height
        } else {
            0.0
        };

        for _ in 0..scheduled.quantity {
            items.push(PackerItem {
                id: next_id,
                part_id: part.id,
                extents,
                allowed_rotations: allowed_rotations.clone(),
                preferred_rotation: scheduled.preferred_rotation,
                area,
                aspect,
                has_common_line: constraints.allow_common_line,
            });
            next_id += 1;
        }
    }

    //large items first; stable, so equal areas keep scheduling order
    items.sort_by(|a, b| b.area.total_cmp(&a.area));

    info!(
        "[PREP] prepared {} placement items from {} scheduled parts",
        items.len(),
        schedule.len()
    );

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Material, NestingConstraints, Part, PartGeometry};
    use crate::geometry::primitives::Rect;

    fn part(id: usize, w: f32, h: f32) -> Part {
        Part {
            id,
            name: format!("part_{id}"),
            geometry: PartGeometry {
                entities: vec![],
                bbox: Rect::try_new(0.0, 0.0, w, h).unwrap(),
                width: w,
                height: h,
                render_path: None,
            },
            punches: vec![],
            material: Material {
                name: "DC01".into(),
                thickness: 1.0,
            },
            constraints: NestingConstraints::default(),
        }
    }

    #[test]
    fn quantity_expansion_and_area_sort() {
        let parts = PartCatalog::new([part(0, 10.0, 10.0), part(1, 50.0, 20.0)]).unwrap();
        let tools = ToolCatalog::default();
        let schedule = vec![ScheduledPart::new(0, 2), ScheduledPart::new(1, 1)];

        let items = prepare_packer_items(&schedule, &parts, &tools).unwrap();
        assert_eq!(items.len(), 3);
        //the 1000mm2 part leads, the two 100mm2 parts follow
        assert_eq!(items[0].part_id, 1);
        assert_eq!(items[1].part_id, 0);
        assert_eq!(items[2].part_id, 0);
        //areas are non-increasing
        assert!(items.windows(2).all(|w| w[0].area >= w[1].area));
    }

    #[test]
    fn equal_areas_keep_scheduling_order() {
        let parts = PartCatalog::new([part(0, 10.0, 20.0), part(1, 20.0, 10.0)]).unwrap();
        let tools = ToolCatalog::default();
        let schedule = vec![ScheduledPart::new(1, 1), ScheduledPart::new(0, 1)];

        let items = prepare_packer_items(&schedule, &parts, &tools).unwrap();
        assert_eq!(items[0].part_id, 1);
        assert_eq!(items[1].part_id, 0);
    }

    #[test]
    fn rotation_set_respects_constraints() {
        let mut p = part(0, 10.0, 10.0);
        p.constraints = NestingConstraints {
            allow_0_180: false,
            allow_90_270: false,
            allow_mirror: false,
            allow_common_line: false,
        };
        let parts = PartCatalog::new([p]).unwrap();
        let items = prepare_packer_items(
            &[ScheduledPart::new(0, 1)],
            &parts,
            &ToolCatalog::default(),
        )
        .unwrap();
        assert_eq!(items[0].allowed_rotations, vec![Rotation::R0]);
    }

    #[test]
    fn unknown_part_is_rejected() {
        let parts = PartCatalog::default();
        let result = prepare_packer_items(
            &[ScheduledPart::new(42, 1)],
            &parts,
            &ToolCatalog::default(),
        );
        assert!(result.is_err());
    }
}
