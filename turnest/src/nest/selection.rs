use log::debug;
use ordered_float::OrderedFloat;

use crate::entities::{NestingSettings, SheetDef, SheetStrategy};
use crate::prep::PackerItem;

/// Auto-calculated sheet lengths are rounded up to this step.
const AUTO_LENGTH_STEP: f32 = 50.0;
/// Assumed achievable utilization when estimating the needed sheet length.
const AUTO_LENGTH_FILL: f32 = 0.75;

/// The stock sheet chosen for the next layout. `width`/`height` usually
/// equal the definition's, except under `AutoLength` where the width is cut
/// down to the estimated need.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetPick {
    pub def_idx: usize,
    pub width: f32,
    pub height: f32,
}

/// Chooses which stock sheet definition to draw from next.
///
/// Only definitions marked for nesting with remaining stock (and not ruled
/// out by `dead_defs`) are considered. Returns `None` when no eligible stock
/// remains, which is the orchestrator's hard-stop condition.
pub fn select_stock_sheet(
    settings: &NestingSettings,
    stock_qtys: &[usize],
    dead_defs: &[bool],
    next_item: Option<&PackerItem>,
    remaining_area: f32,
) -> Option<SheetPick> {
    let eligible = |(idx, def): &(usize, &SheetDef)| {
        def.use_in_nesting
            && stock_qtys[*idx] > 0
            && !dead_defs[*idx]
            && (settings.strategy != SheetStrategy::SelectedOnly || def.selected)
    };
    let candidates: Vec<(usize, &SheetDef)> = settings
        .sheets
        .iter()
        .enumerate()
        .filter(eligible)
        .collect();

    let full_pick = |(idx, def): (usize, &SheetDef)| SheetPick {
        def_idx: idx,
        width: def.width,
        height: def.height,
    };

    match settings.strategy {
        SheetStrategy::ListedOrder | SheetStrategy::SelectedOnly => {
            candidates.first().copied().map(full_pick)
        }
        SheetStrategy::SmallestFirst => candidates
            .iter()
            .min_by_key(|(_, def)| OrderedFloat(def.width * def.height))
            .copied()
            .map(full_pick),
        SheetStrategy::BestFit => {
            //smallest sheet whose usable area still admits the next item
            let admitting = candidates.iter().filter(|(_, def)| match next_item {
                None => true,
                Some(item) => item_fits_def(item, def, settings),
            });
            match admitting.min_by_key(|(_, def)| OrderedFloat(def.width * def.height)) {
                Some(&pick) => Some(full_pick(pick)),
                None => {
                    //nothing admits the item; fall back to list order so the
                    //orchestrator can flag it as unplaceable
                    debug!("[NEST] best-fit: no sheet admits the next item, using list order");
                    candidates.first().copied().map(full_pick)
                }
            }
        }
        SheetStrategy::AutoLength => {
            let (idx, def) = *candidates.first()?;
            Some(SheetPick {
                def_idx: idx,
                width: auto_length(def, settings, next_item, remaining_area),
                height: def.height,
            })
        }
    }
}

/// True iff some legal rotation of `item` fits the definition's usable area.
pub(crate) fn item_fits_def(item: &PackerItem, def: &SheetDef, settings: &NestingSettings) -> bool {
    let (usable_w, usable_h) = settings.usable_size(def.width, def.height);
    item.allowed_rotations.iter().any(|&r| {
        let fp = item.footprint(r);
        fp.width <= usable_w && fp.height <= usable_h
    })
}

/// Estimated sheet width needed for the remaining items, assuming the
/// configured fill rate, rounded up to the length step and clamped to the
/// definition's full width. Never shorter than the next item needs.
fn auto_length(
    def: &SheetDef,
    settings: &NestingSettings,
    next_item: Option<&PackerItem>,
    remaining_area: f32,
) -> f32 {
    let (_, usable_h) = settings.usable_size(def.width, def.height);
    let margin_w = settings.margins.left + settings.margins.right;

    let mut needed = remaining_area / (usable_h * AUTO_LENGTH_FILL) + margin_w;
    if let Some(item) = next_item {
        let min_fit = item
            .allowed_rotations
            .iter()
            .map(|&r| item.footprint(r))
            .filter(|fp| fp.height <= usable_h)
            .map(|fp| fp.width + margin_w)
            .min_by(|a, b| a.total_cmp(b));
        if let Some(min_fit) = min_fit {
            needed = f32::max(needed, min_fit);
        }
    }

    let stepped = (needed / AUTO_LENGTH_STEP).ceil() * AUTO_LENGTH_STEP;
    f32::min(stepped, def.width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Material;
    use crate::geometry::{Extents, Rotation};

    fn def(id: usize, w: f32, h: f32) -> SheetDef {
        SheetDef {
            id,
            width: w,
            height: h,
            quantity: 1,
            use_in_nesting: true,
            selected: false,
            material: Material {
                name: "DC01".into(),
                thickness: 1.0,
            },
        }
    }

    fn settings_with(sheets: Vec<SheetDef>, strategy: SheetStrategy) -> NestingSettings {
        NestingSettings {
            sheets,
            strategy,
            margins: crate::entities::SheetMargins {
                left: 0.0,
                right: 0.0,
                top: 0.0,
                bottom: 0.0,
            },
            ..NestingSettings::default()
        }
    }

    fn item(w: f32, h: f32) -> PackerItem {
        PackerItem {
            id: 0,
            part_id: 0,
            extents: Extents {
                width: w,
                height: h,
                ox: 0.0,
                oy: 0.0,
            },
            allowed_rotations: vec![Rotation::R0],
            preferred_rotation: None,
            area: w * h,
            aspect: w / h,
            has_common_line: false,
        }
    }

    #[test]
    fn listed_order_takes_first_eligible() {
        let settings = settings_with(
            vec![def(0, 2000.0, 1000.0), def(1, 1000.0, 500.0)],
            SheetStrategy::ListedOrder,
        );
        let pick = select_stock_sheet(&settings, &[1, 1], &[false, false], None, 0.0).unwrap();
        assert_eq!(pick.def_idx, 0);
    }

    #[test]
    fn exhausted_stock_is_skipped() {
        let settings = settings_with(
            vec![def(0, 2000.0, 1000.0), def(1, 1000.0, 500.0)],
            SheetStrategy::ListedOrder,
        );
        let pick = select_stock_sheet(&settings, &[0, 1], &[false, false], None, 0.0).unwrap();
        assert_eq!(pick.def_idx, 1);

        assert!(select_stock_sheet(&settings, &[0, 0], &[false, false], None, 0.0).is_none());
    }

    #[test]
    fn smallest_first_picks_minimum_area() {
        let settings = settings_with(
            vec![def(0, 2000.0, 1000.0), def(1, 1000.0, 500.0)],
            SheetStrategy::SmallestFirst,
        );
        let pick = select_stock_sheet(&settings, &[1, 1], &[false, false], None, 0.0).unwrap();
        assert_eq!(pick.def_idx, 1);
    }

    #[test]
    fn best_fit_prefers_smallest_admitting_sheet() {
        let settings = settings_with(
            vec![def(0, 2000.0, 1000.0), def(1, 1000.0, 500.0)],
            SheetStrategy::BestFit,
        );
        //fits both -> smaller sheet wins
        let small = item(400.0, 300.0);
        let pick =
            select_stock_sheet(&settings, &[1, 1], &[false, false], Some(&small), 120_000.0)
                .unwrap();
        assert_eq!(pick.def_idx, 1);

        //only fits the big sheet
        let wide = item(1500.0, 300.0);
        let pick =
            select_stock_sheet(&settings, &[1, 1], &[false, false], Some(&wide), 450_000.0)
                .unwrap();
        assert_eq!(pick.def_idx, 0);
    }

    #[test]
    fn auto_length_cuts_sheet_to_need() {
        let settings = settings_with(vec![def(0, 3000.0, 1000.0)], SheetStrategy::AutoLength);
        let it = item(400.0, 300.0);
        //240000mm2 at 75% fill over 1000 height estimates 320, but the next
        //item needs 400, which already sits on the 50mm step
        let pick =
            select_stock_sheet(&settings, &[1], &[false], Some(&it), 240_000.0).unwrap();
        assert_eq!(pick.width, 400.0);
        assert_eq!(pick.height, 1000.0);

        //with a smaller next item the area estimate drives the length
        let small = item(100.0, 100.0);
        let pick =
            select_stock_sheet(&settings, &[1], &[false], Some(&small), 240_000.0).unwrap();
        assert_eq!(pick.width, 350.0);
    }

    #[test]
    fn selected_only_requires_flag() {
        let mut sheets = vec![def(0, 2000.0, 1000.0), def(1, 1000.0, 500.0)];
        sheets[1].selected = true;
        let settings = settings_with(sheets, SheetStrategy::SelectedOnly);
        let pick = select_stock_sheet(&settings, &[1, 1], &[false, false], None, 0.0).unwrap();
        assert_eq!(pick.def_idx, 1);
    }
}
