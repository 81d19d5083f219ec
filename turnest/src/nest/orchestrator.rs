use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use itertools::Itertools;
use log::{debug, info, warn};
use thousands::Separable;

use crate::entities::{
    NestResultSheet, NestingSettings, PackerKind, PartCatalog, PlacedPart, ScheduledPart,
    SheetLayout, ToolCatalog,
};
use crate::geometry::primitives::Rect;
use crate::nest::control::{CancelToken, NestProgress, NestState, ProgressSink};
use crate::nest::result::{NestOutcome, NestResult, UnplacedItem, UnplacedReason};
use crate::nest::selection::{item_fits_def, select_stock_sheet};
use crate::packing::raster::MaskCache;
use crate::packing::{RasterPacker, RectPacker, SheetPacker};
use crate::prep::{PackerItem, prepare_packer_items};
use crate::util::assertions;

/// A progress update is emitted every this many placements, besides one per
/// closed sheet and the final one.
const PROGRESS_INTERVAL: usize = 4;

/// Drives a nesting run over the scheduled parts: opens sheets via the
/// selection policy, fills each with the configured packing strategy, and
/// reports progress and the final outcome.
///
/// Holds immutable snapshots of the part and tool catalogs; the run never
/// reaches back into live application state.
pub struct Nester {
    parts: Arc<PartCatalog>,
    tools: Arc<ToolCatalog>,
    settings: NestingSettings,
    cancel: CancelToken,
}

impl Nester {
    /// Validates the settings once, up front. Runs share the catalogs but
    /// nothing else; each run starts from fresh per-sheet state.
    pub fn new(
        parts: PartCatalog,
        tools: ToolCatalog,
        settings: NestingSettings,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Nester {
            parts: Arc::new(parts),
            tools: Arc::new(tools),
            settings,
            cancel: CancelToken::new(),
        })
    }

    /// Token for requesting cooperative cancellation of the current run.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn settings(&self) -> &NestingSettings {
        &self.settings
    }

    /// Executes one nesting run over `schedule`.
    ///
    /// Items are attempted in descending bounding-area order. A sheet is
    /// considered exhausted once every remaining item has failed to fit it;
    /// an item that cannot fit an empty sheet of any configured size is
    /// reported as permanently unplaceable instead of retried forever.
    /// Deterministic: identical inputs produce identical placements.
    pub fn run(
        &self,
        schedule: &[ScheduledPart],
        progress: &mut dyn ProgressSink,
    ) -> Result<NestResult> {
        let items = prepare_packer_items(schedule, &self.parts, &self.tools)?;
        let total = items.len();
        info!(
            "[NEST] starting run: {} items, {} stock definitions, {:?} packer, {:?} sheet strategy",
            total.separate_with_commas(),
            self.settings.sheets.len(),
            self.settings.packer,
            self.settings.strategy,
        );
        debug!(
            "[NEST] common-line: {}, vertex snap: {}",
            self.settings.common_line, self.settings.vertex_snap
        );

        let mut pending = items;
        let mut stock_qtys = self.settings.sheets.iter().map(|d| d.quantity).collect_vec();
        let mut dead_defs = vec![false; self.settings.sheets.len()];
        let mut sheets_out: Vec<NestResultSheet> = Vec::new();
        let mut unplaced: Vec<UnplacedItem> = Vec::new();
        let mut placed_count = 0usize;
        let mut outcome = NestOutcome::Complete;
        let cache = Rc::new(RefCell::new(MaskCache::new(
            self.settings.raster_resolution,
            self.settings.spacing,
        )));

        'run: while !pending.is_empty() {
            if self.cancel.is_cancelled() {
                outcome = NestOutcome::Cancelled;
                break 'run;
            }

            let remaining_area: f32 = pending.iter().map(|i| i.area).sum();
            let Some(pick) = select_stock_sheet(
                &self.settings,
                &stock_qtys,
                &dead_defs,
                pending.first(),
                remaining_area,
            ) else {
                info!("[NEST] no eligible stock remains, stopping with partial result");
                outcome = NestOutcome::OutOfMaterial;
                break 'run;
            };
            stock_qtys[pick.def_idx] -= 1;
            let def = &self.settings.sheets[pick.def_idx];
            let (usable_w, usable_h) = self.settings.usable_size(pick.width, pick.height);
            let clamp_zones = self.clamp_zones(usable_w, usable_h);
            let mut packer = self.make_packer(usable_w, usable_h, &clamp_zones, &cache)?;
            let mut layout =
                SheetLayout::new(def.id, pick.width, pick.height, def.material.clone());
            debug!(
                "[NEST] opened sheet def {} ({:.0}x{:.0}), {} left in stock",
                def.id, pick.width, pick.height, stock_qtys[pick.def_idx]
            );
            let mut failed_here: Vec<usize> = Vec::new();

            loop {
                if self.cancel.is_cancelled() {
                    outcome = NestOutcome::Cancelled;
                    if !layout.is_empty() {
                        self.close_sheet(layout, &mut sheets_out);
                    }
                    break 'run;
                }
                let Some(pos) = pending.iter().position(|it| !failed_here.contains(&it.id))
                else {
                    break; //sheet exhausted, every remaining item failed on it
                };
                let item = pending[pos].clone();

                match packer.find_position(&item) {
                    Some(placement) => {
                        packer.place_item(&item, &placement);
                        layout.place(PlacedPart {
                            item_id: item.id,
                            part_id: item.part_id,
                            x: self.settings.margins.left + placement.x,
                            y: self.settings.margins.bottom + placement.y,
                            rotation: placement.rotation,
                            width: placement.extents.width,
                            height: placement.extents.height,
                        });
                        pending.remove(pos);
                        placed_count += 1;
                        if placed_count % PROGRESS_INTERVAL == 0 {
                            progress.progress(NestProgress {
                                state: NestState::Running,
                                placed: placed_count,
                                total,
                                sheets: &sheets_out,
                                fraction: fraction(placed_count, total),
                            });
                        }
                    }
                    None => {
                        if layout.is_empty() && self.item_exceeds_all_stock(&item) {
                            warn!(
                                "[NEST] item {} (part {}) exceeds every configured sheet, reported unplaced",
                                item.id, item.part_id
                            );
                            unplaced.push(UnplacedItem {
                                item_id: item.id,
                                part_id: item.part_id,
                                reason: UnplacedReason::TooLargeForStock,
                            });
                            pending.remove(pos);
                            continue;
                        }
                        failed_here.push(item.id);
                    }
                }
            }

            if layout.is_empty() {
                //nothing fit a virgin sheet of this definition; remaining
                //items only ever shrink to a subset, so none will fit later
                dead_defs[pick.def_idx] = true;
                stock_qtys[pick.def_idx] += 1;
                debug!(
                    "[NEST] sheet def {} cannot host any remaining item, ruled out",
                    def.id
                );
            } else {
                self.close_sheet(layout, &mut sheets_out);
                progress.progress(NestProgress {
                    state: NestState::Running,
                    placed: placed_count,
                    total,
                    sheets: &sheets_out,
                    fraction: fraction(placed_count, total),
                });
            }
        }

        //whatever is still pending goes into the report, with the reason
        let leftover_reason = match outcome {
            NestOutcome::Cancelled => UnplacedReason::RunCancelled,
            _ => UnplacedReason::NoStockRemaining,
        };
        for item in &pending {
            unplaced.push(UnplacedItem {
                item_id: item.id,
                part_id: item.part_id,
                reason: leftover_reason,
            });
        }

        let utilization = overall_utilization(&sheets_out);
        let final_state = match outcome {
            NestOutcome::Complete => NestState::Completed,
            NestOutcome::OutOfMaterial => NestState::OutOfMaterial,
            NestOutcome::Cancelled => NestState::Cancelled,
        };
        progress.progress(NestProgress {
            state: final_state,
            placed: placed_count,
            total,
            sheets: &sheets_out,
            fraction: fraction(placed_count, total),
        });

        let result = NestResult {
            placed_count,
            total_count: total,
            unplaced,
            outcome,
            utilization,
            sheets: sheets_out,
        };
        info!(
            "[NEST] run finished ({:?}): {}/{} items placed on {} sheets ({} distinct layouts), utilization {:.1}%",
            result.outcome,
            result.placed_count.separate_with_commas(),
            result.total_count.separate_with_commas(),
            result.sheet_count(),
            result.sheets.len(),
            result.utilization,
        );
        Ok(result)
    }

    /// Seals a filled layout; identical consecutive layouts collapse into
    /// one result sheet with an incremented repetition count.
    fn close_sheet(&self, layout: SheetLayout, sheets_out: &mut Vec<NestResultSheet>) {
        let sheet = layout.close();
        debug_assert!(assertions::placements_within_bounds(
            &sheet,
            &self.settings.margins
        ));
        if self.settings.packer == PackerKind::Rectangle {
            debug_assert!(assertions::footprints_disjoint(&sheet));
        }
        info!(
            "[NEST] closed sheet def {}: {} parts, {:.1}% utilization",
            sheet.def_id,
            sheet.placed.len(),
            sheet.utilization
        );
        match sheets_out.last_mut() {
            Some(last) if last.layout_matches(&sheet) => last.quantity += 1,
            _ => sheets_out.push(sheet),
        }
    }

    fn make_packer(
        &self,
        usable_w: f32,
        usable_h: f32,
        clamp_zones: &[Rect],
        cache: &Rc<RefCell<MaskCache>>,
    ) -> Result<Box<dyn SheetPacker>> {
        Ok(match self.settings.packer {
            PackerKind::Rectangle => Box::new(RectPacker::new(
                usable_w,
                usable_h,
                self.settings.spacing,
                clamp_zones,
            )?),
            PackerKind::Raster => Box::new(RasterPacker::new(
                usable_w,
                usable_h,
                clamp_zones,
                self.parts.clone(),
                self.tools.clone(),
                cache.clone(),
                self.cancel.clone(),
            )?),
        })
    }

    /// Clamp protection zones translated into usable-area coordinates and
    /// clipped to the usable rectangle.
    fn clamp_zones(&self, usable_w: f32, usable_h: f32) -> Vec<Rect> {
        if self.settings.allow_clamp_overlap {
            return vec![];
        }
        let Ok(usable) = Rect::try_new(0.0, 0.0, usable_w, usable_h) else {
            return vec![];
        };
        let margins = &self.settings.margins;
        self.settings
            .clamps
            .iter()
            .filter_map(|clamp| {
                let zone = clamp.protection_zone();
                let shifted = Rect {
                    x_min: zone.x_min - margins.left,
                    y_min: zone.y_min - margins.bottom,
                    x_max: zone.x_max - margins.left,
                    y_max: zone.y_max - margins.bottom,
                };
                Rect::intersection(shifted, usable)
            })
            .collect()
    }

    /// True iff no configured nesting sheet admits the item at any legal
    /// rotation, judged by the bounding footprint against the usable area.
    fn item_exceeds_all_stock(&self, item: &PackerItem) -> bool {
        !self
            .settings
            .sheets
            .iter()
            .filter(|def| def.use_in_nesting)
            .any(|def| item_fits_def(item, def, &self.settings))
    }
}

fn fraction(placed: usize, total: usize) -> f32 {
    if total == 0 {
        1.0
    } else {
        placed as f32 / total as f32
    }
}

fn overall_utilization(sheets: &[NestResultSheet]) -> f32 {
    let total_sheet_area: f32 = sheets
        .iter()
        .map(|s| s.quantity as f32 * s.width * s.height)
        .sum();
    if total_sheet_area <= 0.0 {
        return 0.0;
    }
    let placed_area: f32 = sheets
        .iter()
        .map(|s| {
            s.quantity as f32
                * s.placed
                    .iter()
                    .map(|p| p.width * p.height)
                    .sum::<f32>()
        })
        .sum();
    placed_area / total_sheet_area * 100.0
}
