use turnest::nest::{NestOutcome, NestResult, UnplacedReason};

use crate::io::ext_repr::{ExtPlacedPart, ExtResultSheet, ExtSolution, ExtUnplacedItem};

pub fn export_solution(instance_name: &str, result: &NestResult) -> ExtSolution {
    ExtSolution {
        instance: instance_name.to_string(),
        outcome: outcome_str(result.outcome).to_string(),
        placed_count: result.placed_count,
        total_count: result.total_count,
        utilization: result.utilization,
        sheets: result
            .sheets
            .iter()
            .map(|sheet| ExtResultSheet {
                sheet_id: sheet.def_id,
                width: sheet.width,
                height: sheet.height,
                material: sheet.material.name.clone(),
                quantity: sheet.quantity,
                utilization: sheet.utilization,
                scrap: sheet.scrap,
                placed: sheet
                    .placed
                    .iter()
                    .map(|p| ExtPlacedPart {
                        item_id: p.item_id,
                        part_id: p.part_id,
                        x: p.x,
                        y: p.y,
                        rotation: p.rotation,
                        width: p.width,
                        height: p.height,
                    })
                    .collect(),
            })
            .collect(),
        unplaced: result
            .unplaced
            .iter()
            .map(|u| ExtUnplacedItem {
                item_id: u.item_id,
                part_id: u.part_id,
                reason: reason_str(u.reason).to_string(),
            })
            .collect(),
    }
}

fn outcome_str(outcome: NestOutcome) -> &'static str {
    match outcome {
        NestOutcome::Complete => "complete",
        NestOutcome::OutOfMaterial => "out_of_material",
        NestOutcome::Cancelled => "cancelled",
    }
}

fn reason_str(reason: UnplacedReason) -> &'static str {
    match reason {
        UnplacedReason::TooLargeForStock => "too_large_for_stock",
        UnplacedReason::NoStockRemaining => "no_stock_remaining",
        UnplacedReason::RunCancelled => "run_cancelled",
    }
}
