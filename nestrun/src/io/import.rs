use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::{debug, warn};
use turnest::entities::{
    Material, Part, PartCatalog, PartGeometry, PlacedPunch, ScheduledPart, Tool, ToolCatalog,
    ToolShape,
};
use turnest::geometry::Entity;
use turnest::geometry::primitives::{Arc, Circle, Edge, Point, Rect};

use crate::io::ext_repr::{ExtEntity, ExtInstance, ExtPart, ExtTool, ExtToolShape};

/// Converts an external instance into the engine's catalogs and schedule,
/// validating as it goes. The settings travel through unchanged (they are
/// validated again by the orchestrator).
pub fn import_instance(
    ext: &ExtInstance,
) -> Result<(PartCatalog, ToolCatalog, Vec<ScheduledPart>)> {
    let parts = PartCatalog::new(
        ext.parts
            .iter()
            .map(import_part)
            .collect::<Result<Vec<_>>>()?,
    )
    .context("invalid part catalog")?;

    let tools = ToolCatalog::new(
        ext.tools
            .iter()
            .map(import_tool)
            .collect::<Result<Vec<_>>>()?,
    )
    .context("invalid tool catalog")?;

    let schedule = ext
        .schedule
        .iter()
        .map(|s| {
            ensure!(
                parts.get(s.part_id).is_some(),
                "schedule references unknown part {}",
                s.part_id
            );
            ensure!(s.quantity > 0, "scheduled part {} has zero quantity", s.part_id);
            Ok(ScheduledPart {
                part_id: s.part_id,
                quantity: s.quantity,
                constraints: s.constraints,
                preferred_rotation: s.preferred_rotation,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "[IMPORT] instance '{}': {} parts, {} tools, {} scheduled entries",
        ext.name,
        parts.len(),
        tools.len(),
        schedule.len()
    );

    Ok((parts, tools, schedule))
}

fn import_part(ext: &ExtPart) -> Result<Part> {
    ensure!(
        ext.width > 0.0 && ext.height > 0.0,
        "part {} has degenerate dimensions {}x{}",
        ext.id,
        ext.width,
        ext.height
    );
    let entities = ext.entities.iter().map(import_entity).collect_vec();
    let bbox = Rect::try_new(0.0, 0.0, ext.width, ext.height)
        .with_context(|| format!("part {} bounding box", ext.id))?;

    //entities are expected in the part's normalized frame
    if let Some(extent) = entities
        .iter()
        .filter_map(Entity::bbox)
        .reduce(Rect::bounding_rect)
    {
        const SLACK: f32 = 0.5;
        if extent.x_min < -SLACK
            || extent.y_min < -SLACK
            || extent.x_max > ext.width + SLACK
            || extent.y_max > ext.height + SLACK
        {
            warn!(
                "[IMPORT] part {} entities exceed its declared {}x{} frame",
                ext.id, ext.width, ext.height
            );
        }
    }

    Ok(Part {
        id: ext.id,
        name: ext.name.clone(),
        geometry: PartGeometry {
            entities,
            bbox,
            width: ext.width,
            height: ext.height,
            render_path: ext.render_path.clone(),
        },
        punches: ext
            .punches
            .iter()
            .map(|p| PlacedPunch {
                tool_id: p.tool_id,
                x: p.x,
                y: p.y,
                rotation: p.rotation,
                line_id: p.line_id,
            })
            .collect(),
        material: Material {
            name: ext.material.clone(),
            thickness: ext.thickness,
        },
        constraints: ext.constraints.unwrap_or_default(),
    })
}

fn import_entity(ext: &ExtEntity) -> Entity {
    match ext {
        ExtEntity::Line { x1, y1, x2, y2 } => {
            Entity::Line(Edge::new(Point(*x1, *y1), Point(*x2, *y2)))
        }
        ExtEntity::Polyline { points } => {
            Entity::Polyline(points.iter().map(|[x, y]| Point(*x, *y)).collect())
        }
        ExtEntity::Circle { cx, cy, r } => Entity::Circle(Circle::new(Point(*cx, *cy), *r)),
        ExtEntity::Arc {
            cx,
            cy,
            r,
            start_deg,
            end_deg,
        } => Entity::Arc(Arc::new(
            Point(*cx, *cy),
            *r,
            start_deg.to_radians(),
            end_deg.to_radians(),
        )),
    }
}

fn import_tool(ext: &ExtTool) -> Result<Tool> {
    ensure!(ext.width > 0.0, "tool {} has non-positive width", ext.id);
    let shape = match ext.shape {
        ExtToolShape::Circle => ToolShape::Circle,
        ExtToolShape::Square => ToolShape::Square,
        ExtToolShape::Rectangle => ToolShape::Rectangle,
        ExtToolShape::Oblong => ToolShape::Oblong,
        ExtToolShape::Special => {
            let contour = ext
                .contour
                .as_ref()
                .context("special tool without contour")?;
            ToolShape::Special(contour.iter().map(|[x, y]| Point(*x, *y)).collect())
        }
    };
    Ok(Tool {
        id: ext.id,
        name: ext.name.clone(),
        shape,
        width: ext.width,
        height: ext.height,
        corner_radius: ext.corner_radius,
    })
}
