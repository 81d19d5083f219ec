use svg::Document;
use svg::node::element::{Group, Rectangle, Text, Title};
use turnest::entities::{Clamp, NestResultSheet};

use crate::io::svg_util::{DEFAULT_THEME, SvgDrawOptions};

/// Renders one result sheet to an SVG document: the sheet outline, the clamp
/// protection zones and every placed part's footprint.
///
/// The engine's y-axis points up; the document flips it so layouts render the
/// way they come off the machine.
pub fn sheet_to_svg(
    sheet: &NestResultSheet,
    clamps: &[Clamp],
    options: SvgDrawOptions,
) -> Document {
    let theme = &DEFAULT_THEME;
    let stroke_width =
        f32::min(sheet.width, sheet.height) * 0.001 * options.stroke_width_multiplier;
    let pad = f32::max(sheet.width, sheet.height) * 0.025;

    let mut group = Group::new().set(
        "transform",
        format!("translate(0,{}) scale(1,-1)", sheet.height),
    );

    //sheet outline
    group = group.add(
        Rectangle::new()
            .set("x", 0.0)
            .set("y", 0.0)
            .set("width", sheet.width)
            .set("height", sheet.height)
            .set("fill", theme.sheet_fill)
            .set("stroke", "black")
            .set("stroke-width", 2.0 * stroke_width),
    );

    if options.draw_clamps {
        for clamp in clamps {
            let zone = clamp.protection_zone();
            group = group.add(
                Rectangle::new()
                    .set("x", zone.x_min)
                    .set("y", zone.y_min)
                    .set("width", zone.x_max - zone.x_min)
                    .set("height", zone.y_max - zone.y_min)
                    .set("fill", theme.clamp_fill)
                    .set("fill-opacity", 0.6)
                    .set("stroke", "none"),
            );
        }
    }

    for placed in &sheet.placed {
        let part_group = Group::new()
            .add(Title::new(format!(
                "part {}, item {}, rot {}°",
                placed.part_id,
                placed.item_id,
                placed.rotation.degrees()
            )))
            .add(
                Rectangle::new()
                    .set("x", placed.x)
                    .set("y", placed.y)
                    .set("width", placed.width)
                    .set("height", placed.height)
                    .set("fill", theme.part_fill)
                    .set("stroke", theme.part_stroke)
                    .set("stroke-width", stroke_width),
            );
        group = group.add(part_group);
    }

    let mut document = Document::new()
        .set(
            "viewBox",
            (-pad, -pad, sheet.width + 2.0 * pad, sheet.height + 2.0 * pad),
        )
        .add(group);

    if options.draw_labels {
        //labels go outside the flipped group so the text is not mirrored
        for placed in &sheet.placed {
            document = document.add(
                Text::new(format!("{}", placed.part_id))
                    .set("x", placed.x + placed.width / 2.0)
                    .set("y", sheet.height - (placed.y + placed.height / 2.0))
                    .set("text-anchor", "middle")
                    .set("dominant-baseline", "middle")
                    .set("font-size", f32::min(placed.width, placed.height) * 0.3),
            );
        }
    }

    document
}
