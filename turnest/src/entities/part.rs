use std::collections::HashMap;

use anyhow::{Result, ensure};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::entities::ToolCatalog;
use crate::geometry::primitives::{Point, Rect};
use crate::geometry::{Entity, Extents, Rotation, point_inside_contour};

/// Sheet material of a part or stock sheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub thickness: f32,
}

/// Which placements are permitted for a part during nesting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestingConstraints {
    /// Permits placing the part rotated by 180°. 0° is always legal.
    pub allow_0_180: bool,
    /// Permits placing the part rotated by 90° or 270°.
    pub allow_90_270: bool,
    pub allow_mirror: bool,
    pub allow_common_line: bool,
}

impl NestingConstraints {
    /// The legal rotation set, in the fixed order placements are attempted.
    pub fn allowed_rotations(&self) -> Vec<Rotation> {
        let mut rotations = vec![Rotation::R0];
        if self.allow_0_180 {
            rotations.push(Rotation::R180);
        }
        if self.allow_90_270 {
            rotations.push(Rotation::R90);
            rotations.push(Rotation::R270);
        }
        rotations
    }
}

impl Default for NestingConstraints {
    fn default() -> Self {
        NestingConstraints {
            allow_0_180: true,
            allow_90_270: true,
            allow_mirror: false,
            allow_common_line: false,
        }
    }
}

/// Outline of a part in a local normalized coordinate frame with the origin
/// at the bounding-box minimum corner.
#[derive(Clone, Debug)]
pub struct PartGeometry {
    /// Geometric entities making up the outline and any interior holes.
    pub entities: Vec<Entity>,
    pub bbox: Rect,
    pub width: f32,
    pub height: f32,
    /// SVG-like path for rendering. Not consulted by the packer.
    pub render_path: Option<String>,
}

impl PartGeometry {
    /// True iff the point lies inside the part's material.
    /// A geometry with no entities contains nothing (the part then nests by
    /// its stated bounding rectangle only).
    pub fn contains_point(&self, point: Point) -> bool {
        point_inside_contour(point, &self.entities, self.bbox)
    }
}

/// One strike of a tool mounted on a part, in part-local coordinates.
/// Punches belonging to one nibble run share a `line_id`.
#[derive(Clone, Debug)]
pub struct PlacedPunch {
    pub tool_id: usize,
    pub x: f32,
    pub y: f32,
    /// Rotation of the tool at the strike, in degrees.
    pub rotation: f32,
    pub line_id: Option<usize>,
}

/// Immutable part catalog entry.
#[derive(Clone, Debug)]
pub struct Part {
    pub id: usize,
    pub name: String,
    pub geometry: PartGeometry,
    pub punches: Vec<PlacedPunch>,
    pub material: Material,
    pub constraints: NestingConstraints,
}

impl Part {
    /// Axis-aligned bounding footprint of the part at `rotation`: the corners
    /// of the part's bounding rectangle unioned with every mounted punch's
    /// rotated tool footprint.
    ///
    /// This is deliberately a conservative bounding rectangle of polygon and
    /// tooling, not the true polygon; only the raster mask consults the true
    /// contour.
    pub fn rotated_extents(&self, tools: &ToolCatalog, rotation: Rotation) -> Extents {
        let g = &self.geometry;
        let mut points: Vec<Point> = Rect {
            x_min: 0.0,
            y_min: 0.0,
            x_max: g.width,
            y_max: g.height,
        }
        .corners()
        .iter()
        .map(|c| c.rotated_quarter(rotation))
        .collect();

        for punch in &self.punches {
            let Some(tool) = tools.get(punch.tool_id) else {
                debug!(
                    "[PART] part {} references unknown tool {}, punch ignored for extents",
                    self.id, punch.tool_id
                );
                continue;
            };
            let (tw, th) = tool.footprint();
            let strike = Point(punch.x, punch.y).rotated_quarter(rotation);
            let angle = punch.rotation.to_radians() + rotation.radians();
            for corner in [
                Point(-tw / 2.0, -th / 2.0),
                Point(tw / 2.0, -th / 2.0),
                Point(tw / 2.0, th / 2.0),
                Point(-tw / 2.0, th / 2.0),
            ] {
                let c = corner.rotated(angle);
                points.push(Point(strike.0 + c.0, strike.1 + c.1));
            }
        }

        Extents::of_points(points).unwrap_or(Extents {
            width: g.width,
            height: g.height,
            ox: 0.0,
            oy: 0.0,
        })
    }
}

/// Immutable part catalog snapshot, passed into the nesting run at start.
#[derive(Clone, Debug, Default)]
pub struct PartCatalog {
    parts: HashMap<usize, Part>,
}

impl PartCatalog {
    pub fn new(parts: impl IntoIterator<Item = Part>) -> Result<Self> {
        let mut map = HashMap::new();
        for part in parts {
            ensure!(
                map.insert(part.id, part).is_none(),
                "duplicate part id in catalog"
            );
        }
        Ok(PartCatalog { parts: map })
    }

    pub fn get(&self, id: usize) -> Option<&Part> {
        self.parts.get(&id)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Tool, ToolShape};

    fn rect_part(id: usize, w: f32, h: f32) -> Part {
        let pts = vec![
            Point(0.0, 0.0),
            Point(w, 0.0),
            Point(w, h),
            Point(0.0, h),
            Point(0.0, 0.0),
        ];
        Part {
            id,
            name: format!("part_{id}"),
            geometry: PartGeometry {
                entities: vec![Entity::Polyline(pts)],
                bbox: Rect::try_new(0.0, 0.0, w, h).unwrap(),
                width: w,
                height: h,
                render_path: None,
            },
            punches: vec![],
            material: Material {
                name: "DC01".into(),
                thickness: 1.5,
            },
            constraints: NestingConstraints::default(),
        }
    }

    #[test]
    fn extents_of_plain_rectangle() {
        let part = rect_part(0, 30.0, 20.0);
        let tools = ToolCatalog::default();

        let e0 = part.rotated_extents(&tools, Rotation::R0);
        assert_eq!((e0.width, e0.height, e0.ox, e0.oy), (30.0, 20.0, 0.0, 0.0));

        let e90 = part.rotated_extents(&tools, Rotation::R90);
        assert_eq!((e90.width, e90.height), (20.0, 30.0));
        assert_eq!((e90.ox, e90.oy), (20.0, 0.0));
    }

    #[test]
    fn punch_overhang_grows_extents() {
        let mut part = rect_part(0, 30.0, 20.0);
        //oblong punch centered on the part's right edge, sticking out 5mm
        part.punches.push(PlacedPunch {
            tool_id: 7,
            x: 30.0,
            y: 10.0,
            rotation: 0.0,
            line_id: None,
        });
        let tools = ToolCatalog::new([Tool {
            id: 7,
            name: "OB10x4".into(),
            shape: ToolShape::Oblong,
            width: 10.0,
            height: 4.0,
            corner_radius: 2.0,
        }])
        .unwrap();

        let e = part.rotated_extents(&tools, Rotation::R0);
        assert_eq!(e.width, 35.0);
        assert_eq!(e.height, 20.0);
        assert_eq!(e.ox, 0.0);
    }

    #[test]
    fn unknown_tool_is_ignored() {
        let mut part = rect_part(0, 30.0, 20.0);
        part.punches.push(PlacedPunch {
            tool_id: 99,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            line_id: None,
        });
        let e = part.rotated_extents(&ToolCatalog::default(), Rotation::R0);
        assert_eq!((e.width, e.height), (30.0, 20.0));
    }
}
