//! External (JSON) representations of the nesting instance and its solution.
//! Kept separate from the core entities so the file format can evolve
//! without touching the engine.

use serde::{Deserialize, Serialize};
use turnest::entities::{NestingConstraints, NestingSettings};
use turnest::geometry::Rotation;

/// A complete nesting instance: catalogs, schedule and engine settings.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtInstance {
    pub name: String,
    pub parts: Vec<ExtPart>,
    #[serde(default)]
    pub tools: Vec<ExtTool>,
    pub schedule: Vec<ExtScheduledPart>,
    pub settings: NestingSettings,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtPart {
    pub id: usize,
    pub name: String,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub entities: Vec<ExtEntity>,
    #[serde(default)]
    pub punches: Vec<ExtPunch>,
    pub material: String,
    pub thickness: f32,
    #[serde(default)]
    pub constraints: Option<NestingConstraints>,
    /// SVG-like path for rendering, passed through untouched.
    #[serde(default)]
    pub render_path: Option<String>,
}

/// Geometric entities in the part's local frame, angles in degrees.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtEntity {
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    Polyline {
        points: Vec<[f32; 2]>,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
    },
    Arc {
        cx: f32,
        cy: f32,
        r: f32,
        start_deg: f32,
        end_deg: f32,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtPunch {
    pub tool_id: usize,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub line_id: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtTool {
    pub id: usize,
    pub name: String,
    pub shape: ExtToolShape,
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub corner_radius: f32,
    /// Contour of a `special` tool, in its local frame.
    #[serde(default)]
    pub contour: Option<Vec<[f32; 2]>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtToolShape {
    Circle,
    Square,
    Rectangle,
    Oblong,
    Special,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtScheduledPart {
    pub part_id: usize,
    pub quantity: usize,
    #[serde(default)]
    pub constraints: Option<NestingConstraints>,
    #[serde(default)]
    pub preferred_rotation: Option<Rotation>,
}

/// The solution written next to the instance.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtSolution {
    pub instance: String,
    pub outcome: String,
    pub placed_count: usize,
    pub total_count: usize,
    pub utilization: f32,
    pub sheets: Vec<ExtResultSheet>,
    pub unplaced: Vec<ExtUnplacedItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtResultSheet {
    pub sheet_id: usize,
    pub width: f32,
    pub height: f32,
    pub material: String,
    pub quantity: usize,
    pub utilization: f32,
    pub scrap: f32,
    pub placed: Vec<ExtPlacedPart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtPlacedPart {
    pub item_id: usize,
    pub part_id: usize,
    pub x: f32,
    pub y: f32,
    pub rotation: Rotation,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtUnplacedItem {
    pub item_id: usize,
    pub part_id: usize,
    pub reason: String,
}
