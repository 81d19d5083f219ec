use std::collections::HashMap;

use anyhow::{Result, ensure};

use crate::geometry::Extents;
use crate::geometry::primitives::Point;

/// Physical footprint of a punch tool.
///
/// Used only to compute the effective occupied footprint of a part
/// (outline ∪ punch extents); never for collision testing itself.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolShape {
    Circle,
    Square,
    Rectangle,
    Oblong,
    /// Custom contour, as a point cloud in the tool's local frame centered on
    /// the strike point.
    Special(Vec<Point>),
}

/// Catalog entry describing a punch tool.
#[derive(Clone, Debug)]
pub struct Tool {
    pub id: usize,
    pub name: String,
    pub shape: ToolShape,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
}

impl Tool {
    /// Width and height of the tool's bounding footprint, centered on the
    /// strike point. Circles and squares are symmetric in `width`.
    pub fn footprint(&self) -> (f32, f32) {
        match &self.shape {
            ToolShape::Circle | ToolShape::Square => (self.width, self.width),
            ToolShape::Rectangle | ToolShape::Oblong => (self.width, self.height),
            ToolShape::Special(contour) => match Extents::of_points(contour.iter().copied()) {
                Some(e) => (e.width, e.height),
                None => (self.width, self.height),
            },
        }
    }
}

/// Immutable tool catalog snapshot, passed into the nesting run at start.
#[derive(Clone, Debug, Default)]
pub struct ToolCatalog {
    tools: HashMap<usize, Tool>,
}

impl ToolCatalog {
    pub fn new(tools: impl IntoIterator<Item = Tool>) -> Result<Self> {
        let mut map = HashMap::new();
        for tool in tools {
            ensure!(
                map.insert(tool.id, tool).is_none(),
                "duplicate tool id in catalog"
            );
        }
        Ok(ToolCatalog { tools: map })
    }

    pub fn get(&self, id: usize) -> Option<&Tool> {
        self.tools.get(&id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
