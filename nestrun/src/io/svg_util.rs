use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SvgDrawOptions {
    /// Multiplier on the stroke width derived from the sheet size.
    #[serde(default = "default_stroke_multiplier")]
    pub stroke_width_multiplier: f32,
    /// Draw hatched clamp protection zones.
    #[serde(default = "default_true")]
    pub draw_clamps: bool,
    /// Annotate placed parts with their part id.
    #[serde(default = "default_true")]
    pub draw_labels: bool,
}

fn default_stroke_multiplier() -> f32 {
    2.0
}

fn default_true() -> bool {
    true
}

impl Default for SvgDrawOptions {
    fn default() -> Self {
        Self {
            stroke_width_multiplier: default_stroke_multiplier(),
            draw_clamps: default_true(),
            draw_labels: default_true(),
        }
    }
}

pub struct SvgTheme {
    pub sheet_fill: &'static str,
    pub part_fill: &'static str,
    pub part_stroke: &'static str,
    pub clamp_fill: &'static str,
}

pub const DEFAULT_THEME: SvgTheme = SvgTheme {
    sheet_fill: "#FAFAFA",
    part_fill: "#BFDBF7",
    part_stroke: "#1F3A5F",
    clamp_fill: "#E8A0A0",
};
