use serde::{Deserialize, Serialize};

use crate::io::svg_util::SvgDrawOptions;

/// Configuration for the nestrun driver. The engine settings themselves
/// travel with the instance file; this only configures the driver's output.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct NestRunConfig {
    /// Log a progress line every n-th update.
    pub progress_log_every: usize,
    #[serde(default)]
    pub svg_draw_options: SvgDrawOptions,
}

impl Default for NestRunConfig {
    fn default() -> Self {
        Self {
            progress_log_every: 5,
            svg_draw_options: SvgDrawOptions::default(),
        }
    }
}
