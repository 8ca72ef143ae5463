//! Coordinate transformation for click targets.
//!
//! Positions in the config are captured on the operator's screen; before a
//! click they are mapped to physical pixels with
//! `round(v * scale [* dpi_scale] + offset)`.

use crate::config::GenerationConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateTransformer {
    scale: f64,
    offset: [i32; 2],
    /// `None` when DPI scaling is disabled.
    dpi_scale: Option<f64>,
}

impl Default for CoordinateTransformer {
    fn default() -> Self {
        Self::new(1.0, [0, 0], None)
    }
}

impl CoordinateTransformer {
    pub fn new(scale: f64, offset: [i32; 2], dpi_scale: Option<f64>) -> Self {
        Self {
            scale,
            offset,
            dpi_scale,
        }
    }

    /// Build from config. `probe` is only called when DPI scaling is enabled.
    pub fn from_config(config: &GenerationConfig, probe: impl FnOnce() -> f64) -> Self {
        let dpi_scale = config.use_dpi_scaling.then(probe);
        Self::new(config.coordinate_scale, config.coordinate_offset, dpi_scale)
    }

    pub fn dpi_scale(&self) -> Option<f64> {
        self.dpi_scale
    }

    pub fn adjust(&self, x: f64, y: f64) -> (i32, i32) {
        let factor = self.scale * self.dpi_scale.unwrap_or(1.0);
        (
            (x * factor + f64::from(self.offset[0])).round() as i32,
            (y * factor + f64::from(self.offset[1])).round() as i32,
        )
    }
}
