use crate::foundation::color::Rgb;
use crate::foundation::error::{DotqrError, DotqrResult};

/// How non-finder modules are drawn. Finder patterns are rendered as
/// concentric rings in `Circular` style and left to the generic
/// per-module rule in `Square` style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Style {
    Circular,
    Square,
}

/// Geometry and palette for one render request. Fully determines the
/// output; the backends take no hidden defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderConfig {
    /// Native pixels per module in the raster path.
    pub module_size: u32,
    /// Blank border width around the symbol, in modules. One value,
    /// applied identically by both backends.
    pub quiet_zone: u32,
    /// Side length of the final output, in pixels (raster) or markup
    /// units (vector).
    pub output_size: u32,
    pub foreground: Rgb,
    pub background: Rgb,
    pub style: Style,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            module_size: 40,
            quiet_zone: 4,
            output_size: 1000,
            foreground: Rgb::BLACK,
            background: Rgb::WHITE,
            style: Style::Circular,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> DotqrResult<()> {
        if self.module_size == 0 {
            return Err(DotqrError::invalid_config("module_size must be > 0"));
        }
        if self.output_size == 0 {
            return Err(DotqrError::invalid_config("output_size must be > 0"));
        }
        Ok(())
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Symbol side length plus both quiet-zone borders, in modules.
    pub fn total_modules(&self, matrix_size: usize) -> usize {
        matrix_size + 2 * self.quiet_zone as usize
    }

    /// Module pitch in the raster backend's native pixel space.
    pub fn native_pitch(&self) -> f64 {
        f64::from(self.module_size)
    }

    /// Module pitch in the vector backend's output-unit space.
    pub fn unit_pitch(&self, matrix_size: usize) -> f64 {
        f64::from(self.output_size) / self.total_modules(matrix_size) as f64
    }
}
