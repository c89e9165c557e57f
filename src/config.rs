use std::fs;
use std::path::{Path, PathBuf};

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::raster::DEFAULT_FILL_LIMIT;

pub const MIN_BRUSH_SIZE: i32 = 1;
pub const MAX_BRUSH_SIZE: i32 = 50;

/// Step used by the `+` / `-` shortcuts
pub const BRUSH_SIZE_STEP: i32 = 2;

/// Startup configuration of a paint session.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintConfig {
    pub canvas_width: usize,
    pub canvas_height: usize,
    /// RGBA, unmultiplied
    pub background_color: [u8; 4],
    pub brush_size: i32,
    pub initial_color: [u8; 4],
    /// Ignore the pointer within `drawing_bounds_margin` points of the window edge
    pub use_drawing_bounds: bool,
    pub drawing_bounds_margin: f32,
    /// Minimum time between two batched canvas applies
    pub apply_interval_secs: f64,
    pub fill_limit: usize,
    /// Where exported PNGs go; the app data directory when unset
    pub export_dir: Option<PathBuf>,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200,
            canvas_height: 1000,
            background_color: [255, 255, 255, 255],
            brush_size: 5,
            initial_color: [0, 0, 0, 255],
            use_drawing_bounds: true,
            drawing_bounds_margin: 100.0,
            apply_interval_secs: 0.05,
            fill_limit: DEFAULT_FILL_LIMIT,
            export_dir: None,
        }
    }
}

impl PaintConfig {
    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        log::info!("Loaded paint config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas must be at least 1x1, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if !self.apply_interval_secs.is_finite() || self.apply_interval_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "apply_interval_secs must be finite and non-negative, got {}",
                self.apply_interval_secs
            )));
        }
        if !self.drawing_bounds_margin.is_finite() || self.drawing_bounds_margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "drawing_bounds_margin must be finite and non-negative, got {}",
                self.drawing_bounds_margin
            )));
        }
        Ok(())
    }

    pub fn background(&self) -> Color32 {
        color_from_array(self.background_color)
    }

    pub fn initial_color(&self) -> Color32 {
        color_from_array(self.initial_color)
    }
}

/// Tool settings remembered across restarts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub tool_index: usize,
    pub color: [u8; 4],
    pub brush_size: i32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        let config = PaintConfig::default();
        Self {
            tool_index: 0,
            color: config.initial_color,
            brush_size: config.brush_size,
        }
    }
}

pub fn clamp_brush_size(size: i32) -> i32 {
    size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE)
}

pub fn color_from_array([r, g, b, a]: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

pub fn color_to_array(color: Color32) -> [u8; 4] {
    color.to_srgba_unmultiplied()
}
