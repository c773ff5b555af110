//! Engine configuration, loadable from JSON.
//!
//! Every struct uses `#[serde(default)]` so a config file only needs to name
//! the values it overrides.

use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Freehand brush settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub color: Color32,
    /// Base width, modulated by pressure between `min_line_width` and `max_line_width`
    pub line_width: f32,
    /// Points closer than this to the last accepted point are dropped
    pub min_distance: f32,
    /// Longer gaps are filled with evenly spaced points
    pub max_distance: f32,
    /// How strongly pointer speed thins the stroke (0..1)
    pub pressure_sensitivity: f32,
    pub min_line_width: f32,
    pub max_line_width: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Color32::RED,
            line_width: 3.0,
            min_distance: 3.0,
            max_distance: 15.0,
            pressure_sensitivity: 0.3,
            min_line_width: 1.0,
            max_line_width: 8.0,
        }
    }
}

impl BrushSettings {
    /// Clamp every field into its valid range, keeping the pairs ordered
    pub fn sanitized(mut self) -> Self {
        self.min_distance = self.min_distance.max(1.0);
        self.max_distance = self.max_distance.max(self.min_distance);
        self.pressure_sensitivity = self.pressure_sensitivity.clamp(0.0, 1.0);
        self.min_line_width = self.min_line_width.max(0.5);
        self.max_line_width = self.max_line_width.max(self.min_line_width);
        self
    }
}

/// Styling for the two-anchor tools (line, rectangle, circle)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeStyle {
    pub color: Color32,
    pub line_width: f32,
    /// When set, the shape is filled with this color before the outline is stroked
    pub fill: Option<Color32>,
    /// Corner radius, only used by the rectangle
    pub corner_radius: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: Color32::BLACK,
            line_width: 2.0,
            fill: None,
            corner_radius: 0.0,
        }
    }
}

impl ShapeStyle {
    pub fn with_color(color: Color32) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EraserSettings {
    pub radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for EraserSettings {
    fn default() -> Self {
        Self {
            radius: 15.0,
            min_radius: 5.0,
            max_radius: 50.0,
        }
    }
}

impl EraserSettings {
    pub fn clamp_radius(&self, radius: f32) -> f32 {
        radius.clamp(self.min_radius, self.max_radius)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    pub min: f32,
    pub max: f32,
    /// Multiplicative factor for one zoom-in / zoom-out step
    pub step: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 0.2,
            max: 5.0,
            step: 1.1,
        }
    }
}

impl ZoomLimits {
    pub fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropSettings {
    /// Upper bound for the initial box width
    pub max_initial_size: f32,
    /// Initial box width as a fraction of the target's shorter side
    pub initial_fraction: f32,
    pub handle_radius: f32,
    /// Smallest displayed width or height a resize may produce
    pub min_size: f32,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            max_initial_size: 300.0,
            initial_fraction: 0.8,
            handle_radius: crate::geometry::hit_testing::RESIZE_HANDLE_RADIUS,
            min_size: 10.0,
        }
    }
}

/// Top-level configuration for the annotation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub brush: BrushSettings,
    pub line: ShapeStyle,
    pub rectangle: ShapeStyle,
    pub circle: ShapeStyle,
    pub eraser: EraserSettings,
    pub zoom: ZoomLimits,
    pub crop: CropSettings,
    /// Oldest history entries are dropped beyond this many
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            brush: BrushSettings::default(),
            line: ShapeStyle::with_color(Color32::BLACK),
            rectangle: ShapeStyle::with_color(Color32::GREEN),
            circle: ShapeStyle::with_color(Color32::BLUE),
            eraser: EraserSettings::default(),
            zoom: ZoomLimits::default(),
            crop: CropSettings::default(),
            history_limit: 100,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zoom.min > 0.0 && self.zoom.min <= self.zoom.max) {
            return Err(ConfigError::Invalid(format!(
                "zoom range must satisfy 0 < min <= max, got [{}, {}]",
                self.zoom.min, self.zoom.max
            )));
        }
        if self.zoom.step <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "zoom step must be greater than 1, got {}",
                self.zoom.step
            )));
        }
        if !(self.eraser.min_radius > 0.0 && self.eraser.min_radius <= self.eraser.max_radius) {
            return Err(ConfigError::Invalid(format!(
                "eraser radius range must satisfy 0 < min <= max, got [{}, {}]",
                self.eraser.min_radius, self.eraser.max_radius
            )));
        }
        if !(self.crop.initial_fraction > 0.0 && self.crop.initial_fraction <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "crop initial_fraction must be in (0, 1], got {}",
                self.crop.initial_fraction
            )));
        }
        if self.crop.min_size <= 0.0 || self.crop.max_initial_size < self.crop.min_size {
            return Err(ConfigError::Invalid(
                "crop sizes must be positive and max_initial_size >= min_size".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "brush": { "max_distance": 20.0 }, "history_limit": 5 }"#)
            .expect("valid config");
        assert_eq!(config.brush.max_distance, 20.0);
        assert_eq!(config.brush.min_distance, 3.0);
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.zoom, ZoomLimits::default());
    }

    #[test]
    fn test_invalid_zoom_range_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "zoom": { "min": 3.0, "max": 1.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_brush_sanitize_orders_ranges() {
        let settings = BrushSettings {
            min_distance: 0.0,
            max_distance: 0.5,
            pressure_sensitivity: 4.0,
            min_line_width: 3.0,
            max_line_width: 1.0,
            ..BrushSettings::default()
        }
        .sanitized();
        assert_eq!(settings.min_distance, 1.0);
        assert_eq!(settings.max_distance, 1.0);
        assert_eq!(settings.pressure_sensitivity, 1.0);
        assert_eq!(settings.max_line_width, 3.0);
    }
}
