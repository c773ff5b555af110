use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::crop::CropRect;
use crate::drawing::ViewSnapshot;
use crate::filter::ImageFilter;

/// Percent values accepted for brightness, contrast and saturation
pub const PERCENT_RANGE: std::ops::RangeInclusive<f32> = 0.0..=200.0;

/// Display settings for the camera frame.
///
/// Fields change only through commands so that every change can be undone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSettings {
    pub(crate) brightness: f32,
    pub(crate) contrast: f32,
    pub(crate) saturation: f32,
    pub(crate) grayscale: bool,
    pub(crate) zoom: f32,
    pub(crate) pan: Vec2,
    pub(crate) crop: Option<CropRect>,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            grayscale: false,
            zoom: 1.0,
            pan: Vec2::ZERO,
            crop: None,
        }
    }
}

impl ImageSettings {
    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    pub fn saturation(&self) -> f32 {
        self.saturation
    }

    pub fn grayscale(&self) -> bool {
        self.grayscale
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn crop(&self) -> Option<CropRect> {
        self.crop
    }

    /// Pixel filter for the background frame
    pub fn filter(&self) -> ImageFilter {
        ImageFilter::from_percent(self.brightness, self.contrast, self.saturation, self.grayscale)
    }

    /// Zoom and pan, as captured by tools when a path starts
    pub fn view(&self) -> ViewSnapshot {
        ViewSnapshot {
            zoom: self.zoom,
            pan: self.pan,
        }
    }

    pub(crate) fn apply_patch(&mut self, patch: &SettingsPatch) {
        let clamp = |value: f32| value.clamp(*PERCENT_RANGE.start(), *PERCENT_RANGE.end());
        if let Some(brightness) = patch.brightness {
            self.brightness = clamp(brightness);
        }
        if let Some(contrast) = patch.contrast {
            self.contrast = clamp(contrast);
        }
        if let Some(saturation) = patch.saturation {
            self.saturation = clamp(saturation);
        }
        if let Some(grayscale) = patch.grayscale {
            self.grayscale = grayscale;
        }
    }
}

/// Partial update of the filter settings; `None` leaves a field alone
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub brightness: Option<f32>,
    pub contrast: Option<f32>,
    pub saturation: Option<f32>,
    pub grayscale: Option<bool>,
}
