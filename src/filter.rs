//! Brightness / contrast / saturation / grayscale applied to a frame before
//! it is painted. Follows the CSS filter-function math, in that order.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Multipliers where `1.0` is neutral
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageFilter {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub grayscale: bool,
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Hashable form of an [`ImageFilter`], used as a cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterKey([u32; 3], bool);

impl ImageFilter {
    pub const NEUTRAL: Self = Self {
        brightness: 1.0,
        contrast: 1.0,
        saturation: 1.0,
        grayscale: false,
    };

    /// Build from percentages in `0..=200` where 100 is neutral
    pub fn from_percent(brightness: f32, contrast: f32, saturation: f32, grayscale: bool) -> Self {
        Self {
            brightness: brightness / 100.0,
            contrast: contrast / 100.0,
            saturation: saturation / 100.0,
            grayscale,
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    pub fn key(&self) -> FilterKey {
        FilterKey(
            [
                self.brightness.to_bits(),
                self.contrast.to_bits(),
                self.saturation.to_bits(),
            ],
            self.grayscale,
        )
    }

    /// Filtered copy of `source`; alpha is left untouched
    pub fn apply(&self, source: &RgbaImage) -> RgbaImage {
        let mut output = source.clone();
        if self.is_neutral() {
            return output;
        }
        for pixel in output.pixels_mut() {
            let [r, g, b, a] = pixel.0;
            let [r, g, b] = self.apply_rgb([r, g, b]);
            pixel.0 = [r, g, b, a];
        }
        output
    }

    fn apply_rgb(&self, rgb: [u8; 3]) -> [u8; 3] {
        let mut c = rgb.map(|v| v as f32 / 255.0);

        for v in c.iter_mut() {
            *v = (*v * self.brightness).clamp(0.0, 1.0);
        }
        for v in c.iter_mut() {
            *v = ((*v - 0.5) * self.contrast + 0.5).clamp(0.0, 1.0);
        }
        c = saturate(c, self.saturation);
        if self.grayscale {
            c = saturate(c, 0.0);
        }

        c.map(|v| (v * 255.0).round() as u8)
    }
}

// CSS saturate() color matrix
fn saturate([r, g, b]: [f32; 3], s: f32) -> [f32; 3] {
    [
        ((0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b).clamp(0.0, 1.0),
        ((0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b).clamp(0.0, 1.0),
        ((0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b).clamp(0.0, 1.0),
    ]
}
