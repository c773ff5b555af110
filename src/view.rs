use egui::{Pos2, Rect, Vec2};

use crate::drawing::ViewSnapshot;

/// Maps canvas space to screen space under zoom and pan.
///
/// `screen = origin + pan + canvas * zoom`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Screen position of the canvas origin before panning
    pub origin: Pos2,
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        origin: Pos2::ZERO,
        zoom: 1.0,
        pan: Vec2::ZERO,
    };

    pub fn new(origin: Pos2, view: ViewSnapshot) -> Self {
        Self {
            origin,
            zoom: view.zoom,
            pan: view.pan,
        }
    }

    pub fn to_screen(&self, canvas: Pos2) -> Pos2 {
        self.origin + self.pan + canvas.to_vec2() * self.zoom
    }

    pub fn to_canvas(&self, screen: Pos2) -> Pos2 {
        ((screen - self.origin - self.pan) / self.zoom).to_pos2()
    }

    pub fn to_screen_rect(&self, canvas: Rect) -> Rect {
        Rect::from_min_max(self.to_screen(canvas.min), self.to_screen(canvas.max))
    }

    /// Scale a canvas-space length to screen pixels
    pub fn scale(&self, length: f32) -> f32 {
        length * self.zoom
    }

    /// Pan that keeps the canvas point under `screen` fixed when switching to `new_zoom`
    pub fn pan_for_zoom_about(&self, screen: Pos2, new_zoom: f32) -> Vec2 {
        let anchor = screen - self.origin;
        anchor - (anchor - self.pan) * (new_zoom / self.zoom)
    }
}
