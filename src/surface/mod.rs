//! The 2D raster context tools paint into.
//!
//! A [`Surface`] carries a mutable [`PaintState`] (colors, width, alpha,
//! dash) that draw calls read, and a save/restore stack so every render
//! routine can leave the state exactly as it found it. Surfaces are passed in
//! fresh for every redraw; nothing holds on to one between calls.

mod painter;
mod recording;

pub use painter::PainterSurface;
pub use recording::{DrawOp, RecordingSurface};

use egui::{Color32, Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::filter::ImageFilter;
use crate::scene::Frame;

/// Dash pattern in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dash {
    pub on: f32,
    pub off: f32,
}

impl Dash {
    pub const fn new(on: f32, off: f32) -> Self {
        Self { on, off }
    }
}

/// Paint state read by every draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintState {
    pub stroke_color: Color32,
    pub fill_color: Color32,
    pub line_width: f32,
    /// Global alpha multiplied into every color, `1.0` is opaque
    pub alpha: f32,
    pub dash: Option<Dash>,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            stroke_color: Color32::BLACK,
            fill_color: Color32::BLACK,
            line_width: 1.0,
            alpha: 1.0,
            dash: None,
        }
    }
}

impl PaintState {
    pub fn effective_stroke(&self) -> Color32 {
        self.stroke_color.gamma_multiply(self.alpha)
    }

    pub fn effective_fill(&self) -> Color32 {
        self.fill_color.gamma_multiply(self.alpha)
    }
}

/// Current paint state plus the saved copies pushed by `save`
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: PaintState,
    saved: Vec<PaintState>,
}

impl StateStack {
    pub fn current(&self) -> &PaintState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut PaintState {
        &mut self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Unbalanced restores are ignored, like a canvas context does
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn reset(&mut self) {
        self.current = PaintState::default();
        self.saved.clear();
    }
}

pub trait Surface {
    fn state(&self) -> &PaintState;

    fn state_mut(&mut self) -> &mut PaintState;

    fn save(&mut self);

    fn restore(&mut self);

    /// Wipe the raster before a full redraw
    fn clear(&mut self);

    /// Stroke an open polyline with the current stroke color, width and dash
    fn stroke_path(&mut self, points: &[Pos2]);

    fn stroke_circle(&mut self, center: Pos2, radius: f32);

    fn fill_circle(&mut self, center: Pos2, radius: f32);

    fn stroke_rect(&mut self, rect: Rect, corner_radius: f32);

    fn fill_rect(&mut self, rect: Rect, corner_radius: f32);

    /// Paint `frame` stretched over `dest` with `filter` applied
    fn draw_frame(&mut self, frame: &Frame, dest: Rect, filter: ImageFilter);
}

/// Run `paint` between `save` and `restore` so nothing it sets leaks out
pub fn isolated(surface: &mut dyn Surface, paint: impl FnOnce(&mut dyn Surface)) {
    surface.save();
    paint(surface);
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_stack_restores_exactly() {
        let mut stack = StateStack::default();
        let before = *stack.current();
        stack.save();
        stack.current_mut().line_width = 9.0;
        stack.current_mut().dash = Some(Dash::new(5.0, 5.0));
        stack.restore();
        assert_eq!(*stack.current(), before);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_unbalanced_restore_is_ignored() {
        let mut stack = StateStack::default();
        stack.current_mut().alpha = 0.5;
        stack.restore();
        assert_eq!(stack.current().alpha, 0.5);
    }
}
