use egui::{Pos2, Rect};

use super::{PaintState, StateStack, Surface};
use crate::filter::ImageFilter;
use crate::scene::{Frame, FrameId};

/// One recorded draw call with the paint state it was issued under
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    StrokePath {
        points: Vec<Pos2>,
        state: PaintState,
    },
    StrokeCircle {
        center: Pos2,
        radius: f32,
        state: PaintState,
    },
    FillCircle {
        center: Pos2,
        radius: f32,
        state: PaintState,
    },
    StrokeRect {
        rect: Rect,
        corner_radius: f32,
        state: PaintState,
    },
    FillRect {
        rect: Rect,
        corner_radius: f32,
        state: PaintState,
    },
    Frame {
        frame: FrameId,
        dest: Rect,
        filter: ImageFilter,
        alpha: f32,
    },
}

/// A surface that keeps a display list instead of pixels.
///
/// `clear` discards the list, so redrawing unchanged inputs yields an
/// identical list.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    stack: StateStack,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of `save` calls not yet matched by `restore`
    pub fn save_depth(&self) -> usize {
        self.stack.depth()
    }

    fn record(&mut self, op: DrawOp) {
        self.ops.push(op);
    }
}

impl Surface for RecordingSurface {
    fn state(&self) -> &PaintState {
        self.stack.current()
    }

    fn state_mut(&mut self) -> &mut PaintState {
        self.stack.current_mut()
    }

    fn save(&mut self) {
        self.stack.save();
    }

    fn restore(&mut self) {
        self.stack.restore();
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.record(DrawOp::Clear);
    }

    fn stroke_path(&mut self, points: &[Pos2]) {
        let state = *self.state();
        self.record(DrawOp::StrokePath {
            points: points.to_vec(),
            state,
        });
    }

    fn stroke_circle(&mut self, center: Pos2, radius: f32) {
        let state = *self.state();
        self.record(DrawOp::StrokeCircle { center, radius, state });
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32) {
        let state = *self.state();
        self.record(DrawOp::FillCircle { center, radius, state });
    }

    fn stroke_rect(&mut self, rect: Rect, corner_radius: f32) {
        let state = *self.state();
        self.record(DrawOp::StrokeRect {
            rect,
            corner_radius,
            state,
        });
    }

    fn fill_rect(&mut self, rect: Rect, corner_radius: f32) {
        let state = *self.state();
        self.record(DrawOp::FillRect {
            rect,
            corner_radius,
            state,
        });
    }

    fn draw_frame(&mut self, frame: &Frame, dest: Rect, filter: ImageFilter) {
        let alpha = self.state().alpha;
        self.record(DrawOp::Frame {
            frame: frame.id(),
            dest,
            filter,
            alpha,
        });
    }
}
