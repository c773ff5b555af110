//! Rectangle and circle, the two-anchor tools with an area.

use egui::Pos2;

use super::{keep_anchors, shape_preview};
use crate::config::ShapeStyle;
use crate::drawing::{DrawingRef, PathState, ToolKind, ViewSnapshot};
use crate::geometry::{distance, rect_from_anchors};
use crate::surface::{isolated, Surface};

fn start_shape(kind: ToolKind, style: &ShapeStyle, point: Pos2, view: ViewSnapshot) -> PathState {
    let mut state = PathState::new(kind, point, style.color, style.line_width, view);
    state.fill = style.fill;
    state.corner_radius = style.corner_radius;
    state
}

/// Axis-aligned rectangle spanning the two anchors, in any drag direction
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleTool {
    pub style: ShapeStyle,
}

impl Default for RectangleTool {
    fn default() -> Self {
        Self::new(ShapeStyle::default())
    }
}

impl RectangleTool {
    pub fn new(style: ShapeStyle) -> Self {
        Self { style }
    }

    pub fn start_drawing(&self, point: Pos2, view: ViewSnapshot) -> PathState {
        start_shape(ToolKind::Rectangle, &self.style, point, view)
    }

    pub fn continue_drawing(&self, state: &mut PathState, point: Pos2) -> bool {
        keep_anchors(state, point)
    }

    pub(crate) fn paint(&self, surface: &mut dyn Surface, drawing: DrawingRef<'_>) {
        if drawing.path.len() < ToolKind::Rectangle.min_points() {
            return;
        }
        let rect = rect_from_anchors(drawing.path[0], drawing.path[drawing.path.len() - 1]);

        isolated(surface, |surface| {
            if let Some(fill) = drawing.fill {
                surface.state_mut().fill_color = fill;
                surface.fill_rect(rect, drawing.corner_radius);
            }
            let state = surface.state_mut();
            state.stroke_color = drawing.color;
            state.line_width = drawing.line_width;
            surface.stroke_rect(rect, drawing.corner_radius);
        });
    }

    pub(crate) fn paint_preview(&self, surface: &mut dyn Surface, drawing: DrawingRef<'_>) {
        shape_preview(surface, |surface| self.paint(surface, drawing));
    }
}

/// Circle centred on the press point, with the release point on its rim
#[derive(Debug, Clone, PartialEq)]
pub struct CircleTool {
    pub style: ShapeStyle,
}

impl Default for CircleTool {
    fn default() -> Self {
        Self::new(ShapeStyle::default())
    }
}

impl CircleTool {
    pub fn new(style: ShapeStyle) -> Self {
        Self { style }
    }

    pub fn start_drawing(&self, point: Pos2, view: ViewSnapshot) -> PathState {
        start_shape(ToolKind::Circle, &self.style, point, view)
    }

    pub fn continue_drawing(&self, state: &mut PathState, point: Pos2) -> bool {
        keep_anchors(state, point)
    }

    pub(crate) fn paint(&self, surface: &mut dyn Surface, drawing: DrawingRef<'_>) {
        if drawing.path.len() < ToolKind::Circle.min_points() {
            return;
        }
        let center = drawing.path[0];
        let radius = distance(center, drawing.path[drawing.path.len() - 1]);

        isolated(surface, |surface| {
            if let Some(fill) = drawing.fill {
                surface.state_mut().fill_color = fill;
                surface.fill_circle(center, radius);
            }
            let state = surface.state_mut();
            state.stroke_color = drawing.color;
            state.line_width = drawing.line_width;
            surface.stroke_circle(center, radius);
        });
    }

    pub(crate) fn paint_preview(&self, surface: &mut dyn Surface, drawing: DrawingRef<'_>) {
        shape_preview(surface, |surface| self.paint(surface, drawing));
    }
}
