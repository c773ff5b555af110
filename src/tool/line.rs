use egui::Pos2;

use super::{keep_anchors, shape_preview};
use crate::config::ShapeStyle;
use crate::drawing::{DrawingRef, PathState, ToolKind, ViewSnapshot};
use crate::surface::{isolated, Surface};

/// Straight segment between the press point and the release point
#[derive(Debug, Clone, PartialEq)]
pub struct LineTool {
    pub style: ShapeStyle,
}

impl Default for LineTool {
    fn default() -> Self {
        Self::new(ShapeStyle::default())
    }
}

impl LineTool {
    pub fn new(style: ShapeStyle) -> Self {
        Self { style }
    }

    pub fn start_drawing(&self, point: Pos2, view: ViewSnapshot) -> PathState {
        PathState::new(ToolKind::Line, point, self.style.color, self.style.line_width, view)
    }

    pub fn continue_drawing(&self, state: &mut PathState, point: Pos2) -> bool {
        keep_anchors(state, point)
    }

    pub(crate) fn paint(&self, surface: &mut dyn Surface, drawing: DrawingRef<'_>) {
        let (Some(start), Some(end)) = (drawing.path.first(), drawing.path.last()) else {
            return;
        };
        if drawing.path.len() < ToolKind::Line.min_points() {
            return;
        }

        isolated(surface, |surface| {
            let state = surface.state_mut();
            state.stroke_color = drawing.color;
            state.line_width = drawing.line_width;
            surface.stroke_path(&[*start, *end]);
        });
    }

    pub(crate) fn paint_preview(&self, surface: &mut dyn Surface, drawing: DrawingRef<'_>) {
        shape_preview(surface, |surface| self.paint(surface, drawing));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Dash, DrawOp, RecordingSurface};

    #[test]
    fn test_line_keeps_only_endpoints() {
        let line = LineTool::default();
        let mut state = line.start_drawing(Pos2::new(1.0, 1.0), ViewSnapshot::default());
        for i in 0..10 {
            line.continue_drawing(&mut state, Pos2::new(i as f32 * 3.0, 7.0));
        }
        assert_eq!(state.path(), &[Pos2::new(1.0, 1.0), Pos2::new(27.0, 7.0)]);
    }

    #[test]
    fn test_preview_is_dashed_and_translucent() {
        let line = LineTool::default();
        let mut state = line.start_drawing(Pos2::ZERO, ViewSnapshot::default());
        line.continue_drawing(&mut state, Pos2::new(10.0, 0.0));

        let mut surface = RecordingSurface::new();
        line.paint_preview(&mut surface, state.view());
        match surface.ops() {
            [DrawOp::StrokePath { state, .. }] => {
                assert_eq!(state.dash, Some(Dash::new(5.0, 5.0)));
                assert!((state.alpha - 0.7).abs() < 1e-6);
            }
            ops => panic!("unexpected ops {ops:?}"),
        }
        assert_eq!(surface.save_depth(), 0);
        assert_eq!(surface.state().dash, None);
    }
}
