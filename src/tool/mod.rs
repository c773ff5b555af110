//! Drawing tools.
//!
//! [`Tool`] is a closed set of variants dispatched with `match`. Tools hold
//! only their default styling; everything about an open stroke lives in the
//! [`PathState`] threaded through `start_drawing`, `continue_drawing` and
//! `finish_drawing`.

pub mod brush;
pub mod eraser;
pub mod line;
pub mod manager;
pub mod shape;

pub use brush::BrushTool;
pub use eraser::EraserTool;
pub use line::LineTool;
pub use manager::ToolManager;
pub use shape::{CircleTool, RectangleTool};

use egui::{Color32, Pos2};

use crate::config::EngineConfig;
use crate::drawing::{Drawing, PathState, ToolKind, ViewSnapshot};
use crate::surface::{isolated, Dash, Surface};

const SHAPE_PREVIEW_ALPHA: f32 = 0.7;
const SHAPE_PREVIEW_DASH: Dash = Dash::new(5.0, 5.0);

#[derive(Debug, Clone, PartialEq)]
pub enum Tool {
    Brush(BrushTool),
    Line(LineTool),
    Rectangle(RectangleTool),
    Circle(CircleTool),
    Eraser(EraserTool),
}

impl Tool {
    /// Build the tool for `kind` with its defaults from `config`
    pub fn from_config(kind: ToolKind, config: &EngineConfig) -> Self {
        match kind {
            ToolKind::Brush => Tool::Brush(BrushTool::new(config.brush.clone())),
            ToolKind::Line => Tool::Line(LineTool::new(config.line.clone())),
            ToolKind::Rectangle => Tool::Rectangle(RectangleTool::new(config.rectangle.clone())),
            ToolKind::Circle => Tool::Circle(CircleTool::new(config.circle.clone())),
            ToolKind::Eraser => Tool::Eraser(EraserTool::new(config.eraser.clone())),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Tool::Brush(_) => ToolKind::Brush,
            Tool::Line(_) => ToolKind::Line,
            Tool::Rectangle(_) => ToolKind::Rectangle,
            Tool::Circle(_) => ToolKind::Circle,
            Tool::Eraser(_) => ToolKind::Eraser,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn color(&self) -> Color32 {
        match self {
            Tool::Brush(tool) => tool.settings.color,
            Tool::Line(tool) => tool.style.color,
            Tool::Rectangle(tool) => tool.style.color,
            Tool::Circle(tool) => tool.style.color,
            Tool::Eraser(_) => Color32::WHITE,
        }
    }

    pub fn line_width(&self) -> f32 {
        match self {
            Tool::Brush(tool) => tool.settings.line_width,
            Tool::Line(tool) => tool.style.line_width,
            Tool::Rectangle(tool) => tool.style.line_width,
            Tool::Circle(tool) => tool.style.line_width,
            Tool::Eraser(tool) => tool.radius() * 2.0,
        }
    }

    /// Change the default color for future paths. The eraser has no color.
    pub fn set_color(&mut self, color: Color32) {
        match self {
            Tool::Brush(tool) => tool.settings.color = color,
            Tool::Line(tool) => tool.style.color = color,
            Tool::Rectangle(tool) => tool.style.color = color,
            Tool::Circle(tool) => tool.style.color = color,
            Tool::Eraser(_) => {}
        }
    }

    /// Change the default width for future paths. For the eraser this sets
    /// the footprint diameter.
    pub fn set_line_width(&mut self, width: f32) {
        let width = width.max(0.5);
        match self {
            Tool::Brush(tool) => tool.settings.line_width = width,
            Tool::Line(tool) => tool.style.line_width = width,
            Tool::Rectangle(tool) => tool.style.line_width = width,
            Tool::Circle(tool) => tool.style.line_width = width,
            Tool::Eraser(tool) => tool.set_radius(width / 2.0),
        }
    }

    /// Open a new path seeded with `point`
    pub fn start_drawing(&self, point: Pos2, view: ViewSnapshot) -> PathState {
        match self {
            Tool::Brush(tool) => tool.start_drawing(point, view),
            Tool::Line(tool) => tool.start_drawing(point, view),
            Tool::Rectangle(tool) => tool.start_drawing(point, view),
            Tool::Circle(tool) => tool.start_drawing(point, view),
            Tool::Eraser(tool) => tool.start_drawing(point, view),
        }
    }

    /// Feed the next pointer sample into `state`. Returns false if the
    /// sample was rejected and `state` is unchanged.
    pub fn continue_drawing(&self, state: &mut PathState, point: Pos2, now_ms: f64) -> bool {
        match self {
            Tool::Brush(tool) => tool.continue_drawing(state, point, now_ms),
            Tool::Line(tool) => tool.continue_drawing(state, point),
            Tool::Rectangle(tool) => tool.continue_drawing(state, point),
            Tool::Circle(tool) => tool.continue_drawing(state, point),
            Tool::Eraser(tool) => tool.continue_drawing(state, point),
        }
    }

    /// Freeze `state` into a committed drawing with a fresh id
    pub fn finish_drawing(&self, state: PathState) -> Drawing {
        state.freeze()
    }

    /// Draw a committed drawing. Drawings with too few points draw nothing,
    /// and eraser drawings are never painted.
    pub fn render(&self, surface: &mut dyn Surface, drawing: &Drawing) {
        let view = drawing.view();
        match self {
            Tool::Brush(tool) => tool.paint(surface, view),
            Tool::Line(tool) => tool.paint(surface, view),
            Tool::Rectangle(tool) => tool.paint(surface, view),
            Tool::Circle(tool) => tool.paint(surface, view),
            Tool::Eraser(_) => {}
        }
    }

    /// Draw an open path, translucent (and dashed for shapes) to set it apart
    /// from committed drawings
    pub fn render_preview(&self, surface: &mut dyn Surface, state: &PathState) {
        let view = state.view();
        match self {
            Tool::Brush(tool) => tool.paint_preview(surface, view),
            Tool::Line(tool) => tool.paint_preview(surface, view),
            Tool::Rectangle(tool) => tool.paint_preview(surface, view),
            Tool::Circle(tool) => tool.paint_preview(surface, view),
            Tool::Eraser(tool) => tool.paint_preview(surface, view),
        }
    }
}

/// Two-anchor update: keep the press point and replace everything after it with `point`
fn keep_anchors(state: &mut PathState, point: Pos2) -> bool {
    state.path.truncate(1);
    state.path.push(point);
    true
}

fn shape_preview(surface: &mut dyn Surface, paint: impl FnOnce(&mut dyn Surface)) {
    isolated(surface, |surface| {
        let state = surface.state_mut();
        state.alpha *= SHAPE_PREVIEW_ALPHA;
        state.dash = Some(SHAPE_PREVIEW_DASH);
        paint(surface);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};

    #[test]
    fn test_two_anchor_tools_keep_two_points() {
        let config = EngineConfig::default();
        for kind in [ToolKind::Line, ToolKind::Rectangle, ToolKind::Circle] {
            let tool = Tool::from_config(kind, &config);
            let mut state = tool.start_drawing(Pos2::new(3.0, 4.0), ViewSnapshot::default());
            for n in 1..=25 {
                tool.continue_drawing(&mut state, Pos2::new(n as f32, n as f32 * 2.0), n as f64);
                assert_eq!(state.path().len(), 2);
            }
            assert_eq!(state.path()[0], Pos2::new(3.0, 4.0));
            assert_eq!(state.path()[1], Pos2::new(25.0, 50.0));
            assert_eq!(tool.finish_drawing(state).tool(), kind);
        }
    }

    #[test]
    fn test_eraser_drawing_is_never_rendered() {
        let tool = Tool::from_config(ToolKind::Eraser, &EngineConfig::default());
        let mut state = tool.start_drawing(Pos2::ZERO, ViewSnapshot::default());
        tool.continue_drawing(&mut state, Pos2::new(10.0, 0.0), 0.0);
        assert_eq!(state.path().len(), 2);

        let mut surface = RecordingSurface::new();
        tool.render_preview(&mut surface, &state);
        assert!(!surface.ops().is_empty());

        let drawing = tool.finish_drawing(state);
        let mut surface = RecordingSurface::new();
        tool.render(&mut surface, &drawing);
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_circle_renders_around_press_point() {
        let tool = Tool::from_config(ToolKind::Circle, &EngineConfig::default());
        let mut state = tool.start_drawing(Pos2::new(100.0, 100.0), ViewSnapshot::default());
        tool.continue_drawing(&mut state, Pos2::new(110.0, 100.0), 0.0);
        let drawing = tool.finish_drawing(state);

        let mut surface = RecordingSurface::new();
        tool.render(&mut surface, &drawing);
        assert!(matches!(
            surface.ops(),
            [DrawOp::StrokeCircle { center, radius, .. }]
                if *center == Pos2::new(100.0, 100.0) && *radius == 10.0
        ));
    }

    #[test]
    fn test_eraser_width_maps_to_clamped_radius() {
        let mut tool = Tool::from_config(ToolKind::Eraser, &EngineConfig::default());
        tool.set_line_width(40.0);
        assert_eq!(tool.line_width(), 40.0);
        tool.set_line_width(400.0);
        assert_eq!(tool.line_width(), 100.0);
        tool.set_color(Color32::GREEN);
        assert_eq!(tool.color(), Color32::WHITE);
    }
}
