//! The eraser records a path of circular footprints. It never paints into the
//! composited image; committing an eraser path splits the drawings it covers.

use egui::{Color32, Pos2};

use super::brush::slice_stroke;
use crate::config::EraserSettings;
use crate::drawing::{Drawing, DrawingId, DrawingRef, PathState, ToolData, ToolKind, ViewSnapshot};
use crate::geometry::{distance, segment_intersects_circle};
use crate::surface::{isolated, Dash, Surface};

const ERASER_LINE_WIDTH: f32 = 10.0;
const FOOTPRINT_FILL: Color32 = Color32::from_rgba_premultiplied(51, 0, 0, 51);
const FOOTPRINT_STROKE: Color32 = Color32::from_rgba_premultiplied(153, 0, 0, 153);
const CURSOR_STROKE: Color32 = Color32::from_rgba_premultiplied(204, 0, 0, 204);
const CURSOR_DOT: Color32 = Color32::from_rgba_premultiplied(179, 0, 0, 179);
const CURSOR_DOT_RADIUS: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EraserTool {
    pub settings: EraserSettings,
}

impl Default for EraserTool {
    fn default() -> Self {
        Self::new(EraserSettings::default())
    }
}

impl EraserTool {
    pub fn new(mut settings: EraserSettings) -> Self {
        settings.radius = settings.clamp_radius(settings.radius);
        Self { settings }
    }

    pub fn radius(&self) -> f32 {
        self.settings.radius
    }

    /// Set the footprint radius, clamped to the configured range
    pub fn set_radius(&mut self, radius: f32) {
        self.settings.radius = self.settings.clamp_radius(radius);
    }

    pub fn start_drawing(&self, point: Pos2, view: ViewSnapshot) -> PathState {
        let mut state = PathState::new(ToolKind::Eraser, point, Color32::WHITE, ERASER_LINE_WIDTH, view);
        state.data = ToolData::Eraser {
            radius: self.settings.radius,
        };
        state
    }

    /// Every pointer sample is kept
    pub fn continue_drawing(&self, state: &mut PathState, point: Pos2) -> bool {
        state.path.push(point);
        true
    }

    /// Footprint circles along the path plus a cursor ring at the newest point
    pub(crate) fn paint_preview(&self, surface: &mut dyn Surface, drawing: DrawingRef<'_>) {
        let radius = match drawing.data {
            ToolData::Eraser { radius } => *radius,
            _ => self.settings.radius,
        };
        let Some(cursor) = drawing.path.last().copied() else {
            return;
        };

        isolated(surface, |surface| {
            let state = surface.state_mut();
            state.stroke_color = FOOTPRINT_STROKE;
            state.fill_color = FOOTPRINT_FILL;
            state.line_width = 2.0;
            state.dash = Some(Dash::new(3.0, 3.0));
            for point in drawing.path {
                surface.fill_circle(*point, radius);
                surface.stroke_circle(*point, radius);
            }
        });

        isolated(surface, |surface| {
            let state = surface.state_mut();
            state.stroke_color = CURSOR_STROKE;
            state.fill_color = CURSOR_DOT;
            state.line_width = 2.0;
            state.dash = Some(Dash::new(5.0, 5.0));
            surface.stroke_circle(cursor, radius);
            surface.fill_circle(cursor, CURSOR_DOT_RADIUS);
        });
    }
}

/// True if `point` lies within `radius` of `eraser_point`
pub fn point_in_range(point: Pos2, eraser_point: Pos2, radius: f32) -> bool {
    distance(point, eraser_point) <= radius
}

/// True if any vertex of `path` is within `radius` of any eraser point
pub fn intersects(path: &[Pos2], eraser_path: &[Pos2], radius: f32) -> bool {
    path.iter()
        .any(|p| eraser_path.iter().any(|e| point_in_range(*p, *e, radius)))
}

/// Like [`intersects`], but also catches segments passing under the eraser
/// with both endpoints outside its footprint
pub fn crosses(path: &[Pos2], eraser_path: &[Pos2], radius: f32) -> bool {
    if intersects(path, eraser_path, radius) {
        return true;
    }
    path.windows(2).any(|segment| {
        eraser_path
            .iter()
            .any(|e| segment_intersects_circle(segment[0], segment[1], *e, radius))
    })
}

/// Remove every vertex of `drawing` within `radius` of the eraser path and
/// split what is left into runs of at least two points.
///
/// Returns no drawings when nothing survives, the drawing under its own id
/// when one run survives, and fresh ids for each run otherwise.
pub fn erase_from(drawing: &Drawing, eraser_path: &[Pos2], radius: f32) -> Vec<Drawing> {
    let erased: Vec<bool> = drawing
        .path
        .iter()
        .map(|p| eraser_path.iter().any(|e| point_in_range(*p, *e, radius)))
        .collect();
    if !erased.contains(&true) {
        return vec![drawing.clone()];
    }

    let mut runs = Vec::new();
    let mut run_start = None;
    for (i, hit) in erased.iter().copied().enumerate() {
        match (hit, run_start) {
            (false, None) => run_start = Some(i),
            (true, Some(start)) => {
                runs.push(start..i);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        runs.push(start..erased.len());
    }
    runs.retain(|run| run.len() >= 2);

    let single = runs.len() == 1;
    runs.into_iter()
        .map(|run| {
            let path = drawing.path[run.clone()].to_vec();
            let data = match &drawing.data {
                ToolData::Brush(stroke) => ToolData::Brush(slice_stroke(stroke, &path, run)),
                other => other.clone(),
            };
            let id = if single { drawing.id } else { DrawingId::next() };
            drawing.with_path(id, path, data)
        })
        .collect()
}
