use egui::Pos2;

use crate::config::BrushSettings;
use crate::drawing::{BrushMotion, BrushStroke, DrawingRef, PathState, ToolData, ToolKind, ViewSnapshot};
use crate::geometry::{catmull_rom, distance, lerp, lerp_f32};
use crate::surface::{isolated, Surface};

/// Samples taken between each pair of interior control points
const SMOOTHING_SUBDIVISIONS: usize = 4;
/// Width difference below which adjacent segments share one stroke call
const WIDTH_BATCH_TOLERANCE: f32 = 0.5;
const VELOCITY_CAP: f32 = 10.0;
const VELOCITY_RETAIN: f32 = 0.7;
const MIN_PRESSURE: f32 = 0.2;
const PREVIEW_ALPHA: f32 = 0.8;

/// Freehand brush with distance filtering, gap filling and speed-based width
#[derive(Debug, Clone, PartialEq)]
pub struct BrushTool {
    pub settings: BrushSettings,
}

impl Default for BrushTool {
    fn default() -> Self {
        Self::new(BrushSettings::default())
    }
}

impl BrushTool {
    pub fn new(settings: BrushSettings) -> Self {
        Self {
            settings: settings.sanitized(),
        }
    }

    pub fn set_settings(&mut self, settings: BrushSettings) {
        self.settings = settings.sanitized();
    }

    pub fn start_drawing(&self, point: Pos2, view: ViewSnapshot) -> PathState {
        let mut state = PathState::new(
            ToolKind::Brush,
            point,
            self.settings.color,
            self.settings.line_width,
            view,
        );
        state.data = ToolData::Brush(BrushStroke {
            velocities: vec![0.0],
            pressures: vec![1.0],
            smoothed: vec![point],
            smoothed_pressures: vec![1.0],
        });
        state.motion = Some(BrushMotion {
            last_point: point,
            last_velocity: 0.0,
            last_time: None,
        });
        state
    }

    /// Add `point` to the stroke. Returns false when the point is rejected
    /// for being closer than `min_distance` to the last accepted point.
    pub fn continue_drawing(&self, state: &mut PathState, point: Pos2, now_ms: f64) -> bool {
        let Some(last) = state.path.last().copied() else {
            return false;
        };
        let mut motion = state.motion.unwrap_or(BrushMotion {
            last_point: last,
            last_velocity: 0.0,
            last_time: None,
        });

        let dist = distance(motion.last_point, point);
        if dist < self.settings.min_distance {
            return false;
        }

        let instant = match motion.last_time {
            Some(last_time) => (dist / ((now_ms - last_time) as f32 + 1.0) * 10.0).min(VELOCITY_CAP),
            None => 0.0,
        };
        motion.last_velocity = motion.last_velocity * VELOCITY_RETAIN + instant * (1.0 - VELOCITY_RETAIN);
        motion.last_time = Some(now_ms);
        let pressure = (1.0 - motion.last_velocity * self.settings.pressure_sensitivity).max(MIN_PRESSURE);

        let new_points = interpolate_gap(motion.last_point, point, dist, self.settings.max_distance);
        let added = new_points.len();
        state.path.extend(new_points);

        if let ToolData::Brush(stroke) = &mut state.data {
            stroke.velocities.extend(std::iter::repeat_n(motion.last_velocity, added));
            stroke.pressures.extend(std::iter::repeat_n(pressure, added));
            stroke.smoothed = smooth_path(&state.path);
            stroke.smoothed_pressures = smooth_pressures(&stroke.pressures);
        }

        motion.last_point = point;
        state.motion = Some(motion);
        true
    }

    /// Width for a stroke of base width `base` at `pressure`
    pub fn line_width_for(&self, base: f32, pressure: f32) -> f32 {
        let min = self.settings.min_line_width.max(base * 0.3);
        let max = self.settings.max_line_width.min(base * 1.5);
        min + (max - min) * pressure
    }

    pub(crate) fn paint(&self, surface: &mut dyn Surface, drawing: DrawingRef<'_>) {
        let stroke = match drawing.data {
            ToolData::Brush(stroke) if !stroke.smoothed.is_empty() => Some(stroke),
            _ => None,
        };
        let points = stroke.map_or(drawing.path, |s| s.smoothed.as_slice());
        if points.is_empty() {
            return;
        }
        let pressure_at = |i: usize| {
            stroke
                .and_then(|s| s.smoothed_pressures.get(i).copied())
                .unwrap_or(1.0)
        };

        isolated(surface, |surface| {
            let state = surface.state_mut();
            state.stroke_color = drawing.color;
            state.fill_color = drawing.color;

            if points.len() == 1 {
                let radius = self.line_width_for(drawing.line_width, pressure_at(0)) / 2.0;
                surface.fill_circle(points[0], radius);
                return;
            }

            let widths: Vec<f32> = (0..points.len())
                .map(|i| self.line_width_for(drawing.line_width, pressure_at(i)))
                .collect();

            let mut batch = vec![points[0], points[1]];
            let mut batch_width = (widths[0] + widths[1]) / 2.0;
            for i in 1..points.len() - 1 {
                let width = (widths[i] + widths[i + 1]) / 2.0;
                if (width - batch_width).abs() < WIDTH_BATCH_TOLERANCE {
                    batch.push(points[i + 1]);
                } else {
                    surface.state_mut().line_width = batch_width;
                    surface.stroke_path(&batch);
                    batch = vec![points[i], points[i + 1]];
                    batch_width = width;
                }
            }
            surface.state_mut().line_width = batch_width;
            surface.stroke_path(&batch);
        });
    }

    pub(crate) fn paint_preview(&self, surface: &mut dyn Surface, drawing: DrawingRef<'_>) {
        isolated(surface, |surface| {
            surface.state_mut().alpha *= PREVIEW_ALPHA;
            self.paint(surface, drawing);
        });
    }
}

/// Points to append when moving from `from` to `to`: the target itself, or
/// `ceil(dist / max_distance)` evenly spaced points ending on it
fn interpolate_gap(from: Pos2, to: Pos2, dist: f32, max_distance: f32) -> Vec<Pos2> {
    if dist <= max_distance {
        return vec![to];
    }
    let steps = (dist / max_distance).ceil() as usize;
    (1..=steps)
        .map(|i| {
            if i == steps {
                to
            } else {
                lerp(from, to, i as f32 / steps as f32)
            }
        })
        .collect()
}

/// Catmull-Rom resampling of a raw brush path.
///
/// Paths shorter than three points come back unchanged. Otherwise the first
/// and last points are kept exactly and every interior segment contributes
/// four samples.
pub fn smooth_path(path: &[Pos2]) -> Vec<Pos2> {
    let n = path.len();
    if n < 3 {
        return path.to_vec();
    }

    let mut smoothed = Vec::with_capacity(2 + (n - 2) * SMOOTHING_SUBDIVISIONS);
    smoothed.push(path[0]);
    for i in 1..n - 1 {
        let p0 = path[i - 1];
        let p1 = path[i];
        let p2 = path[i + 1];
        let p3 = path.get(i + 2).copied().unwrap_or(p2);
        for step in 0..SMOOTHING_SUBDIVISIONS {
            let t = step as f32 / SMOOTHING_SUBDIVISIONS as f32;
            smoothed.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }
    smoothed.push(path[n - 1]);
    smoothed
}

/// Pressures resampled in step with [`smooth_path`], one per smoothed point
pub fn smooth_pressures(pressures: &[f32]) -> Vec<f32> {
    let n = pressures.len();
    if n < 3 {
        return pressures.to_vec();
    }

    let mut smoothed = Vec::with_capacity(2 + (n - 2) * SMOOTHING_SUBDIVISIONS);
    smoothed.push(pressures[0]);
    for i in 1..n - 1 {
        for step in 0..SMOOTHING_SUBDIVISIONS {
            let t = step as f32 / SMOOTHING_SUBDIVISIONS as f32;
            smoothed.push(lerp_f32(pressures[i], pressures[i + 1], t));
        }
    }
    smoothed.push(pressures[n - 1]);
    smoothed
}

/// Rebuild the stroke data for a sub-range of raw points, used when erasing splits a stroke
pub(crate) fn slice_stroke(stroke: &BrushStroke, path: &[Pos2], range: std::ops::Range<usize>) -> BrushStroke {
    let velocities = stroke.velocities.get(range.clone()).map(<[f32]>::to_vec).unwrap_or_default();
    let pressures = stroke.pressures.get(range).map(<[f32]>::to_vec).unwrap_or_default();
    BrushStroke {
        smoothed: smooth_path(path),
        smoothed_pressures: smooth_pressures(&pressures),
        velocities,
        pressures,
    }
}
