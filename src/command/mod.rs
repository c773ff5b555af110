//! Every change to the canvas state goes through a [`Command`]. Executing a
//! command returns a [`HistoryEntry`] holding the values it replaced, and
//! undoing that entry puts them back exactly. Commands that change nothing
//! return no entry.

mod history;

pub use history::History;

use egui::Vec2;
use log::{debug, warn};

use crate::crop::CropRect;
use crate::drawing::{Drawing, DrawingId, ToolData, ToolKind, ViewSnapshot};
use crate::error::CommandError;
use crate::state::{CanvasState, ImageSettings, SettingsPatch};
use crate::tool::eraser;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a committed drawing
    AddDrawing(Drawing),
    /// Remove one drawing by id
    RemoveDrawing(DrawingId),
    /// Split or remove every drawing the eraser drawing covers
    Erase(Drawing),
    ClearDrawings,
    /// Record the crop rectangle that was applied to the image
    ApplyCrop(CropRect),
    RemoveCrop,
    ToggleGrayscale,
    ZoomIn,
    ZoomOut,
    /// Move the pan offset by a delta
    MovePan(Vec2),
    /// Set zoom and pan together, as when zooming about the cursor.
    /// The zoom is clamped to the configured limits.
    SetView(ViewSnapshot),
    UpdateSettings(SettingsPatch),
}

/// What a command replaced, enough to reverse it
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    DrawingAdded { id: DrawingId },
    DrawingRemoved { index: usize, drawing: Drawing },
    DrawingsErased { previous: Vec<Drawing> },
    DrawingsCleared { previous: Vec<Drawing> },
    CropApplied { previous: Option<CropRect> },
    CropRemoved { previous: Option<CropRect> },
    GrayscaleToggled { previous: bool },
    ZoomChanged { previous: f32 },
    PanMoved { previous: Vec2 },
    ViewChanged { previous: ViewSnapshot },
    SettingsUpdated { previous: Box<ImageSettings> },
}

impl HistoryEntry {
    /// Entries of the same kind that may be folded into one, keeping the oldest
    pub fn same_kind(&self, other: &HistoryEntry) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl Command {
    /// Command for a drawing fresh off the tool manager: eraser paths erase,
    /// everything else is appended
    pub fn commit(drawing: Drawing) -> Self {
        if drawing.tool() == ToolKind::Eraser {
            Command::Erase(drawing)
        } else {
            Command::AddDrawing(drawing)
        }
    }

    pub fn execute(self, state: &mut CanvasState) -> Result<Option<HistoryEntry>, CommandError> {
        let entry = match self {
            Command::AddDrawing(drawing) => {
                let id = drawing.id();
                state.drawings.push(drawing);
                HistoryEntry::DrawingAdded { id }
            }
            Command::RemoveDrawing(id) => {
                let index = state
                    .drawings
                    .iter()
                    .position(|d| d.id() == id)
                    .ok_or(CommandError::UnknownDrawing(id))?;
                let drawing = state.drawings.remove(index);
                HistoryEntry::DrawingRemoved { index, drawing }
            }
            Command::Erase(eraser_drawing) => {
                let ToolData::Eraser { radius } = *eraser_drawing.data() else {
                    return Err(CommandError::NotAnEraser);
                };
                let eraser_path = eraser_drawing.path();
                let previous = std::mem::take(&mut state.drawings);
                let mut remaining = Vec::with_capacity(previous.len());
                for drawing in &previous {
                    // A line passing under the eraser between its anchors is removed whole
                    if drawing.tool() == ToolKind::Line
                        && !eraser::intersects(drawing.path(), eraser_path, radius)
                        && eraser::crosses(drawing.path(), eraser_path, radius)
                    {
                        continue;
                    }
                    remaining.extend(eraser::erase_from(drawing, eraser_path, radius));
                }
                debug!(
                    "Eraser pass: {} drawings before, {} after",
                    previous.len(),
                    remaining.len()
                );
                if remaining == previous {
                    debug!("Eraser touched nothing, no history entry");
                    state.drawings = previous;
                    return Ok(None);
                }
                state.drawings = remaining;
                HistoryEntry::DrawingsErased { previous }
            }
            Command::ClearDrawings => HistoryEntry::DrawingsCleared {
                previous: std::mem::take(&mut state.drawings),
            },
            Command::ApplyCrop(rect) => HistoryEntry::CropApplied {
                previous: state.settings.crop.replace(rect),
            },
            Command::RemoveCrop => HistoryEntry::CropRemoved {
                previous: state.settings.crop.take(),
            },
            Command::ToggleGrayscale => {
                let previous = state.settings.grayscale;
                state.settings.grayscale = !previous;
                HistoryEntry::GrayscaleToggled { previous }
            }
            Command::ZoomIn => {
                let zoom = state.settings.zoom * state.zoom_limits.step;
                set_zoom(state, zoom)
            }
            Command::ZoomOut => {
                let zoom = state.settings.zoom / state.zoom_limits.step;
                set_zoom(state, zoom)
            }
            Command::MovePan(delta) => {
                let previous = state.settings.pan;
                state.settings.pan = previous + delta;
                HistoryEntry::PanMoved { previous }
            }
            Command::SetView(view) => {
                let previous = state.settings.view();
                state.settings.zoom = state.zoom_limits.clamp(view.zoom);
                state.settings.pan = view.pan;
                HistoryEntry::ViewChanged { previous }
            }
            Command::UpdateSettings(patch) => {
                let previous = Box::new(state.settings.clone());
                state.settings.apply_patch(&patch);
                HistoryEntry::SettingsUpdated { previous }
            }
        };
        Ok(Some(entry))
    }
}

fn set_zoom(state: &mut CanvasState, zoom: f32) -> HistoryEntry {
    let previous = state.settings.zoom;
    state.settings.zoom = state.zoom_limits.clamp(zoom);
    HistoryEntry::ZoomChanged { previous }
}

impl HistoryEntry {
    /// Put back what the command replaced
    pub fn undo(self, state: &mut CanvasState) {
        match self {
            HistoryEntry::DrawingAdded { id } => match state.drawings.iter().rposition(|d| d.id() == id) {
                Some(index) => {
                    state.drawings.remove(index);
                }
                None => warn!("Undo: drawing {:?} is already gone", id),
            },
            HistoryEntry::DrawingRemoved { index, drawing } => {
                let index = index.min(state.drawings.len());
                state.drawings.insert(index, drawing);
            }
            HistoryEntry::DrawingsErased { previous } | HistoryEntry::DrawingsCleared { previous } => {
                state.drawings = previous;
            }
            HistoryEntry::CropApplied { previous } | HistoryEntry::CropRemoved { previous } => {
                state.settings.crop = previous;
            }
            HistoryEntry::GrayscaleToggled { previous } => state.settings.grayscale = previous,
            HistoryEntry::ZoomChanged { previous } => state.settings.zoom = previous,
            HistoryEntry::PanMoved { previous } => state.settings.pan = previous,
            HistoryEntry::ViewChanged { previous } => {
                state.settings.zoom = previous.zoom;
                state.settings.pan = previous.pan;
            }
            HistoryEntry::SettingsUpdated { previous } => state.settings = *previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZoomLimits;

    #[test]
    fn test_zoom_steps_are_clamped() {
        let mut state = CanvasState::new(ZoomLimits::default());
        for _ in 0..100 {
            Command::ZoomIn.execute(&mut state).unwrap();
        }
        assert_eq!(state.settings().zoom(), 5.0);
        let view = ViewSnapshot {
            zoom: 0.0,
            pan: Vec2::ZERO,
        };
        Command::SetView(view).execute(&mut state).unwrap();
        assert_eq!(state.settings().zoom(), 0.2);
    }

    #[test]
    fn test_remove_unknown_drawing_fails() {
        let mut state = CanvasState::default();
        let err = Command::RemoveDrawing(DrawingId(u64::MAX)).execute(&mut state).unwrap_err();
        assert_eq!(err, CommandError::UnknownDrawing(DrawingId(u64::MAX)));
    }

    #[test]
    fn test_same_kind_ignores_payload() {
        let a = HistoryEntry::ZoomChanged { previous: 1.0 };
        let b = HistoryEntry::ZoomChanged { previous: 2.0 };
        assert!(a.same_kind(&b));
        assert!(!a.same_kind(&HistoryEntry::PanMoved { previous: Vec2::ZERO }));
    }

    #[test]
    fn test_set_view_clamps_zoom_and_undoes_both() {
        let mut state = CanvasState::new(ZoomLimits::default());
        let view = ViewSnapshot {
            zoom: 50.0,
            pan: Vec2::new(-30.0, 12.0),
        };
        let entry = Command::SetView(view).execute(&mut state).unwrap().unwrap();
        assert_eq!(state.settings().zoom(), 5.0);
        assert_eq!(state.settings().pan(), Vec2::new(-30.0, 12.0));

        entry.undo(&mut state);
        assert_eq!(state.settings().view(), ViewSnapshot::default());
    }
}
