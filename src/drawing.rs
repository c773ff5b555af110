//! Paths under construction and the committed drawings they turn into.

use egui::{Color32, Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::id_generator::next_drawing_id;

/// Session-unique identifier of a committed drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DrawingId(pub u64);

impl DrawingId {
    pub fn next() -> Self {
        Self(next_drawing_id())
    }
}

/// Tag naming the tool that produced a drawing; the join key used for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Brush,
    Line,
    Rectangle,
    Circle,
    Eraser,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Brush,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Eraser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Brush => "brush",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Eraser => "eraser",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }

    /// Fewest points a drawing of this kind needs before it renders anything
    pub fn min_points(&self) -> usize {
        match self {
            ToolKind::Brush => 1,
            _ => 2,
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zoom and pan active when a path was started
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

/// Per-point dynamics of a brush stroke plus its smoothed rendition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrushStroke {
    /// One entry per raw path point
    pub velocities: Vec<f32>,
    /// One entry per raw path point, in `[0.2, 1]`
    pub pressures: Vec<f32>,
    /// Catmull-Rom resampling of the raw path, the stroke that is actually drawn
    pub smoothed: Vec<Pos2>,
    /// One entry per smoothed point
    pub smoothed_pressures: Vec<f32>,
}

/// Tool-specific auxiliary data carried alongside a path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum ToolData {
    #[default]
    None,
    Brush(BrushStroke),
    Eraser { radius: f32 },
}

/// Transient brush tracking; lives only while the stroke is open
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushMotion {
    pub last_point: Pos2,
    pub last_velocity: f32,
    /// Milliseconds; `None` until the first accepted move
    pub last_time: Option<f64>,
}

/// An open path being built by the active tool
#[derive(Debug, Clone, PartialEq)]
pub struct PathState {
    pub(crate) tool: ToolKind,
    pub(crate) path: Vec<Pos2>,
    pub(crate) color: Color32,
    pub(crate) line_width: f32,
    pub(crate) fill: Option<Color32>,
    pub(crate) corner_radius: f32,
    pub(crate) settings: ViewSnapshot,
    pub(crate) data: ToolData,
    pub(crate) motion: Option<BrushMotion>,
}

impl PathState {
    pub(crate) fn new(tool: ToolKind, start: Pos2, color: Color32, line_width: f32, settings: ViewSnapshot) -> Self {
        Self {
            tool,
            path: vec![start],
            color,
            line_width,
            fill: None,
            corner_radius: 0.0,
            settings,
            data: ToolData::None,
            motion: None,
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn path(&self) -> &[Pos2] {
        &self.path
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn settings(&self) -> ViewSnapshot {
        self.settings
    }

    pub fn data(&self) -> &ToolData {
        &self.data
    }

    /// Freeze the path into a drawing with a fresh id, discarding transient tracking
    pub(crate) fn freeze(self) -> Drawing {
        Drawing {
            id: DrawingId::next(),
            tool: self.tool,
            path: self.path,
            color: self.color,
            line_width: self.line_width,
            fill: self.fill,
            corner_radius: self.corner_radius,
            settings: self.settings,
            data: self.data,
        }
    }

    /// View of the open path as a drawing, for preview rendering
    pub(crate) fn view(&self) -> DrawingRef<'_> {
        DrawingRef {
            tool: self.tool,
            path: &self.path,
            color: self.color,
            line_width: self.line_width,
            fill: self.fill,
            corner_radius: self.corner_radius,
            data: &self.data,
        }
    }
}

/// A committed, immutable stroke or shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub(crate) id: DrawingId,
    pub(crate) tool: ToolKind,
    pub(crate) path: Vec<Pos2>,
    pub(crate) color: Color32,
    pub(crate) line_width: f32,
    pub(crate) fill: Option<Color32>,
    pub(crate) corner_radius: f32,
    pub(crate) settings: ViewSnapshot,
    pub(crate) data: ToolData,
}

impl Drawing {
    pub fn id(&self) -> DrawingId {
        self.id
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn path(&self) -> &[Pos2] {
        &self.path
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn fill(&self) -> Option<Color32> {
        self.fill
    }

    pub fn settings(&self) -> ViewSnapshot {
        self.settings
    }

    pub fn data(&self) -> &ToolData {
        &self.data
    }

    /// The brush dynamics, if this is a brush stroke
    pub fn brush_stroke(&self) -> Option<&BrushStroke> {
        match &self.data {
            ToolData::Brush(stroke) => Some(stroke),
            _ => None,
        }
    }

    /// Smoothed path of a brush stroke, empty for other tools
    pub fn smoothed_path(&self) -> &[Pos2] {
        self.brush_stroke().map(|s| s.smoothed.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn view(&self) -> DrawingRef<'_> {
        DrawingRef {
            tool: self.tool,
            path: &self.path,
            color: self.color,
            line_width: self.line_width,
            fill: self.fill,
            corner_radius: self.corner_radius,
            data: &self.data,
        }
    }

    /// Copy of this drawing with a different path; used when erasing splits a drawing
    pub(crate) fn with_path(&self, id: DrawingId, path: Vec<Pos2>, data: ToolData) -> Self {
        Self {
            id,
            path,
            data,
            ..self.clone()
        }
    }
}

/// Borrowed view shared by committed drawings and open paths, so one render
/// routine serves both
#[derive(Debug, Clone, Copy)]
pub(crate) struct DrawingRef<'a> {
    pub tool: ToolKind,
    pub path: &'a [Pos2],
    pub color: Color32,
    pub line_width: f32,
    pub fill: Option<Color32>,
    pub corner_radius: f32,
    pub data: &'a ToolData,
}
