#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod compose;
pub mod config;
pub mod crop;
pub mod drawing;
pub mod error;
pub mod file_handler;
pub mod filter;
pub mod geometry;
pub mod id_generator;
pub mod inbox;
pub mod panels;
pub mod scene;
pub mod state;
pub mod surface;
pub mod texture_manager;
pub mod tool;
pub mod util;
pub mod view;

pub use app::AnnotatorApp;
pub use command::{Command, History, HistoryEntry};
pub use config::EngineConfig;
pub use crop::{AspectRatio, CropBox, CropOverlay, CropRect};
pub use drawing::{Drawing, DrawingId, PathState, ToolKind, ViewSnapshot};
pub use error::{CommandError, ConfigError, CropError, LoadError};
pub use inbox::{FrameInbox, FrameSender};
pub use scene::{Frame, ImageObject, Scene};
pub use state::{CanvasState, ImageSettings, SettingsPatch};
pub use surface::{DrawOp, PainterSurface, RecordingSurface, Surface};
pub use tool::{Tool, ToolManager};
pub use view::ViewTransform;
