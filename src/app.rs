use std::time::Duration;

use egui::{Key, Modifiers, PointerButton, Pos2, Response};
use log::{debug, info, warn};

use crate::command::{Command, History};
use crate::config::EngineConfig;
use crate::crop::CropOverlay;
use crate::drawing::{Drawing, ToolKind, ViewSnapshot};
use crate::file_handler::FileHandler;
use crate::inbox::FrameInbox;
use crate::panels::{central_panel, tools_panel};
use crate::scene::{Frame, ImageObject, Scene};
use crate::state::{CanvasState, SettingsPatch};
use crate::texture_manager::TextureManager;
use crate::tool::ToolManager;
use crate::view::ViewTransform;

// How often the UI checks the inbox when nothing else asks for a repaint
const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Camera viewer with the annotation canvas on top
pub struct AnnotatorApp {
    pub(crate) config: EngineConfig,
    pub(crate) scene: Scene,
    pub(crate) state: CanvasState,
    pub(crate) history: History,
    pub(crate) tools: ToolManager,
    pub(crate) crop: CropOverlay,
    pub(crate) textures: TextureManager,
    inbox: FrameInbox,
    file_handler: FileHandler,
    /// Last user-facing problem, shown in the tools panel
    pub(crate) status: Option<String>,
    /// A Ctrl+scroll or pinch zoom is in progress
    zooming: bool,
}

impl AnnotatorApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>, config: EngineConfig, inbox: FrameInbox) -> Self {
        Self::with_config(config, inbox)
    }

    pub fn with_config(config: EngineConfig, inbox: FrameInbox) -> Self {
        let mut tools = ToolManager::new(&config);
        tools.activate(ToolKind::Brush);
        Self {
            scene: Scene::default(),
            state: CanvasState::new(config.zoom.clone()),
            history: History::new(config.history_limit),
            crop: CropOverlay::new(config.crop.clone()),
            textures: TextureManager::default(),
            tools,
            inbox,
            file_handler: FileHandler::new(),
            status: None,
            zooming: false,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolManager {
        &mut self.tools
    }

    pub fn crop(&self) -> &CropOverlay {
        &self.crop
    }

    /// Move a frame from the inbox onto the canvas, if one has arrived
    pub fn receive_frames(&mut self) -> bool {
        let Some(frame) = self.inbox.take() else {
            return false;
        };
        debug!("Frame {:?} arrived ({}x{})", frame.id(), frame.width(), frame.height());
        match self.scene.background().map(Frame::id) {
            Some(previous) => self.textures.invalidate_frame(previous),
            None => self.scene.set_canvas_size(frame.size()),
        }
        self.scene.set_background(frame);
        true
    }

    /// Place an image at native size in the middle of the canvas
    pub fn insert_image(&mut self, frame: Frame) -> usize {
        let position = self.scene.canvas_rect().center() - frame.size() / 2.0;
        self.scene.add_object(ImageObject::at_native_size(frame, position))
    }

    /// Execute a command and record it for undo
    pub fn run(&mut self, command: Command) {
        if let Err(err) = self.history.execute(&mut self.state, command) {
            warn!("Command failed: {}", err);
            self.status = Some(err.to_string());
        }
    }

    /// Like [`Self::run`], folding into the entry of the current merge bracket
    pub fn run_merged(&mut self, command: Command) {
        if let Err(err) = self.history.execute_merged(&mut self.state, command) {
            warn!("Command failed: {}", err);
            self.status = Some(err.to_string());
        }
    }

    /// Apply a settings edit. Within a merge bracket the edits fold into one entry.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.run_merged(Command::UpdateSettings(patch));
    }

    /// Scale the zoom by `factor`, keeping the canvas point under `screen` in place
    pub fn zoom_about(&mut self, screen: Pos2, factor: f32, view: ViewTransform) {
        let zoom = self.state.zoom_limits().clamp(self.state.settings().zoom() * factor);
        let pan = view.pan_for_zoom_about(screen, zoom);
        self.run_merged(Command::SetView(ViewSnapshot { zoom, pan }));
    }

    pub fn commit(&mut self, drawing: Drawing) {
        self.run(Command::commit(drawing));
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.state)
    }

    pub fn enter_crop(&mut self) {
        self.tools.cancel_drawing();
        self.status = self.crop.enter(&self.scene).err().map(|err| err.to_string());
    }

    pub fn cancel_crop(&mut self) {
        self.crop.cancel();
        self.status = None;
    }

    pub fn apply_crop(&mut self) {
        match self.crop.apply(&mut self.scene) {
            Ok(applied) => {
                // Cropped targets get new frames; cached textures of the old ones are stale
                self.textures.clear();
                self.run(Command::ApplyCrop(applied.rect));
                self.status = None;
            }
            Err(err) => {
                warn!("Crop failed: {}", err);
                self.status = Some(err.to_string());
            }
        }
    }

    /// Route pointer input on the canvas to the crop overlay or the active tool.
    /// Primary drags draw or crop; middle drags pan; Ctrl+scroll zooms about the pointer.
    pub(crate) fn handle_pointer(&mut self, response: &Response, view: ViewTransform) {
        let zoom_delta = response.ctx.input(|i| i.zoom_delta());
        match response.hover_pos() {
            Some(hover) if zoom_delta != 1.0 => {
                if !self.zooming {
                    self.history.begin_merge();
                    self.zooming = true;
                }
                self.zoom_about(hover, zoom_delta, view);
                return;
            }
            _ if self.zooming => {
                self.history.end_merge();
                self.zooming = false;
            }
            _ => {}
        }

        if response.drag_started_by(PointerButton::Middle) {
            self.history.begin_merge();
        }
        if response.dragged_by(PointerButton::Middle) {
            self.run_merged(Command::MovePan(response.drag_delta()));
        }
        if response.drag_stopped_by(PointerButton::Middle) {
            self.history.end_merge();
        }
        if response.dragged_by(PointerButton::Middle) || response.drag_stopped_by(PointerButton::Middle) {
            return;
        }

        let pointer = response.interact_pointer_pos().map(|pos| view.to_canvas(pos));

        if self.crop.is_active() {
            if let Some(point) = pointer {
                if response.drag_started_by(PointerButton::Primary) {
                    self.crop.begin_drag(point);
                } else if response.dragged_by(PointerButton::Primary) {
                    self.crop.drag_to(point);
                }
            }
            if response.drag_stopped_by(PointerButton::Primary) {
                self.crop.end_drag();
            }
            if let Some(hover) = response.hover_pos() {
                if let Some(mode) = self.crop.hit_test(view.to_canvas(hover)) {
                    response.ctx.set_cursor_icon(mode.cursor_icon());
                }
            }
            return;
        }

        if let Some(point) = pointer {
            if response.drag_started_by(PointerButton::Primary) {
                self.tools.start_drawing(point, self.state.settings().view());
            } else if response.dragged_by(PointerButton::Primary) {
                self.tools.continue_drawing(point);
            }
        }
        if response.drag_stopped_by(PointerButton::Primary) {
            if let Some(drawing) = self.tools.finish_drawing() {
                self.commit(drawing);
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.input_mut(|i| i.consume_key(Modifiers::COMMAND, Key::Z)) {
            self.undo();
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Escape)) {
            if self.tools.is_drawing() {
                self.tools.cancel_drawing();
            } else if self.crop.is_active() {
                self.cancel_crop();
            }
        }
    }
}

impl eframe::App for AnnotatorApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.textures.begin_frame();
        self.receive_frames();

        for (name, frame) in self.file_handler.take_dropped_frames(ctx) {
            let index = self.insert_image(frame);
            info!("📥 {} added as image object {}", name, index);
        }
        self.file_handler.preview_files_being_dropped(ctx);

        self.handle_shortcuts(ctx);

        tools_panel(self, ctx);
        central_panel(self, ctx);

        ctx.request_repaint_after(FRAME_POLL_INTERVAL);
    }
}
