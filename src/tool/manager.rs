use std::collections::HashMap;

use egui::{Color32, Pos2};

use super::Tool;
use crate::config::EngineConfig;
use crate::drawing::{Drawing, PathState, ToolKind, ViewSnapshot};
use crate::surface::Surface;
use crate::util::time::current_time_millis;

/// Owns the tool registry, the active tool and the open path, and routes
/// pointer events and render calls to the right tool
#[derive(Debug, Clone)]
pub struct ToolManager {
    tools: HashMap<ToolKind, Tool>,
    active: Option<ToolKind>,
    current: Option<PathState>,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl ToolManager {
    /// Manager with every built-in tool registered and none active
    pub fn new(config: &EngineConfig) -> Self {
        let mut manager = Self::empty();
        for kind in ToolKind::ALL {
            manager.register_tool(Tool::from_config(kind, config));
        }
        manager
    }

    pub fn empty() -> Self {
        Self {
            tools: HashMap::new(),
            active: None,
            current: None,
        }
    }

    /// Register `tool`, replacing any tool of the same kind
    pub fn register_tool(&mut self, tool: Tool) {
        self.tools.insert(tool.kind(), tool);
    }

    /// Remove a tool. Drawings it made are skipped at render time from now on.
    pub fn unregister_tool(&mut self, kind: ToolKind) -> Option<Tool> {
        if self.active == Some(kind) {
            self.active = None;
            self.current = None;
        }
        self.tools.remove(&kind)
    }

    pub fn tool(&self, kind: ToolKind) -> Option<&Tool> {
        self.tools.get(&kind)
    }

    pub fn tool_mut(&mut self, kind: ToolKind) -> Option<&mut Tool> {
        self.tools.get_mut(&kind)
    }

    /// Registered tools in toolbar order
    pub fn tools(&self) -> impl Iterator<Item = &Tool> {
        ToolKind::ALL.iter().filter_map(|kind| self.tools.get(kind))
    }

    pub fn active_kind(&self) -> Option<ToolKind> {
        self.active
    }

    pub fn active_tool(&self) -> Option<&Tool> {
        self.active.and_then(|kind| self.tools.get(&kind))
    }

    fn active_tool_mut(&mut self) -> Option<&mut Tool> {
        let kind = self.active?;
        self.tools.get_mut(&kind)
    }

    /// Activate the tool registered under `name`.
    ///
    /// Unknown names are logged and leave the active tool unchanged.
    pub fn activate_tool(&mut self, name: &str) -> bool {
        let Some(kind) = ToolKind::from_name(name).filter(|kind| self.tools.contains_key(kind)) else {
            log::warn!("Tool \"{}\" not found", name);
            return false;
        };
        self.activate(kind)
    }

    pub fn activate(&mut self, kind: ToolKind) -> bool {
        if !self.tools.contains_key(&kind) {
            log::warn!("Tool \"{}\" not found", kind);
            return false;
        }
        self.deactivate();
        self.active = Some(kind);
        log::debug!("Activated tool: {}", kind);
        true
    }

    /// Drop the active tool along with any open path
    pub fn deactivate(&mut self) {
        if let Some(kind) = self.active.take() {
            log::debug!("Deactivated tool: {}", kind);
        }
        self.current = None;
    }

    /// Open a path with the active tool. Returns `None` without an active tool.
    pub fn start_drawing(&mut self, point: Pos2, view: ViewSnapshot) -> Option<&PathState> {
        let state = self.active_tool()?.start_drawing(point, view);
        self.current = Some(state);
        self.current.as_ref()
    }

    pub fn continue_drawing(&mut self, point: Pos2) -> Option<&PathState> {
        self.continue_drawing_at(point, current_time_millis())
    }

    /// [`Self::continue_drawing`] with an explicit timestamp in milliseconds
    pub fn continue_drawing_at(&mut self, point: Pos2, now_ms: f64) -> Option<&PathState> {
        let kind = self.active?;
        let tool = self.tools.get(&kind)?;
        let state = self.current.as_mut()?;
        tool.continue_drawing(state, point, now_ms);
        self.current.as_ref()
    }

    /// Close the open path and return it as a committed drawing
    pub fn finish_drawing(&mut self) -> Option<Drawing> {
        let kind = self.active?;
        let tool = self.tools.get(&kind)?;
        let state = self.current.take()?;
        Some(tool.finish_drawing(state))
    }

    /// Discard the open path
    pub fn cancel_drawing(&mut self) {
        self.current = None;
    }

    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_path(&self) -> Option<&PathState> {
        self.current.as_ref()
    }

    /// Render `drawing` with the tool that made it, skipping drawings whose
    /// tool is no longer registered
    pub fn render_drawing(&self, surface: &mut dyn Surface, drawing: &Drawing) {
        if let Some(tool) = self.tools.get(&drawing.tool()) {
            tool.render(surface, drawing);
        }
    }

    pub fn render_preview(&self, surface: &mut dyn Surface) {
        if let (Some(tool), Some(state)) = (self.active_tool(), self.current.as_ref()) {
            tool.render_preview(surface, state);
        }
    }

    pub fn set_active_color(&mut self, color: Color32) {
        if let Some(tool) = self.active_tool_mut() {
            tool.set_color(color);
        }
    }

    pub fn set_active_line_width(&mut self, width: f32) {
        if let Some(tool) = self.active_tool_mut() {
            tool.set_line_width(width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    #[test]
    fn test_unknown_tool_keeps_active_tool() {
        let mut manager = ToolManager::default();
        assert!(manager.activate_tool("line"));
        assert!(!manager.activate_tool("lasso"));
        assert_eq!(manager.active_kind(), Some(ToolKind::Line));
    }

    #[test]
    fn test_calls_without_active_tool_are_noops() {
        let mut manager = ToolManager::default();
        assert!(manager.start_drawing(Pos2::ZERO, ViewSnapshot::default()).is_none());
        assert!(manager.continue_drawing(Pos2::new(5.0, 5.0)).is_none());
        assert!(manager.finish_drawing().is_none());
        assert!(!manager.is_drawing());
    }

    #[test]
    fn test_switching_tools_drops_open_path() {
        let mut manager = ToolManager::default();
        manager.activate_tool("brush");
        manager.start_drawing(Pos2::ZERO, ViewSnapshot::default());
        assert!(manager.is_drawing());
        manager.activate_tool("circle");
        assert!(!manager.is_drawing());
    }

    #[test]
    fn test_unregistered_tool_drawings_are_skipped() {
        let mut manager = ToolManager::default();
        manager.activate_tool("line");
        manager.start_drawing(Pos2::ZERO, ViewSnapshot::default());
        manager.continue_drawing_at(Pos2::new(10.0, 10.0), 0.0);
        let drawing = manager.finish_drawing().unwrap();

        assert!(manager.unregister_tool(ToolKind::Line).is_some());
        assert_eq!(manager.active_kind(), None);
        assert!(!manager.activate_tool("line"));

        let mut surface = RecordingSurface::new();
        manager.render_drawing(&mut surface, &drawing);
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_style_setters_only_touch_active_tool() {
        let mut manager = ToolManager::default();
        manager.set_active_color(Color32::YELLOW);
        manager.activate_tool("rectangle");
        manager.set_active_color(Color32::YELLOW);
        manager.set_active_line_width(6.0);

        let rect = manager.tool(ToolKind::Rectangle).unwrap();
        assert_eq!(rect.color(), Color32::YELLOW);
        assert_eq!(rect.line_width(), 6.0);
        assert_ne!(manager.tool(ToolKind::Line).unwrap().color(), Color32::YELLOW);
    }
}
