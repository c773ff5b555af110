//! Canvas-level state owned by the surrounding UI: the committed drawings
//! and the image settings. Both are changed only through [`crate::command::Command`].

mod settings;

pub use settings::{ImageSettings, SettingsPatch, PERCENT_RANGE};

use crate::config::ZoomLimits;
use crate::drawing::{Drawing, DrawingId};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanvasState {
    pub(crate) drawings: Vec<Drawing>,
    pub(crate) settings: ImageSettings,
    pub(crate) zoom_limits: ZoomLimits,
}

impl CanvasState {
    pub fn new(zoom_limits: ZoomLimits) -> Self {
        Self {
            drawings: Vec::new(),
            settings: ImageSettings::default(),
            zoom_limits,
        }
    }

    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    pub fn drawing(&self, id: DrawingId) -> Option<&Drawing> {
        self.drawings.iter().find(|d| d.id() == id)
    }

    pub fn settings(&self) -> &ImageSettings {
        &self.settings
    }

    pub fn zoom_limits(&self) -> &ZoomLimits {
        &self.zoom_limits
    }
}
