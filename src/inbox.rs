use std::sync::Arc;

use image::RgbaImage;
use parking_lot::Mutex;

use crate::scene::Frame;

/// Single-slot hand-off for decoded camera frames.
///
/// Producers on other threads call [`FrameSender::send`]; the UI loop calls
/// [`FrameInbox::take`] once per repaint. Only the newest undelivered frame is
/// kept, and a frame is visible to the UI only after it is fully decoded.
#[derive(Debug, Default)]
pub struct FrameInbox {
    slot: Arc<Mutex<Option<RgbaImage>>>,
}

#[derive(Debug, Clone)]
pub struct FrameSender {
    slot: Arc<Mutex<Option<RgbaImage>>>,
}

impl FrameInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(&self) -> FrameSender {
        FrameSender {
            slot: Arc::clone(&self.slot),
        }
    }

    pub fn take(&self) -> Option<Frame> {
        self.slot.lock().take().map(Frame::new)
    }
}

impl FrameSender {
    /// Post a decoded frame. Returns true if an older undelivered frame was replaced.
    pub fn send(&self, pixels: RgbaImage) -> bool {
        self.slot.lock().replace(pixels).is_some()
    }
}
