use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use log::debug;
use thiserror::Error;

use crate::filter::{FilterKey, ImageFilter};
use crate::scene::{Frame, FrameId};

/// Errors that can occur during texture generation
#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("Invalid texture dimensions {0}x{1}")]
    InvalidDimensions(u32, u32),
}

type CacheKey = (FrameId, FilterKey);

/// Caches filtered frame textures so a frame is only filtered and uploaded
/// once per distinct filter setting
pub struct TextureManager {
    entries: HashMap<CacheKey, TextureHandle>,
    /// Tick at which each entry was last drawn
    last_used: HashMap<CacheKey, u64>,
    /// Advanced once per UI frame
    tick: u64,
    capacity: usize,
}

impl Default for TextureManager {
    fn default() -> Self {
        Self::new(8)
    }
}

impl TextureManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            last_used: HashMap::new(),
            tick: 0,
            capacity: capacity.max(1),
        }
    }

    /// Should be called at the start of each UI frame
    pub fn begin_frame(&mut self) {
        self.tick += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Texture for `frame` under `filter`, filtering and uploading on a miss
    pub fn texture_for(
        &mut self,
        frame: &Frame,
        filter: ImageFilter,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError> {
        let cache_key = (frame.id(), filter.key());

        if let Some(handle) = self.entries.get(&cache_key) {
            self.last_used.insert(cache_key, self.tick);
            return Ok(handle.id());
        }

        if frame.width() == 0 || frame.height() == 0 {
            return Err(TextureGenerationError::InvalidDimensions(frame.width(), frame.height()));
        }

        self.evict_to_fit();

        let filtered = filter.apply(frame.pixels());
        let size = [filtered.width() as usize, filtered.height() as usize];
        let image = ColorImage::from_rgba_unmultiplied(size, filtered.as_raw());

        let name = format!("frame_{}_{:?}", frame.id().0, filter.key());
        debug!("Uploading texture {} ({}x{})", name, size[0], size[1]);
        let handle = ctx.load_texture(&name, image, TextureOptions::LINEAR);
        let id = handle.id();

        self.entries.insert(cache_key, handle);
        self.last_used.insert(cache_key, self.tick);

        Ok(id)
    }

    /// Drops every texture built from `frame`
    pub fn invalidate_frame(&mut self, frame: FrameId) {
        self.entries.retain(|(id, _), _| *id != frame);
        self.last_used.retain(|(id, _), _| *id != frame);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_used.clear();
    }

    fn evict_to_fit(&mut self) {
        while self.entries.len() >= self.capacity {
            let oldest = self
                .last_used
                .iter()
                .min_by_key(|(_, frame)| **frame)
                .map(|(key, _)| *key);

            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                    self.last_used.remove(&key);
                }
                None => break,
            }
        }
    }
}
