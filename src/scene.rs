//! The images under the annotations: the background camera frame and any
//! inserted image objects, plus the canvas they are displayed on.

use std::sync::Arc;

use egui::{Pos2, Rect, Vec2};
use image::RgbaImage;

use crate::id_generator::next_frame_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// A fully decoded raster. Cheap to clone; pixels are shared.
#[derive(Clone)]
pub struct Frame {
    id: FrameId,
    pixels: Arc<RgbaImage>,
}

// RgbaImage's Debug would dump every pixel
impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("id", &self.id)
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

impl Frame {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            id: FrameId(next_frame_id()),
            pixels: Arc::new(pixels),
        }
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Native size in pixels
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.pixels.width() as f32, self.pixels.height() as f32)
    }
}

/// An image placed on the canvas at `bounds` (displayed size may differ from native size)
#[derive(Debug, Clone)]
pub struct ImageObject {
    pub frame: Frame,
    pub bounds: Rect,
}

impl ImageObject {
    pub fn new(frame: Frame, bounds: Rect) -> Self {
        Self { frame, bounds }
    }

    /// Place the image at `position` at its native size
    pub fn at_native_size(frame: Frame, position: Pos2) -> Self {
        let bounds = Rect::from_min_size(position, frame.size());
        Self { frame, bounds }
    }

    /// Native pixel area, used to pick the crop target
    pub fn native_area(&self) -> u64 {
        self.frame.width() as u64 * self.frame.height() as u64
    }
}

/// Canvas dimensions plus the images drawn beneath the annotations
#[derive(Debug, Clone)]
pub struct Scene {
    canvas_size: Vec2,
    background: Option<Frame>,
    objects: Vec<ImageObject>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Vec2::new(800.0, 600.0))
    }
}

impl Scene {
    pub fn new(canvas_size: Vec2) -> Self {
        Self {
            canvas_size,
            background: None,
            objects: Vec::new(),
        }
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    pub fn set_canvas_size(&mut self, size: Vec2) {
        self.canvas_size = size;
    }

    /// Canvas rectangle in canvas space
    pub fn canvas_rect(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.canvas_size)
    }

    pub fn background(&self) -> Option<&Frame> {
        self.background.as_ref()
    }

    /// Replace the background frame; it is stretched over the whole canvas
    pub fn set_background(&mut self, frame: Frame) {
        self.background = Some(frame);
    }

    pub fn objects(&self) -> &[ImageObject] {
        &self.objects
    }

    pub fn add_object(&mut self, object: ImageObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub(crate) fn object_mut(&mut self, index: usize) -> Option<&mut ImageObject> {
        self.objects.get_mut(index)
    }

    /// Index of the image object with the largest native area
    pub fn largest_object(&self) -> Option<usize> {
        self.objects
            .iter()
            .enumerate()
            .max_by_key(|(_, object)| object.native_area())
            .map(|(index, _)| index)
    }
}
