//! Interactive crop box over the background frame or an image object.
//!
//! The overlay is idle until [`CropOverlay::enter`] finds a target. While
//! active it owns a [`CropBox`] that can be moved and resized inside the
//! target's bounds, with four masks darkening everything outside it.
//! [`CropOverlay::apply`] rasterises the selected region and replaces the
//! target's pixels; [`CropOverlay::cancel`] drops the box without touching
//! anything.

use egui::{Color32, CursorIcon, Pos2, Rect, Vec2};
use image::{imageops, RgbaImage};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::CropSettings;
use crate::error::CropError;
use crate::geometry::hit_testing::{handle_at, Handle};
use crate::scene::{Frame, Scene};
use crate::surface::{isolated, Dash, Surface};

const MASK_COLOR: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 128);
const BOX_COLOR: Color32 = Color32::from_rgb(0x00, 0x7b, 0xff);
const BOX_LINE_WIDTH: f32 = 2.0;
const BOX_DASH: Dash = Dash::new(5.0, 5.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    Free,
    Square,
    Widescreen,
    Standard,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Free,
        AspectRatio::Square,
        AspectRatio::Widescreen,
        AspectRatio::Standard,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Free => "free",
            AspectRatio::Square => "1:1",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Standard => "4:3",
        }
    }

    /// Height of a freshly created box of the given width
    pub fn height_for(&self, width: f32) -> f32 {
        match self {
            AspectRatio::Free => width * 0.75,
            AspectRatio::Square => width,
            AspectRatio::Widescreen => width * 9.0 / 16.0,
            AspectRatio::Standard => width * 3.0 / 4.0,
        }
    }

    /// Width over height enforced while resizing, `None` for free
    pub fn locked_ratio(&self) -> Option<f32> {
        match self {
            AspectRatio::Free => None,
            AspectRatio::Square => Some(1.0),
            AspectRatio::Widescreen => Some(16.0 / 9.0),
            AspectRatio::Standard => Some(4.0 / 3.0),
        }
    }
}

/// A crop rectangle in canvas coordinates, as recorded in the image settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: rect.min.x,
            y: rect.min.y,
            width: rect.width(),
            height: rect.height(),
        }
    }

    pub fn to_rect(&self) -> Rect {
        Rect::from_min_size(Pos2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }
}

/// The interactive box: base size plus the scale applied by resizing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub aspect: AspectRatio,
}

impl CropBox {
    /// Box centred in `bounds`, as wide as `fraction` of the shorter side up
    /// to `max_size`, with its height taken from `aspect`
    pub fn centered(bounds: Rect, aspect: AspectRatio, fraction: f32, max_size: f32) -> Self {
        let width = (bounds.width().min(bounds.height()) * fraction).min(max_size);
        let height = aspect.height_for(width);
        Self {
            left: bounds.min.x + (bounds.width() - width) / 2.0,
            top: bounds.min.y + (bounds.height() - height) / 2.0,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            aspect,
        }
    }

    pub fn displayed_width(&self) -> f32 {
        self.width * self.scale_x
    }

    pub fn displayed_height(&self) -> f32 {
        self.height * self.scale_y
    }

    /// Displayed rectangle in canvas coordinates
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.left, self.top),
            Vec2::new(self.displayed_width(), self.displayed_height()),
        )
    }

    /// Move and scale the box so it covers `rect`; the base size is kept
    fn set_rect(&mut self, rect: Rect) {
        self.left = rect.min.x;
        self.top = rect.min.y;
        if self.width > 0.0 && self.height > 0.0 {
            self.scale_x = rect.width() / self.width;
            self.scale_y = rect.height() / self.height;
        } else {
            self.width = rect.width();
            self.height = rect.height();
        }
    }
}

/// Image the crop applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropTarget {
    Background,
    Object(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Resize(Handle),
}

impl DragMode {
    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            DragMode::Move => CursorIcon::Move,
            DragMode::Resize(handle) => handle.cursor_icon(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CropDrag {
    mode: DragMode,
    origin: Pos2,
    start: Rect,
}

#[derive(Debug, Clone)]
struct CropSession {
    target: CropTarget,
    bounds: Rect,
    crop_box: CropBox,
    drag: Option<CropDrag>,
}

/// Outcome of a successful apply
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCrop {
    pub target: CropTarget,
    /// Selected region in canvas coordinates
    pub rect: CropRect,
    /// Size of the new raster in pixels
    pub output_size: [u32; 2],
}

#[derive(Debug, Clone, Default)]
pub struct CropOverlay {
    settings: CropSettings,
    aspect: AspectRatio,
    session: Option<CropSession>,
}

impl CropOverlay {
    pub fn new(settings: CropSettings) -> Self {
        Self {
            settings,
            aspect: AspectRatio::Free,
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn aspect(&self) -> AspectRatio {
        self.aspect
    }

    pub fn target(&self) -> Option<CropTarget> {
        self.session.as_ref().map(|s| s.target)
    }

    /// Bounds of the target in canvas coordinates
    pub fn bounds(&self) -> Option<Rect> {
        self.session.as_ref().map(|s| s.bounds)
    }

    pub fn crop_box(&self) -> Option<&CropBox> {
        self.session.as_ref().map(|s| &s.crop_box)
    }

    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.drag.is_some())
    }

    /// Start cropping the background frame, or the largest image object when
    /// there is no background. Without either the overlay stays idle.
    pub fn enter(&mut self, scene: &Scene) -> Result<(), CropError> {
        let (target, bounds) = if scene.background().is_some() {
            (CropTarget::Background, scene.canvas_rect())
        } else if let Some(index) = scene.largest_object() {
            (CropTarget::Object(index), scene.objects()[index].bounds)
        } else {
            warn!("No image found to crop");
            return Err(CropError::NoTarget);
        };

        let crop_box = self.initial_box(bounds);
        info!("🔲 Crop mode entered on {:?}, box {:?}", target, crop_box.rect());
        self.session = Some(CropSession {
            target,
            bounds,
            crop_box,
            drag: None,
        });
        Ok(())
    }

    /// Change the aspect ratio. An active box is recreated, centred again.
    pub fn set_aspect(&mut self, aspect: AspectRatio) {
        self.aspect = aspect;
        let settings = &self.settings;
        if let Some(session) = self.session.as_mut() {
            session.crop_box = CropBox::centered(
                session.bounds,
                aspect,
                settings.initial_fraction,
                settings.max_initial_size,
            );
            session.drag = None;
        }
    }

    fn initial_box(&self, bounds: Rect) -> CropBox {
        CropBox::centered(
            bounds,
            self.aspect,
            self.settings.initial_fraction,
            self.settings.max_initial_size,
        )
    }

    /// What a press at `pos` would grab: a handle first, then the box body
    pub fn hit_test(&self, pos: Pos2) -> Option<DragMode> {
        let rect = self.session.as_ref()?.crop_box.rect();
        if let Some(handle) = handle_at(pos, rect, self.settings.handle_radius) {
            Some(DragMode::Resize(handle))
        } else if rect.contains(pos) {
            Some(DragMode::Move)
        } else {
            None
        }
    }

    pub fn begin_drag(&mut self, pos: Pos2) -> bool {
        let Some(mode) = self.hit_test(pos) else {
            return false;
        };
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.drag = Some(CropDrag {
            mode,
            origin: pos,
            start: session.crop_box.rect(),
        });
        true
    }

    pub fn drag_to(&mut self, pos: Pos2) {
        let min_size = self.settings.min_size;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(drag) = session.drag else {
            return;
        };

        let delta = pos - drag.origin;
        let rect = match drag.mode {
            DragMode::Move => move_rect(drag.start, delta, session.bounds),
            DragMode::Resize(handle) => resize_rect(
                drag.start,
                handle,
                delta,
                session.crop_box.aspect.locked_ratio(),
                session.bounds,
                min_size,
            ),
        };
        session.crop_box.set_rect(rect);
    }

    pub fn end_drag(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.drag = None;
        }
    }

    /// Top, bottom, left and right masks covering the bounds outside the box
    pub fn masks(&self) -> Option<[Rect; 4]> {
        let session = self.session.as_ref()?;
        Some(masks_for(session.crop_box.rect(), session.bounds))
    }

    /// Leave crop mode without changing anything
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            info!("🔲 Crop cancelled");
        }
    }

    /// Rasterise the selected region and put it in place of the target.
    ///
    /// The region is mapped into the target's native pixels with
    /// `scale = native size / displayed size`. Cropping the background also
    /// resizes the canvas to the displayed crop size. Crop mode ends either way.
    pub fn apply(&mut self, scene: &mut Scene) -> Result<AppliedCrop, CropError> {
        let session = self.session.take().ok_or(CropError::NotActive)?;
        let rect = session.crop_box.rect();
        let bounds = session.bounds;

        let source = match session.target {
            CropTarget::Background => scene.background().cloned(),
            CropTarget::Object(index) => scene.objects().get(index).map(|o| o.frame.clone()),
        }
        .ok_or(CropError::MissingImage)?;

        let cropped = crop_pixels(source.pixels(), rect, bounds)?;
        let output_size = [cropped.width(), cropped.height()];

        match session.target {
            CropTarget::Background => {
                scene.set_canvas_size(Vec2::new(rect.width().round(), rect.height().round()));
                scene.set_background(Frame::new(cropped));
            }
            CropTarget::Object(index) => {
                let object = scene.object_mut(index).ok_or(CropError::MissingImage)?;
                object.frame = Frame::new(cropped);
                object.bounds = rect;
            }
        }

        info!(
            "🔲 Crop applied to {:?}: {:?} -> {}x{}",
            session.target, rect, output_size[0], output_size[1]
        );
        Ok(AppliedCrop {
            target: session.target,
            rect: CropRect::from_rect(rect),
            output_size,
        })
    }

    /// Masks, the dashed box outline and its resize handles
    pub fn render(&self, surface: &mut dyn Surface) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let rect = session.crop_box.rect();
        let handle_size = self.settings.handle_radius;

        isolated(surface, |surface| {
            surface.state_mut().fill_color = MASK_COLOR;
            for mask in masks_for(rect, session.bounds) {
                if mask.width() > 0.0 && mask.height() > 0.0 {
                    surface.fill_rect(mask, 0.0);
                }
            }

            let state = surface.state_mut();
            state.stroke_color = BOX_COLOR;
            state.fill_color = BOX_COLOR;
            state.line_width = BOX_LINE_WIDTH;
            state.dash = Some(BOX_DASH);
            surface.stroke_rect(rect, 0.0);

            for handle in Handle::ALL {
                let square = Rect::from_center_size(handle.position(rect), Vec2::splat(handle_size));
                surface.fill_rect(square, 0.0);
            }
        });
    }
}

fn masks_for(rect: Rect, bounds: Rect) -> [Rect; 4] {
    let top = Rect::from_min_size(
        bounds.min,
        Vec2::new(bounds.width(), (rect.min.y - bounds.min.y).max(0.0)),
    );
    let bottom = Rect::from_min_size(
        Pos2::new(bounds.min.x, rect.max.y),
        Vec2::new(bounds.width(), (bounds.max.y - rect.max.y).max(0.0)),
    );
    let left = Rect::from_min_size(
        Pos2::new(bounds.min.x, rect.min.y),
        Vec2::new((rect.min.x - bounds.min.x).max(0.0), rect.height()),
    );
    let right = Rect::from_min_size(
        Pos2::new(rect.max.x, rect.min.y),
        Vec2::new((bounds.max.x - rect.max.x).max(0.0), rect.height()),
    );
    [top, bottom, left, right]
}

/// Translate `start` by `delta`, kept inside `bounds`
fn move_rect(start: Rect, delta: Vec2, bounds: Rect) -> Rect {
    let size = start.size();
    let max_x = (bounds.max.x - size.x).max(bounds.min.x);
    let max_y = (bounds.max.y - size.y).max(bounds.min.y);
    let min = Pos2::new(
        (start.min.x + delta.x).clamp(bounds.min.x, max_x),
        (start.min.y + delta.y).clamp(bounds.min.y, max_y),
    );
    Rect::from_min_size(min, size)
}

/// Resize `start` by dragging `handle` by `delta`.
///
/// The edge or corner opposite the handle stays put. The result is at least
/// `min_size` on each side, never leaves `bounds`, and keeps `ratio`
/// (width / height) when one is given.
fn resize_rect(
    start: Rect,
    handle: Handle,
    delta: Vec2,
    ratio: Option<f32>,
    bounds: Rect,
    min_size: f32,
) -> Rect {
    let hs = handle.horizontal_sign();
    let vs = handle.vertical_sign();

    // Edges that do not move grow towards +x / +y if the ratio forces a change
    let (anchor_x, dir_x) = if hs < 0 { (start.max.x, -1.0) } else { (start.min.x, 1.0) };
    let (anchor_y, dir_y) = if vs < 0 { (start.max.y, -1.0) } else { (start.min.y, 1.0) };

    let avail_w = (if dir_x > 0.0 { bounds.max.x - anchor_x } else { anchor_x - bounds.min.x }).max(min_size);
    let avail_h = (if dir_y > 0.0 { bounds.max.y - anchor_y } else { anchor_y - bounds.min.y }).max(min_size);

    let mut width = if hs == 0 {
        start.width()
    } else {
        let edge = (if hs < 0 { start.min.x } else { start.max.x }) + delta.x;
        (edge - anchor_x) * dir_x
    };
    let mut height = if vs == 0 {
        start.height()
    } else {
        let edge = (if vs < 0 { start.min.y } else { start.max.y }) + delta.y;
        (edge - anchor_y) * dir_y
    };

    width = width.clamp(min_size, avail_w);
    height = height.clamp(min_size, avail_h);

    if let Some(ratio) = ratio {
        if hs != 0 {
            height = width / ratio;
        } else {
            width = height * ratio;
        }
        if height < min_size {
            height = min_size;
            width = height * ratio;
        }
        if width > avail_w {
            width = avail_w;
            height = width / ratio;
        }
        if height > avail_h {
            height = avail_h;
            width = height * ratio;
        }
    }

    let min_x = if dir_x > 0.0 { anchor_x } else { anchor_x - width };
    let min_y = if dir_y > 0.0 { anchor_y } else { anchor_y - height };
    Rect::from_min_size(Pos2::new(min_x, min_y), Vec2::new(width, height))
}

/// Copy the part of `source` under `rect` into a new raster.
///
/// `bounds` is where `source` is displayed; areas of `rect` outside the
/// source stay transparent.
fn crop_pixels(source: &RgbaImage, rect: Rect, bounds: Rect) -> Result<RgbaImage, CropError> {
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Err(CropError::EmptySelection);
    }
    let scale_x = source.width() as f32 / bounds.width();
    let scale_y = source.height() as f32 / bounds.height();

    let out_w = (rect.width() * scale_x).round();
    let out_h = (rect.height() * scale_y).round();
    if out_w < 1.0 || out_h < 1.0 {
        return Err(CropError::EmptySelection);
    }
    let (out_w, out_h) = (out_w as u32, out_h as u32);

    let src_x = ((rect.min.x - bounds.min.x) * scale_x).round() as i64;
    let src_y = ((rect.min.y - bounds.min.y) * scale_y).round() as i64;

    let x0 = src_x.max(0);
    let y0 = src_y.max(0);
    let x1 = (src_x + out_w as i64).min(source.width() as i64);
    let y1 = (src_y + out_h as i64).min(source.height() as i64);

    let mut output = RgbaImage::new(out_w, out_h);
    if x1 > x0 && y1 > y0 {
        let region = imageops::crop_imm(source, x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32).to_image();
        imageops::replace(&mut output, &region, x0 - src_x, y0 - src_y);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn square(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::from_min_size(Pos2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_initial_box_uses_shorter_side_and_caps() {
        let small = CropBox::centered(square(0.0, 0.0, 200.0, 100.0), AspectRatio::Square, 0.8, 300.0);
        assert_eq!(small.rect(), square(60.0, 10.0, 80.0, 80.0));

        let large = CropBox::centered(square(0.0, 0.0, 1000.0, 1000.0), AspectRatio::Widescreen, 0.8, 300.0);
        assert_eq!(large.displayed_width(), 300.0);
        assert_eq!(large.displayed_height(), 300.0 * 9.0 / 16.0);
    }

    #[test]
    fn test_resize_keeps_opposite_corner_and_ratio() {
        let bounds = square(0.0, 0.0, 400.0, 400.0);
        let start = square(100.0, 100.0, 100.0, 100.0);
        let rect = resize_rect(start, Handle::BottomRight, Vec2::new(50.0, 10.0), Some(1.0), bounds, 10.0);
        assert_eq!(rect, square(100.0, 100.0, 150.0, 150.0));

        let rect = resize_rect(start, Handle::TopLeft, Vec2::new(200.0, 0.0), None, bounds, 10.0);
        assert_eq!(rect.max, start.max);
        assert_eq!(rect.width(), 10.0);
    }

    #[test]
    fn test_resize_and_move_stay_in_bounds() {
        let bounds = square(0.0, 0.0, 300.0, 200.0);
        let start = square(100.0, 50.0, 100.0, 100.0);
        let rect = resize_rect(start, Handle::Right, Vec2::new(500.0, 0.0), None, bounds, 10.0);
        assert_eq!(rect.max.x, 300.0);

        let moved = move_rect(start, Vec2::new(-500.0, 500.0), bounds);
        assert_eq!(moved, square(0.0, 100.0, 100.0, 100.0));
    }

    #[test]
    fn test_crop_pixels_maps_native_scale() {
        let mut source = RgbaImage::new(20, 20);
        source.put_pixel(10, 10, Rgba([255, 0, 0, 255]));
        // Displayed at half size
        let out = crop_pixels(&source, square(5.0, 5.0, 4.0, 2.0), square(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(out.dimensions(), (8, 4));
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_crop_outside_source_is_transparent() {
        let source = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        let out = crop_pixels(&source, square(2.0, 2.0, 4.0, 4.0), square(0.0, 0.0, 4.0, 4.0)).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([9, 9, 9, 255]));
        assert_eq!(out.get_pixel(3, 3)[3], 0);
    }
}
