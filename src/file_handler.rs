use std::collections::HashSet;

use egui::{Align2, Color32, Context, DroppedFile, Id, LayerId, Order, TextStyle};
use log::{debug, info, warn};

use crate::error::LoadError;
use crate::scene::Frame;

/// Turns image files dropped onto the window into decoded frames
#[derive(Debug, Default)]
pub struct FileHandler {
    processed_files: HashSet<String>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every newly dropped image file. Files already seen are skipped.
    pub fn take_dropped_frames(&mut self, ctx: &Context) -> Vec<(String, Frame)> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        self.process(&dropped)
    }

    pub(crate) fn process(&mut self, files: &[DroppedFile]) -> Vec<(String, Frame)> {
        let mut frames = Vec::new();
        for file in files {
            let name = display_name(file);
            if self.processed_files.contains(&name) {
                continue;
            }
            if !is_image_file(file) {
                warn!("Dropped file is not a supported image: {}", name);
                continue;
            }
            match read_bytes(file).and_then(|bytes| decode_frame(&bytes)) {
                Ok(frame) => {
                    info!("🖼 Loaded {} ({}x{})", name, frame.width(), frame.height());
                    self.processed_files.insert(name.clone());
                    frames.push((name, frame));
                }
                Err(err) => warn!("Failed to load {}: {}", name, err),
            }
        }
        frames
    }

    /// Dim the window and list the files while they hover over it
    pub fn preview_files_being_dropped(&self, ctx: &Context) {
        let hovered = ctx.input(|i| {
            i.raw
                .hovered_files
                .iter()
                .map(|file| match &file.path {
                    Some(path) => path.display().to_string(),
                    None => "(path not available)".to_owned(),
                })
                .collect::<Vec<_>>()
        });
        if hovered.is_empty() {
            return;
        }

        let text = format!("Dropping files:\n\n{}", hovered.join("\n"));
        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }

    pub fn clear_processed_files(&mut self) {
        self.processed_files.clear();
    }
}

fn display_name(file: &DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// MIME type first, then the file extension
pub fn is_image_file(file: &DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    file.path
        .as_ref()
        .and_then(|path| path.extension())
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "tif" | "tiff")
        })
        .unwrap_or(false)
}

fn read_bytes(file: &DroppedFile) -> Result<Vec<u8>, LoadError> {
    if let Some(bytes) = &file.bytes {
        return Ok(bytes.to_vec());
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Some(path) = &file.path {
            return Ok(std::fs::read(path)?);
        }
    }
    Err(LoadError::NoData)
}

/// Decode an encoded image into an RGBA frame
pub fn decode_frame(bytes: &[u8]) -> Result<Frame, LoadError> {
    let decoded = image::load_from_memory(bytes)?;
    debug!("Decoded image: {}x{}", decoded.width(), decoded.height());
    Ok(Frame::new(decoded.to_rgba8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::path::PathBuf;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let pixels = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut bytes = Cursor::new(Vec::new());
        pixels.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_image_detection() {
        let by_mime = DroppedFile {
            mime: "image/png".to_owned(),
            ..Default::default()
        };
        let by_ext = DroppedFile {
            path: Some(PathBuf::from("scan.TIFF")),
            ..Default::default()
        };
        let text = DroppedFile {
            path: Some(PathBuf::from("notes.txt")),
            ..Default::default()
        };
        assert!(is_image_file(&by_mime));
        assert!(is_image_file(&by_ext));
        assert!(!is_image_file(&text));
    }

    #[test]
    fn test_dropped_bytes_decode_once() {
        let file = DroppedFile {
            name: "frame.png".to_owned(),
            mime: "image/png".to_owned(),
            bytes: Some(png_bytes(4, 3).into()),
            ..Default::default()
        };
        let mut handler = FileHandler::new();
        let frames = handler.process(std::slice::from_ref(&file));
        assert_eq!(frames.len(), 1);
        assert_eq!((frames[0].1.width(), frames[0].1.height()), (4, 3));
        assert!(handler.process(&[file]).is_empty());
    }

    #[test]
    fn test_garbage_bytes_are_skipped() {
        let file = DroppedFile {
            name: "broken.png".to_owned(),
            mime: "image/png".to_owned(),
            bytes: Some(vec![1, 2, 3].into()),
            ..Default::default()
        };
        assert!(FileHandler::new().process(&[file]).is_empty());
    }

    #[test]
    fn test_decode_errors_are_typed() {
        assert!(matches!(decode_frame(&[1, 2, 3]), Err(LoadError::Decode(_))));
        let empty = DroppedFile {
            name: "nothing.png".to_owned(),
            ..Default::default()
        };
        assert!(matches!(read_bytes(&empty), Err(LoadError::NoData)));
    }
}
