use thiserror::Error;

use crate::drawing::DrawingId;

/// Errors raised by the crop overlay
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CropError {
    #[error("no image to crop: neither a background frame nor an image object is present")]
    NoTarget,
    #[error("crop mode is not active")]
    NotActive,
    #[error("crop selection is empty after clamping to the image")]
    EmptySelection,
    #[error("crop target no longer exists")]
    MissingImage,
}

/// Errors raised while loading or validating the engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised when a command cannot be applied to the canvas state
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("drawing {0:?} is not on the canvas")]
    UnknownDrawing(DrawingId),
    #[error("erase commands require a drawing made with the eraser")]
    NotAnEraser,
}

/// Errors raised while turning a dropped file into a frame
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("dropped file has no accessible data")]
    NoData,
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}
