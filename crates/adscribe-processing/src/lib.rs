//! Adscribe image processing
//!
//! Screenshot decoding and stitching. Decoding turns raw file bytes into
//! in-memory bitmaps with known pixel dimensions; stitching composites an
//! ordered set of bitmaps into a single image along one axis.

mod decoder;
mod stitcher;

pub use decoder::{decode_screenshot, decode_screenshots, DecodedScreenshot};
pub use stitcher::{CompositeImage, StitchAxis, StitchDirection, StitchSession};

/// Errors produced by the processing crate
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to encode image: {0}")]
    EncodeFailed(String),

    /// Stitching precondition: fewer than two pending images.
    #[error("請至少選擇 2 張圖片")]
    NeedAtLeastTwoImages,
}
