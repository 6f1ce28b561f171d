//! Screenshot decoder
//!
//! Each file decodes independently; a corrupt file yields a per-file error
//! without aborting sibling decodes. Multi-file decode fans out on blocking
//! tasks and awaits the full set, so results always come back in selection
//! order regardless of per-file completion order.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

use crate::ProcessingError;

/// A decoded screenshot: bitmap plus pixel dimensions. The PNG encoding is
/// produced lazily via [`DecodedScreenshot::to_png_bytes`].
#[derive(Debug, Clone)]
pub struct DecodedScreenshot {
    pub image: DynamicImage,
    pub width: u32,
    pub height: u32,
}

impl DecodedScreenshot {
    /// Encode the bitmap as PNG
    pub fn to_png_bytes(&self) -> Result<Bytes, ProcessingError> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| ProcessingError::EncodeFailed(e.to_string()))?;
        Ok(Bytes::from(buffer))
    }

    /// Encode the bitmap as a `data:image/png;base64,` URI
    pub fn to_data_uri(&self) -> Result<String, ProcessingError> {
        use base64::{engine::general_purpose::STANDARD, Engine};
        let png = self.to_png_bytes()?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
    }
}

/// Decode a single screenshot from raw file bytes
pub fn decode_screenshot(data: &[u8]) -> Result<DecodedScreenshot, ProcessingError> {
    let cursor = Cursor::new(data);
    let image = ImageReader::new(cursor)
        .with_guessed_format()
        .map_err(|e| ProcessingError::DecodeFailed(e.to_string()))?
        .decode()
        .map_err(|e| ProcessingError::DecodeFailed(e.to_string()))?;

    let (width, height) = image.dimensions();
    Ok(DecodedScreenshot {
        image,
        width,
        height,
    })
}

/// Decode several screenshots concurrently.
///
/// One blocking task per file; the full set is awaited before any result is
/// exposed, which keeps the output aligned with the input order. Each entry
/// is an independent `Result` so one corrupt file does not lose the rest.
pub async fn decode_screenshots(
    files: Vec<Bytes>,
) -> Vec<Result<DecodedScreenshot, ProcessingError>> {
    let tasks = files.into_iter().map(|data| {
        tokio::task::spawn_blocking(move || decode_screenshot(&data))
    });

    futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| match joined {
            Ok(result) => result,
            Err(e) => Err(ProcessingError::DecodeFailed(format!(
                "decode task failed: {}",
                e
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Bytes {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        img.write_to(&mut cursor, ImageFormat::Png).unwrap();
        Bytes::from(buffer)
    }

    #[test]
    fn test_decode_screenshot() {
        let decoded = decode_screenshot(&png_bytes(120, 80)).unwrap();
        assert_eq!(decoded.width, 120);
        assert_eq!(decoded.height, 80);
    }

    #[test]
    fn test_decode_screenshot_invalid_data() {
        let result = decode_screenshot(b"not an image");
        assert!(matches!(result, Err(ProcessingError::DecodeFailed(_))));
    }

    #[test]
    fn test_data_uri_has_png_prefix() {
        let decoded = decode_screenshot(&png_bytes(4, 4)).unwrap();
        let uri = decoded.to_data_uri().unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_decode_screenshots_preserves_order() {
        let files = vec![png_bytes(10, 10), png_bytes(20, 20), png_bytes(30, 30)];
        let results = decode_screenshots(files).await;
        assert_eq!(results.len(), 3);
        let widths: Vec<u32> = results
            .into_iter()
            .map(|r| r.unwrap().width)
            .collect();
        assert_eq!(widths, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn test_decode_screenshots_bad_file_does_not_abort_siblings() {
        let files = vec![
            png_bytes(10, 10),
            Bytes::from_static(b"corrupt"),
            png_bytes(30, 30),
        ];
        let results = decode_screenshots(files).await;
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
