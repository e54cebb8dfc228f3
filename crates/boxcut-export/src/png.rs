//! PNG export.
//!
//! PNG is lossless and keeps the alpha channel, so the erased regions
//! survive the trip to disk exactly as composited. The edited image is
//! always offered under a single fixed filename.

use boxcut_pipeline::{Dimensions, RgbImage, RgbaImage};
use image::{ExtendedColorType, ImageEncoder};

/// Filename the edited image is offered under.
pub const DOWNLOAD_FILENAME: &str = "final.png";

/// MIME type of every export.
pub const PNG_MIME_TYPE: &str = "image/png";

/// Errors that can occur while encoding an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] image::ImageError),
}

/// Encode an RGBA image as PNG bytes, alpha included.
///
/// # Errors
///
/// Returns [`ExportError::PngEncode`] if the encoder rejects the buffer.
pub fn to_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    encode(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgba8)
}

/// Encode the flattened canvas background as PNG bytes.
///
/// # Errors
///
/// Returns [`ExportError::PngEncode`] if the encoder rejects the buffer.
pub fn preview_to_png(image: &RgbImage) -> Result<Vec<u8>, ExportError> {
    encode(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgb8)
}

fn encode(
    raw: &[u8],
    width: u32,
    height: u32,
    color: ExtendedColorType,
) -> Result<Vec<u8>, ExportError> {
    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder.write_image(raw, width, height, color)?;
    Ok(png_bytes)
}

/// An encoded file ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Suggested filename.
    pub filename: &'static str,
    /// MIME type of `bytes`.
    pub mime_type: &'static str,
    /// Encoded file contents.
    pub bytes: Vec<u8>,
}

impl Download {
    /// Encode the edited image as the `final.png` download.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::PngEncode`] if PNG encoding fails.
    pub fn png(image: &RgbaImage) -> Result<Self, ExportError> {
        Ok(Self {
            filename: DOWNLOAD_FILENAME,
            mime_type: PNG_MIME_TYPE,
            bytes: to_png(image)?,
        })
    }
}

/// Caption shown next to the result, stating the export resolution.
#[must_use]
pub fn caption(dimensions: Dimensions) -> String {
    format!("Final size: {dimensions}")
}
