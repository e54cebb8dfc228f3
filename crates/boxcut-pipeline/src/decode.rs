//! Image decoding to a 4-channel buffer.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces an
//! `RgbaImage`. Formats without an alpha channel are up-converted with
//! every pixel fully opaque, so the compositor can always address
//! channel 3.

use image::RgbaImage;

use crate::types::PipelineError;

/// Decode raw image bytes into an RGBA8 buffer.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
#[must_use = "returns the decoded RGBA image"]
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgba8())
}
