//! Shared types for the boxcut rescaling and compositing engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scale::PreviewFilter;

/// Re-export `RgbaImage` so downstream crates can hold the original
/// and composited buffers without depending on `image` directly.
pub use image::RgbaImage;

/// Re-export `RgbImage` for the flattened canvas background.
pub use image::RgbImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an RGBA buffer.
    #[must_use]
    pub fn of(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// What a rectangle does to the alpha channel it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskMode {
    /// Punch a hole: alpha becomes fully transparent.
    Erase,
    /// Bring pixels back: alpha becomes fully opaque.
    Restore,
}

impl MaskMode {
    /// Alpha value written to every covered pixel.
    #[must_use]
    pub const fn alpha(self) -> u8 {
        match self {
            Self::Erase => 0,
            Self::Restore => u8::MAX,
        }
    }
}

impl fmt::Display for MaskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Erase => f.write_str("Erase"),
            Self::Restore => f.write_str("Restore"),
        }
    }
}

/// A rectangle drawn by the user on the preview canvas.
///
/// Coordinates are preview-space pixels and are not validated: a
/// rectangle may extend past the canvas edge. The compositor clips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnRectangle {
    /// Distance from the left edge of the preview.
    pub left: f64,
    /// Distance from the top edge of the preview.
    pub top: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
    /// Erase or restore.
    pub mode: MaskMode,
}

impl DrawnRectangle {
    /// Create a new preview-space rectangle.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64, mode: MaskMode) -> Self {
        Self {
            left,
            top,
            width,
            height,
            mode,
        }
    }
}

/// A rectangle in source (original image) pixel space.
///
/// Produced by [`ScaleContext::rescale`](crate::ScaleContext::rescale).
/// Signed so that spans starting left of or above the image survive
/// until clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRectangle {
    /// Left edge in source pixels.
    pub left: i64,
    /// Top edge in source pixels.
    pub top: i64,
    /// Width in source pixels.
    pub width: i64,
    /// Height in source pixels.
    pub height: i64,
    /// Erase or restore.
    pub mode: MaskMode,
}

impl SourceRectangle {
    /// Returns `true` if the rectangle covers no pixels at all.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> i64 {
        self.left.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i64 {
        self.top.saturating_add(self.height)
    }
}

/// Configuration for an editing session.
///
/// Constructed once per loaded image; the derived
/// [`ScaleContext`](crate::ScaleContext) never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Widest preview the host can display. Wider images are scaled
    /// down uniformly to exactly this width.
    pub display_cap: u32,

    /// Resampling filter used to build the preview.
    pub preview_filter: PreviewFilter,
}

impl EditorConfig {
    /// Default preview width cap in pixels.
    pub const DEFAULT_DISPLAY_CAP: u32 = 800;

    /// Default preview resampling filter.
    pub const DEFAULT_PREVIEW_FILTER: PreviewFilter = PreviewFilter::CatmullRom;

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `display_cap` is zero.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.display_cap == 0 {
            return Err(PipelineError::InvalidConfig(
                "display_cap must be at least 1 pixel".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            display_cap: Self::DEFAULT_DISPLAY_CAP,
            preview_filter: Self::DEFAULT_PREVIEW_FILTER,
        }
    }
}

/// Errors that can occur while loading an image or reading canvas data.
///
/// Compositing itself never fails: malformed rectangles are skipped.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Editor configuration is invalid.
    #[error("invalid editor configuration: {0}")]
    InvalidConfig(String),

    /// The drawing surface's JSON document could not be parsed.
    #[error("invalid canvas data: {0}")]
    InvalidCanvas(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- Dimensions tests ---

    #[test]
    fn dimensions_of_image() {
        let img = RgbaImage::new(17, 31);
        assert_eq!(
            Dimensions::of(&img),
            Dimensions {
                width: 17,
                height: 31
            }
        );
    }

    #[test]
    fn dimensions_display() {
        let dims = Dimensions {
            width: 1600,
            height: 900,
        };
        assert_eq!(dims.to_string(), "1600x900");
    }

    // --- MaskMode tests ---

    #[test]
    fn erase_is_fully_transparent() {
        assert_eq!(MaskMode::Erase.alpha(), 0);
    }

    #[test]
    fn restore_is_fully_opaque() {
        assert_eq!(MaskMode::Restore.alpha(), 255);
    }

    // --- SourceRectangle tests ---

    #[test]
    fn zero_width_is_degenerate() {
        let rect = SourceRectangle {
            left: 5,
            top: 5,
            width: 0,
            height: 10,
            mode: MaskMode::Erase,
        };
        assert!(rect.is_degenerate());
    }

    #[test]
    fn negative_height_is_degenerate() {
        let rect = SourceRectangle {
            left: 5,
            top: 5,
            width: 3,
            height: -1,
            mode: MaskMode::Restore,
        };
        assert!(rect.is_degenerate());
    }

    #[test]
    fn right_and_bottom_are_exclusive() {
        let rect = SourceRectangle {
            left: 20,
            top: 40,
            width: 60,
            height: 80,
            mode: MaskMode::Erase,
        };
        assert!(!rect.is_degenerate());
        assert_eq!(rect.right(), 80);
        assert_eq!(rect.bottom(), 120);
    }

    #[test]
    fn right_saturates_instead_of_overflowing() {
        let rect = SourceRectangle {
            left: i64::MAX - 1,
            top: 0,
            width: 10,
            height: 1,
            mode: MaskMode::Erase,
        };
        assert_eq!(rect.right(), i64::MAX);
    }

    // --- EditorConfig tests ---

    #[test]
    fn default_config_uses_800_pixel_cap() {
        let config = EditorConfig::default();
        assert_eq!(config.display_cap, 800);
        assert_eq!(config.preview_filter, PreviewFilter::CatmullRom);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_display_cap_is_invalid() {
        let config = EditorConfig {
            display_cap: 0,
            ..EditorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_missing_fields_fall_back_to_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{"display_cap": 640}"#).unwrap();
        assert_eq!(config.display_cap, 640);
        assert_eq!(config.preview_filter, EditorConfig::DEFAULT_PREVIEW_FILTER);
    }

    // --- PipelineError tests ---

    #[test]
    fn error_display_messages() {
        assert_eq!(
            PipelineError::EmptyInput.to_string(),
            "input image data is empty"
        );
        assert_eq!(
            PipelineError::InvalidCanvas("missing field".to_string()).to_string(),
            "invalid canvas data: missing field"
        );
    }
}
