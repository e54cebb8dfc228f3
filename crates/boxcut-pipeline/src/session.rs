//! One loaded image and everything derived from it at load time.
//!
//! An [`EditSession`] owns the original buffer, the [`ScaleContext`],
//! and the preview. All three are fixed for the session's lifetime.
//! Rendering never mutates the session: each call to
//! [`EditSession::render`] composites the caller's current rectangle
//! list against the untouched original.

use image::buffer::ConvertBuffer;

use crate::composite::{CompositeReport, composite_with_report};
use crate::decode::decode_rgba;
use crate::scale::{ScaleContext, preview};
use crate::types::{Dimensions, DrawnRectangle, EditorConfig, PipelineError, RgbImage, RgbaImage};

/// A loaded image ready for rectangle editing.
#[derive(Debug, Clone)]
pub struct EditSession {
    original: RgbaImage,
    scale: ScaleContext,
    preview: RgbaImage,
}

impl EditSession {
    /// Decode `image_bytes` and prepare a session.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `config` is invalid.
    /// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
    /// Returns [`PipelineError::ImageDecode`] if the image format is
    /// unrecognized or the data is corrupt.
    pub fn load(image_bytes: &[u8], config: &EditorConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let original = decode_rgba(image_bytes)?;
        Self::from_image(original, config)
    }

    /// Prepare a session from an already decoded image.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `config` is invalid.
    pub fn from_image(original: RgbaImage, config: &EditorConfig) -> Result<Self, PipelineError> {
        config.validate()?;

        let dimensions = Dimensions::of(&original);
        let scale = ScaleContext::for_dimensions(dimensions, config.display_cap);
        let preview = preview(&original, &scale, config.preview_filter);

        log::debug!(
            "loaded {dimensions} image, preview {} (scale factor {:.4})",
            scale.display_dimensions(),
            scale.scale_factor(),
        );

        Ok(Self {
            original,
            scale,
            preview,
        })
    }

    /// The untouched original buffer.
    #[must_use]
    pub const fn original(&self) -> &RgbaImage {
        &self.original
    }

    /// Dimensions of the original.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.original)
    }

    /// Mapping from preview space to source space.
    #[must_use]
    pub const fn scale(&self) -> &ScaleContext {
        &self.scale
    }

    /// The (possibly downscaled) preview, alpha intact.
    #[must_use]
    pub const fn preview(&self) -> &RgbaImage {
        &self.preview
    }

    /// The preview with its alpha channel dropped.
    ///
    /// Drawing surfaces that render their background without alpha show
    /// a blank canvas for transparent PNGs; flattening to RGB keeps the
    /// picture visible.
    #[must_use]
    pub fn canvas_background(&self) -> RgbImage {
        self.preview.convert()
    }

    /// Composite `rects` onto a fresh copy of the original.
    ///
    /// Returns `None` when `rects` is empty: nothing has been drawn yet,
    /// so there is no edited image to show.
    #[must_use]
    pub fn render(&self, rects: &[DrawnRectangle]) -> Option<RgbaImage> {
        self.render_with_report(rects).map(|(image, _)| image)
    }

    /// Like [`render`](Self::render), also returning the per-rectangle
    /// outcome counts.
    #[must_use]
    pub fn render_with_report(
        &self,
        rects: &[DrawnRectangle],
    ) -> Option<(RgbaImage, CompositeReport)> {
        if rects.is_empty() {
            return None;
        }
        Some(composite_with_report(&self.original, rects, &self.scale))
    }
}
