//! Preview scaling and the geometry rescaler.
//!
//! When an image is wider than the host's display cap, the user draws on
//! a uniformly downscaled preview. A single scale factor, derived once at
//! load time, maps everything drawn on that preview back to the original
//! pixel grid. One factor suffices because the preview keeps the aspect
//! ratio; [`preview`] is the only place a preview is produced.

use std::fmt;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, DrawnRectangle, SourceRectangle};

/// Resampling filter used when building the preview.
///
/// Ordered from fastest/lowest-quality to slowest/highest-quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewFilter {
    /// Nearest-neighbor: fastest, blocky artifacts.
    Nearest,
    /// Bilinear interpolation: fast, decent quality.
    Triangle,
    /// Bicubic (Catmull-Rom): moderate speed, good quality.
    CatmullRom,
    /// Gaussian: moderate speed, smooth output.
    Gaussian,
    /// Lanczos with 3 lobes: slowest, sharpest/best for photos.
    Lanczos3,
}

impl Default for PreviewFilter {
    fn default() -> Self {
        Self::CatmullRom
    }
}

impl PreviewFilter {
    /// Convert to the `image` crate's `FilterType`.
    const fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Triangle => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Gaussian => image::imageops::FilterType::Gaussian,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for PreviewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("Nearest"),
            Self::Triangle => f.write_str("Triangle"),
            Self::CatmullRom => f.write_str("CatmullRom"),
            Self::Gaussian => f.write_str("Gaussian"),
            Self::Lanczos3 => f.write_str("Lanczos3"),
        }
    }
}

/// Mapping between preview space and source space for one image.
///
/// Fields are private so the invariants hold for the whole session:
/// `scale_factor >= 1.0`, `display_width <= width of the original`,
/// and neither display dimension exceeds the original's. Both are at
/// least one pixel unless the original itself is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleContext {
    scale_factor: f64,
    display_width: u32,
    display_height: u32,
}

impl ScaleContext {
    /// Derive the context for an image of `source` dimensions shown in a
    /// preview at most `display_cap` pixels wide.
    ///
    /// Images no wider than the cap are shown as-is with a factor of
    /// `1.0`. A `display_cap` of zero is treated as "no cap";
    /// [`EditorConfig::validate`](crate::EditorConfig::validate) rejects
    /// it before a session gets this far.
    #[must_use]
    pub fn for_dimensions(source: Dimensions, display_cap: u32) -> Self {
        if display_cap == 0 || source.width <= display_cap {
            return Self::identity(source);
        }

        let scale_factor = f64::from(source.width) / f64::from(display_cap);
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let display_height = (f64::from(source.height) / scale_factor) as u32;

        Self {
            scale_factor,
            display_width: display_cap,
            display_height: display_height.max(1).min(source.height),
        }
    }

    /// A context that maps every coordinate to itself.
    #[must_use]
    pub const fn identity(source: Dimensions) -> Self {
        Self {
            scale_factor: 1.0,
            display_width: source.width,
            display_height: source.height,
        }
    }

    /// Ratio of original width to preview width.
    #[must_use]
    pub const fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Preview width in pixels.
    #[must_use]
    pub const fn display_width(&self) -> u32 {
        self.display_width
    }

    /// Preview height in pixels.
    #[must_use]
    pub const fn display_height(&self) -> u32 {
        self.display_height
    }

    /// Preview dimensions.
    #[must_use]
    pub const fn display_dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.display_width,
            height: self.display_height,
        }
    }

    /// Returns `true` if the preview is the original image unscaled.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.scale_factor <= 1.0
    }

    /// Map a preview-space rectangle to source pixel space.
    ///
    /// Each of `left`, `top`, `width`, `height` is multiplied by the
    /// scale factor and truncated toward zero. Nothing is validated
    /// here; degenerate and out-of-range results are the compositor's
    /// business.
    #[must_use]
    pub fn rescale(&self, rect: &DrawnRectangle) -> SourceRectangle {
        SourceRectangle {
            left: scale_coordinate(rect.left, self.scale_factor),
            top: scale_coordinate(rect.top, self.scale_factor),
            width: scale_coordinate(rect.width, self.scale_factor),
            height: scale_coordinate(rect.height, self.scale_factor),
            mode: rect.mode,
        }
    }
}

/// Map a preview-space rectangle to source pixel space.
///
/// Free-function form of [`ScaleContext::rescale`].
#[must_use]
pub fn rescale(rect: &DrawnRectangle, ctx: &ScaleContext) -> SourceRectangle {
    ctx.rescale(rect)
}

/// `value * factor`, truncated toward zero.
///
/// `as` saturates at the `i64` range and sends NaN to zero, so any
/// float the drawing surface hands us yields a usable integer.
#[expect(clippy::cast_possible_truncation)]
fn scale_coordinate(value: f64, factor: f64) -> i64 {
    (value * factor).trunc() as i64
}

/// Build the preview shown to the user.
///
/// Resizes to exactly the context's display dimensions. An identity
/// context returns a copy of the original. An empty display yields an
/// empty buffer without resampling.
#[must_use]
pub fn preview(original: &RgbaImage, ctx: &ScaleContext, filter: PreviewFilter) -> RgbaImage {
    let display = ctx.display_dimensions();
    if ctx.is_identity() && Dimensions::of(original) == display {
        return original.clone();
    }
    if display.width == 0 || display.height == 0 {
        return RgbaImage::new(display.width, display.height);
    }

    image::imageops::resize(
        original,
        display.width,
        display.height,
        filter.to_image_filter(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MaskMode;

    const fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    #[test]
    fn default_filter_is_catmull_rom() {
        assert_eq!(PreviewFilter::default(), PreviewFilter::CatmullRom);
    }

    #[test]
    fn narrow_image_is_identity() {
        let ctx = ScaleContext::for_dimensions(dims(640, 480), 800);
        assert!(ctx.is_identity());
        assert!((ctx.scale_factor() - 1.0).abs() < f64::EPSILON);
        assert_eq!(ctx.display_dimensions(), dims(640, 480));
    }

    #[test]
    fn image_exactly_at_cap_is_identity() {
        let ctx = ScaleContext::for_dimensions(dims(800, 1200), 800);
        assert!(ctx.is_identity());
        assert_eq!(ctx.display_dimensions(), dims(800, 1200));
    }

    #[test]
    fn wide_image_scales_to_cap() {
        let ctx = ScaleContext::for_dimensions(dims(1600, 1200), 800);
        assert!((ctx.scale_factor() - 2.0).abs() < f64::EPSILON);
        assert_eq!(ctx.display_dimensions(), dims(800, 600));
    }

    #[test]
    fn display_height_is_truncated() {
        // 1000 / 800 = 1.25; 333 / 1.25 = 266.4
        let ctx = ScaleContext::for_dimensions(dims(1000, 333), 800);
        assert!((ctx.scale_factor() - 1.25).abs() < f64::EPSILON);
        assert_eq!(ctx.display_height(), 266);
    }

    #[test]
    fn very_flat_image_keeps_one_row() {
        let ctx = ScaleContext::for_dimensions(dims(4000, 2), 800);
        assert_eq!(ctx.display_dimensions(), dims(800, 1));
    }

    #[test]
    fn zero_height_original_gets_zero_height_preview() {
        let ctx = ScaleContext::for_dimensions(dims(1600, 0), 800);
        assert_eq!(ctx.display_dimensions(), dims(800, 0));
    }

    #[test]
    fn display_never_exceeds_original_width() {
        for width in [1, 799, 800, 801, 1234, 5000] {
            let ctx = ScaleContext::for_dimensions(dims(width, 100), 800);
            assert!(ctx.display_width() <= width);
            assert!(ctx.scale_factor() >= 1.0);
        }
    }

    #[test]
    fn zero_cap_means_uncapped() {
        let ctx = ScaleContext::for_dimensions(dims(5000, 100), 0);
        assert!(ctx.is_identity());
    }

    #[test]
    fn identity_rescale_truncates_only() {
        let ctx = ScaleContext::for_dimensions(dims(400, 300), 800);
        let rect = DrawnRectangle::new(10.9, 20.2, 30.5, 40.999, MaskMode::Erase);
        let source = ctx.rescale(&rect);
        assert_eq!(
            source,
            SourceRectangle {
                left: 10,
                top: 20,
                width: 30,
                height: 40,
                mode: MaskMode::Erase,
            }
        );
    }

    #[test]
    fn rescale_doubles_at_factor_two() {
        let ctx = ScaleContext::for_dimensions(dims(1600, 1200), 800);
        let rect = DrawnRectangle::new(10.0, 20.0, 30.0, 40.0, MaskMode::Restore);
        let source = rescale(&rect, &ctx);
        assert_eq!(
            source,
            SourceRectangle {
                left: 20,
                top: 40,
                width: 60,
                height: 80,
                mode: MaskMode::Restore,
            }
        );
    }

    #[test]
    fn rescale_fractional_factor() {
        // factor 1.25: 3 * 1.25 = 3.75 -> 3, 10 * 1.25 = 12.5 -> 12
        let ctx = ScaleContext::for_dimensions(dims(1000, 1000), 800);
        let source = ctx.rescale(&DrawnRectangle::new(3.0, 10.0, 0.5, 1.0, MaskMode::Erase));
        assert_eq!((source.left, source.top), (3, 12));
        assert_eq!((source.width, source.height), (0, 1));
        assert!(source.is_degenerate());
    }

    #[test]
    fn rescale_does_not_validate_range() {
        let ctx = ScaleContext::for_dimensions(dims(1600, 1200), 800);
        let rect = DrawnRectangle::new(790.0, 590.0, 50.0, 50.0, MaskMode::Erase);
        let source = ctx.rescale(&rect);
        assert_eq!(source.right(), 1680);
        assert_eq!(source.bottom(), 1280);
    }

    #[test]
    fn rescale_non_finite_values_saturate() {
        let ctx = ScaleContext::for_dimensions(dims(1600, 1200), 800);
        let rect = DrawnRectangle::new(f64::NAN, 0.0, f64::INFINITY, 1.0, MaskMode::Erase);
        let source = ctx.rescale(&rect);
        assert_eq!(source.left, 0);
        assert_eq!(source.width, i64::MAX);
    }

    #[test]
    fn preview_matches_display_dimensions() {
        let img = RgbaImage::from_pixel(1600, 900, image::Rgba([1, 2, 3, 255]));
        let ctx = ScaleContext::for_dimensions(Dimensions::of(&img), 800);
        let small = preview(&img, &ctx, PreviewFilter::Triangle);
        assert_eq!(small.dimensions(), (800, 450));
    }

    #[test]
    fn identity_preview_is_a_copy() {
        let img = RgbaImage::from_fn(20, 10, |x, y| image::Rgba([x as u8, y as u8, 0, 128]));
        let ctx = ScaleContext::for_dimensions(Dimensions::of(&img), 800);
        let same = preview(&img, &ctx, PreviewFilter::Lanczos3);
        assert_eq!(same, img);
    }
}
