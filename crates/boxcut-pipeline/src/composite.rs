//! Alpha mask compositor: apply drawn rectangles to the alpha channel.
//!
//! Every call starts from a fresh copy of the original buffer and replays
//! the complete rectangle list in draw order. Nothing is carried over
//! between calls, so the host can edit or remove rectangles upstream and
//! simply recomposite. Later rectangles win where they overlap earlier
//! ones.
//!
//! Only channel 3 is written. RGB values under an erased region are
//! preserved, which is what makes a later restore over the same pixels
//! bring the original colors back.

use serde::Serialize;

use crate::scale::ScaleContext;
use crate::types::{Dimensions, DrawnRectangle, RgbaImage, SourceRectangle};

/// Index of the alpha channel in an RGBA pixel.
const ALPHA: usize = 3;

/// Half-open pixel span `[x0, x1) x [y0, y1)` that lies inside an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSpan {
    /// First column (inclusive).
    pub x0: u32,
    /// First row (inclusive).
    pub y0: u32,
    /// Last column (exclusive).
    pub x1: u32,
    /// Last row (exclusive).
    pub y1: u32,
}

impl PixelSpan {
    /// Number of columns covered.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    /// Number of rows covered.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    /// Number of pixels covered.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }
}

impl SourceRectangle {
    /// Intersect with the image bounds `[0, width) x [0, height)`.
    ///
    /// Returns `None` when nothing of the rectangle lies inside the
    /// image, including degenerate rectangles.
    #[must_use]
    pub fn clip_to(&self, bounds: Dimensions) -> Option<PixelSpan> {
        if self.is_degenerate() {
            return None;
        }

        let max_x = i64::from(bounds.width);
        let max_y = i64::from(bounds.height);
        let x0 = self.left.clamp(0, max_x);
        let x1 = self.right().clamp(0, max_x);
        let y0 = self.top.clamp(0, max_y);
        let y1 = self.bottom().clamp(0, max_y);

        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        Some(PixelSpan {
            x0: u32::try_from(x0).ok()?,
            y0: u32::try_from(y0).ok()?,
            x1: u32::try_from(x1).ok()?,
            y1: u32::try_from(y1).ok()?,
        })
    }

    /// Returns `true` if the whole rectangle lies inside the bounds.
    #[must_use]
    pub fn fits_within(&self, bounds: Dimensions) -> bool {
        self.left >= 0
            && self.top >= 0
            && self.right() <= i64::from(bounds.width)
            && self.bottom() <= i64::from(bounds.height)
    }
}

/// What happened to each rectangle during one compositing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompositeReport {
    /// Rectangles that changed at least one pixel's alpha.
    pub applied: usize,
    /// Applied rectangles that had to be cut down to the image bounds.
    pub clipped: usize,
    /// Rectangles skipped because their rescaled width or height was
    /// not positive.
    pub skipped_degenerate: usize,
    /// Rectangles that lay entirely outside the image.
    pub out_of_bounds: usize,
    /// Sum of pixels written across all applied rectangles (overlaps
    /// counted once per rectangle).
    pub pixels_written: u64,
}

impl CompositeReport {
    /// Total number of rectangles seen.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.applied + self.skipped_degenerate + self.out_of_bounds
    }

    /// Human-readable multi-line summary.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("Composite Report\n{}", "=".repeat(40)));
        lines.push(format!("{:<24} {:>8}", "Rectangles", self.total()));
        lines.push(format!("{:<24} {:>8}", "Applied", self.applied));
        lines.push(format!("{:<24} {:>8}", "  of which clipped", self.clipped));
        lines.push(format!(
            "{:<24} {:>8}",
            "Skipped (degenerate)", self.skipped_degenerate
        ));
        lines.push(format!(
            "{:<24} {:>8}",
            "Skipped (off-image)", self.out_of_bounds
        ));
        lines.push(format!("{:<24} {:>8}", "Pixels written", self.pixels_written));
        lines.join("\n")
    }
}

/// Apply `rects` in order to a fresh copy of `original`.
///
/// Each rectangle is rescaled through `ctx`, skipped if degenerate,
/// clipped to the image, and then has every covered pixel's alpha set
/// to 0 ([`MaskMode::Erase`](crate::MaskMode::Erase)) or 255
/// ([`MaskMode::Restore`](crate::MaskMode::Restore)).
///
/// The result depends only on the arguments. An empty `rects` returns a
/// buffer identical to `original`.
#[must_use = "returns the composited image; the original is never modified"]
pub fn composite(
    original: &RgbaImage,
    rects: &[DrawnRectangle],
    ctx: &ScaleContext,
) -> RgbaImage {
    composite_with_report(original, rects, ctx).0
}

/// Like [`composite`], also returning what happened to each rectangle.
#[must_use = "returns the composited image; the original is never modified"]
pub fn composite_with_report(
    original: &RgbaImage,
    rects: &[DrawnRectangle],
    ctx: &ScaleContext,
) -> (RgbaImage, CompositeReport) {
    let mut output = original.clone();
    let bounds = Dimensions::of(original);
    let mut report = CompositeReport::default();

    for (index, rect) in rects.iter().enumerate() {
        let source = ctx.rescale(rect);

        if source.is_degenerate() {
            log::debug!("rectangle {index}: rescaled to {source:?}, skipping degenerate");
            report.skipped_degenerate += 1;
            continue;
        }

        let Some(span) = source.clip_to(bounds) else {
            log::debug!("rectangle {index}: {source:?} lies outside {bounds}, skipping");
            report.out_of_bounds += 1;
            continue;
        };

        if !source.fits_within(bounds) {
            log::debug!("rectangle {index}: {source:?} clipped to {span:?}");
            report.clipped += 1;
        }

        fill_alpha(&mut output, span, source.mode.alpha());
        report.applied += 1;
        report.pixels_written += span.area();
    }

    (output, report)
}

/// Set the alpha of every pixel in `span` to `alpha`.
///
/// `span` must lie inside `image`; [`SourceRectangle::clip_to`]
/// guarantees that.
fn fill_alpha(image: &mut RgbaImage, span: PixelSpan, alpha: u8) {
    for y in span.y0..span.y1 {
        for x in span.x0..span.x1 {
            image.get_pixel_mut(x, y).0[ALPHA] = alpha;
        }
    }
}
