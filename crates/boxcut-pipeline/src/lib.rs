//! boxcut-pipeline: Rectangle rescaling and alpha compositing (sans-IO).
//!
//! The user draws rectangles on a preview that may be downscaled from the
//! original image. Each rectangle is tagged erase or restore. This crate:
//!
//! 1. decodes the original into an RGBA buffer,
//! 2. derives a single uniform scale factor and the preview from it,
//! 3. maps drawn rectangles back to original pixel coordinates,
//! 4. replays them, in draw order, onto a fresh copy of the original's
//!    alpha channel.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and buffers. Encoding the result for download lives in
//! `boxcut-export`.

pub mod canvas;
pub mod composite;
pub mod decode;
pub mod scale;
pub mod session;
pub mod types;

pub use canvas::{CanvasObject, CanvasState};
pub use composite::{CompositeReport, PixelSpan, composite, composite_with_report};
pub use scale::{PreviewFilter, ScaleContext, rescale};
pub use session::EditSession;
pub use types::{
    Dimensions, DrawnRectangle, EditorConfig, MaskMode, PipelineError, RgbImage, RgbaImage,
    SourceRectangle,
};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Encode an RGB (no alpha) image so the decode step has to
    /// up-convert.
    fn rgb_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, _y| {
            if x < width / 2 {
                image::Rgb([0, 0, 0])
            } else {
                image::Rgb([255, 255, 255])
            }
        });
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn canvas_to_composite_end_to_end() {
        let png = rgb_png(1600, 400);
        let session = EditSession::load(&png, &EditorConfig::default()).unwrap();
        assert!((session.scale().scale_factor() - 2.0).abs() < f64::EPSILON);

        let canvas = CanvasState::from_json(
            r##"{"objects": [
                {"left": 0, "top": 0, "width": 100, "height": 100, "stroke": "#ff0000"},
                {"left": 50, "top": 50, "width": 100, "height": 100, "stroke": "#00ff00"},
                {"left": 300, "top": 0, "width": 10, "height": 10, "stroke": "#0000ff"}
            ]}"##,
        )
        .unwrap();
        let rects = canvas.rectangles();
        assert_eq!(rects.len(), 2);

        let out = session.render(&rects).unwrap();
        // Erased only: source (0..100, 0..100) minus the restored square.
        assert_eq!(out.get_pixel(10, 10).0[3], 0);
        // Overlap restored.
        assert_eq!(out.get_pixel(150, 150).0[3], 255);
        // Ignored blue rectangle left the pixel alone.
        assert_eq!(out.get_pixel(605, 5).0[3], 255);
        // Colors survive erasing.
        assert_eq!(out.get_pixel(10, 10).0[..3], [0, 0, 0]);
    }

    #[test]
    fn composite_matches_session_render() {
        let png = rgb_png(900, 300);
        let session = EditSession::load(&png, &EditorConfig::default()).unwrap();
        let rects = [
            DrawnRectangle::new(1.0, 2.0, 30.0, 40.0, MaskMode::Erase),
            DrawnRectangle::new(700.0, 200.0, 300.0, 300.0, MaskMode::Erase),
        ];
        let direct = composite(session.original(), &rects, session.scale());
        let rendered = session.render(&rects).unwrap();
        assert_eq!(direct.as_raw(), rendered.as_raw());
    }
}
