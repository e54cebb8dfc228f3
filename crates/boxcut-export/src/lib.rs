//! boxcut-export: Pure PNG serializers (sans-IO).
//!
//! Encodes the composited image, and the preview a drawing surface
//! draws over, into PNG bytes. Writing the bytes anywhere is the host's
//! job.

pub mod png;

pub use png::{
    DOWNLOAD_FILENAME, Download, ExportError, PNG_MIME_TYPE, caption, preview_to_png, to_png,
};
