//! Boundary with the drawing surface.
//!
//! The drawing surface reports each rectangle as a JSON object with
//! `left`, `top`, `width`, `height` and a `stroke` color, wrapped in a
//! `{"objects": [...]}` document. The stroke color is how the surface
//! encodes the mode selected when the rectangle was drawn. This module is
//! the only place colors are inspected; everything downstream works with
//! [`MaskMode`].

use serde::{Deserialize, Serialize};

use crate::types::{DrawnRectangle, MaskMode, PipelineError};

/// Stroke color the drawing surface uses for erase rectangles.
pub const ERASE_STROKE: &str = "#ff0000";

/// Stroke color the drawing surface uses for restore rectangles.
pub const RESTORE_STROKE: &str = "#00ff00";

/// Translucent fill shown inside erase rectangles while drawing.
pub const ERASE_FILL: &str = "rgba(255, 0, 0, 0.3)";

/// Translucent fill shown inside restore rectangles while drawing.
pub const RESTORE_FILL: &str = "rgba(0, 255, 0, 0.3)";

impl MaskMode {
    /// Identify the mode from a stroke color.
    ///
    /// Matches [`ERASE_STROKE`] and [`RESTORE_STROKE`] ignoring ASCII
    /// case and surrounding whitespace. Anything else is `None`.
    #[must_use]
    pub fn from_stroke(stroke: &str) -> Option<Self> {
        let stroke = stroke.trim();
        if stroke.eq_ignore_ascii_case(ERASE_STROKE) {
            Some(Self::Erase)
        } else if stroke.eq_ignore_ascii_case(RESTORE_STROKE) {
            Some(Self::Restore)
        } else {
            None
        }
    }

    /// Stroke color a host should configure for this mode.
    #[must_use]
    pub const fn stroke_color(self) -> &'static str {
        match self {
            Self::Erase => ERASE_STROKE,
            Self::Restore => RESTORE_STROKE,
        }
    }

    /// Fill color a host should configure for this mode.
    #[must_use]
    pub const fn fill_color(self) -> &'static str {
        match self {
            Self::Erase => ERASE_FILL,
            Self::Restore => RESTORE_FILL,
        }
    }
}

/// One shape as reported by the drawing surface.
///
/// Only the fields the compositor needs are kept; anything else the
/// surface emits (`type`, `fill`, `angle`, ...) is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasObject {
    /// Left edge in preview pixels.
    pub left: f64,
    /// Top edge in preview pixels.
    pub top: f64,
    /// Width in preview pixels.
    pub width: f64,
    /// Height in preview pixels.
    pub height: f64,
    /// Stroke color; selects the mode.
    #[serde(default)]
    pub stroke: String,
}

impl CanvasObject {
    /// Convert to a [`DrawnRectangle`], or `None` if the stroke color is
    /// not one of the two mode colors.
    #[must_use]
    pub fn to_rectangle(&self) -> Option<DrawnRectangle> {
        MaskMode::from_stroke(&self.stroke)
            .map(|mode| DrawnRectangle::new(self.left, self.top, self.width, self.height, mode))
    }
}

/// The drawing surface's complete state: every shape in draw order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    /// Shapes, oldest first.
    #[serde(default)]
    pub objects: Vec<CanvasObject>,
}

impl CanvasState {
    /// Parse the drawing surface's JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidCanvas`] if the JSON is malformed
    /// or an object lacks one of the geometry fields.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        serde_json::from_str(json).map_err(|e| PipelineError::InvalidCanvas(e.to_string()))
    }

    /// Returns `true` if nothing has been drawn yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All recognized rectangles in draw order.
    ///
    /// Objects with an unrecognized stroke are dropped with a warning
    /// rather than guessed at.
    #[must_use]
    pub fn rectangles(&self) -> Vec<DrawnRectangle> {
        self.objects
            .iter()
            .enumerate()
            .filter_map(|(index, object)| {
                let rect = object.to_rectangle();
                if rect.is_none() {
                    log::warn!(
                        "ignoring canvas object {index}: unrecognized stroke {:?}",
                        object.stroke
                    );
                }
                rect
            })
            .collect()
    }
}
