//! Per-frame detection record.

use crate::tracker::rect::Rect;

/// One detection produced by the detector for the current frame.
///
/// Boxes are rebuilt every frame and only ever read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedBox {
    /// Class label reported by the detector. May be empty when unknown.
    pub label: String,
    /// Detection confidence score in `0.0..=1.0`.
    pub confidence: f32,
    /// Bounding box in frame pixel coordinates.
    pub bbox: Rect,
    /// Text already extracted for this box, if the detector ran OCR itself.
    pub text: Option<String>,
}

impl DetectedBox {
    /// From corner coordinates `(x1, y1, x2, y2)`.
    pub fn new(label: impl Into<String>, x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox: Rect::from_tlbr(x1, y1, x2, y2),
            text: None,
        }
    }

    /// From an existing [`Rect`].
    pub fn from_rect(label: impl Into<String>, bbox: Rect, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
            text: None,
        }
    }

    /// Attach already-extracted text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Box area in square pixels.
    #[inline]
    pub fn area(&self) -> f32 {
        self.bbox.area()
    }

    /// True when the label is one of `classes` (case-insensitive).
    pub fn is_class_in(&self, classes: &[String]) -> bool {
        let label = self.label.trim();
        classes.iter().any(|c| c.trim().eq_ignore_ascii_case(label))
    }
}

/// Largest box by area whose class is not in `exclude`.
pub fn largest_excluding<'a>(boxes: &'a [DetectedBox], exclude: &[String]) -> Option<&'a DetectedBox> {
    boxes
        .iter()
        .filter(|b| !b.is_class_in(exclude))
        .max_by(|a, b| a.area().total_cmp(&b.area()))
}
