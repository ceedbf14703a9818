//! Assembles [`DetectedBox`] values from raw detector output.

use crate::tracker::{DetectedBox, Rect};

/// Fluent constructor for detector adapters.
///
/// Models disagree on box layout and usually report a class index rather than
/// a name, so the builder accepts the common layouts and resolves the index
/// against the model's label table.
///
/// ```ignore
/// let names = ["person", "bicycle", "car"];
/// let det = DetectedBoxBuilder::new()
///     .class(2, &names)
///     .center(320.0, 240.0, 100.0, 60.0)
///     .confidence(0.81)
///     .build();
/// assert_eq!(det.label, "car");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DetectedBoxBuilder {
    label: String,
    bbox: Rect,
    confidence: f32,
    text: Option<String>,
}

impl DetectedBoxBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Label taken from `names[class_id]`. Unknown ids leave the label empty,
    /// which the matcher never treats as a class hit.
    pub fn class(mut self, class_id: usize, names: &[&str]) -> Self {
        self.label = names.get(class_id).map(|n| n.to_string()).unwrap_or_default();
        self
    }

    /// Corners `(x1, y1, x2, y2)`.
    pub fn corners(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = Rect::from_tlbr(x1, y1, x2, y2);
        self
    }

    /// Center point plus size, the usual YOLO layout.
    pub fn center(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::new(cx - w * 0.5, cy - h * 0.5, w, h);
        self
    }

    /// Top-left corner plus size.
    pub fn top_left(mut self, left: f32, top: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::new(left, top, w, h);
        self
    }

    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Text the detector already read from the box.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Build the final `DetectedBox`.
    pub fn build(self) -> DetectedBox {
        let detected = DetectedBox::from_rect(self.label, self.bbox, self.confidence);
        match self.text {
            Some(text) => detected.with_text(text),
            None => detected,
        }
    }
}
