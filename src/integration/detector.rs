//! Trait for object detection backends.

use crate::frame::Frame;
use crate::tracker::DetectedBox;

/// Trait for object detection backends.
///
/// Implement this trait to feed any detection model into the frame loop.
///
/// # Example
///
/// ```ignore
/// use spotter::{DetectedBox, Detector, Frame};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl Detector for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectedBox>, Self::Error> {
///         // Run inference and return labelled boxes
///         Ok(vec![])
///     }
/// }
/// ```
pub trait Detector {
    /// Error type for detection failures.
    type Error: std::fmt::Display;

    /// Run inference on a frame and return labelled boxes.
    ///
    /// Must return within the frame budget. The loop treats an error as a
    /// frame with no detections.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectedBox>, Self::Error>;
}

/// Detector that replays a fixed set of boxes every frame.
#[derive(Debug, Clone, Default)]
pub struct StaticDetector {
    boxes: Vec<DetectedBox>,
}

impl StaticDetector {
    /// Replay `boxes` on every frame.
    pub fn new(boxes: Vec<DetectedBox>) -> Self {
        Self { boxes }
    }

    /// Replace the boxes returned from the next frame on.
    pub fn set(&mut self, boxes: Vec<DetectedBox>) {
        self.boxes = boxes;
    }
}

impl Detector for StaticDetector {
    type Error = std::convert::Infallible;

    fn detect(&mut self, _frame: &Frame) -> Result<Vec<DetectedBox>, Self::Error> {
        Ok(self.boxes.clone())
    }
}
