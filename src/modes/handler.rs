use crate::frame::Frame;
use crate::integration::{DepthSource, NoOcr, OcrEngine, UnavailableAnalyzer, VisionAnalyzer};
use crate::tracker::DetectedBox;

/// What a handler reports after one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeOutcome {
    /// The mode is finished and the controller should go idle.
    pub complete: bool,
    /// Text to hand to the narrator, if any.
    pub utterance: Option<String>,
}

impl ModeOutcome {
    /// Still working, nothing to say.
    pub fn pending() -> Self {
        Self::default()
    }

    /// Still working, but say something.
    pub fn say(text: impl Into<String>) -> Self {
        Self {
            complete: false,
            utterance: Some(text.into()),
        }
    }

    /// Finished with a final utterance.
    pub fn done(text: impl Into<String>) -> Self {
        Self {
            complete: true,
            utterance: Some(text.into()),
        }
    }
}

/// Everything a handler may look at or call while processing one frame.
pub struct FrameContext<'a> {
    pub frame: &'a Frame,
    pub detections: &'a [DetectedBox],
    pub ocr: &'a mut dyn OcrEngine,
    pub depth: &'a mut dyn DepthSource,
}

/// Shared contract of the four busy modes.
///
/// Each mode also has an inherent `start` taking whatever that mode needs.
pub trait ModeHandler {
    /// Handle one frame. Must not block on slow collaborators.
    fn process(&mut self, cx: &mut FrameContext<'_>) -> ModeOutcome;

    /// Clear all session fields. Calling it repeatedly is harmless.
    fn reset_state(&mut self);
}

/// Collaborators the controller lends to handlers.
pub struct Services {
    /// Text reader used by FIND stage 2, READ and WHAT's text description.
    pub ocr: Box<dyn OcrEngine>,
    /// Depth model for FIND guidance. `None` estimates depth from box area
    /// using the `[depth]` bands of the controller's config.
    pub depth: Option<Box<dyn DepthSource>>,
    /// Scene analysis backend for DETAILS.
    pub analyzer: Box<dyn VisionAnalyzer>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            ocr: Box::new(NoOcr),
            depth: None,
            analyzer: Box::new(UnavailableAnalyzer),
        }
    }
}

impl Services {
    /// Replace the OCR engine.
    pub fn with_ocr(mut self, ocr: impl OcrEngine + 'static) -> Self {
        self.ocr = Box::new(ocr);
        self
    }

    /// Use a depth model instead of the area-based estimate.
    pub fn with_depth(mut self, depth: impl DepthSource + 'static) -> Self {
        self.depth = Some(Box::new(depth));
        self
    }

    /// Replace the scene analysis backend.
    pub fn with_analyzer(mut self, analyzer: impl VisionAnalyzer + 'static) -> Self {
        self.analyzer = Box::new(analyzer);
        self
    }
}
