//! Text extraction collaborator.

use crate::Result;
use crate::frame::Frame;
use crate::tracker::DetectedBox;

/// Reads text from the region of a frame under one box.
///
/// Implementations are slow (hundreds of milliseconds), so callers only ask
/// for the few boxes they are actually considering.
pub trait OcrEngine {
    /// Extract the text under `target`. An empty string means no text.
    fn extract_text(&mut self, frame: &Frame, target: &DetectedBox) -> Result<String>;
}

impl<F> OcrEngine for F
where
    F: FnMut(&Frame, &DetectedBox) -> Result<String>,
{
    fn extract_text(&mut self, frame: &Frame, target: &DetectedBox) -> Result<String> {
        self(frame, target)
    }
}

/// Text for `target`, preferring text the detector already attached.
///
/// OCR failures are logged and read as "no text".
pub fn text_for(ocr: &mut dyn OcrEngine, frame: &Frame, target: &DetectedBox) -> String {
    if let Some(text) = &target.text {
        return text.trim().to_string();
    }
    match ocr.extract_text(frame, target) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            log::warn!("ocr on '{}' box failed: {}", target.label, e);
            String::new()
        }
    }
}

/// OCR engine that never finds text. Used when no OCR backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOcr;

impl OcrEngine for NoOcr {
    fn extract_text(&mut self, _frame: &Frame, _target: &DetectedBox) -> Result<String> {
        Ok(String::new())
    }
}
