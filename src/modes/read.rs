//! READ: read aloud the text on the main object, right away.

use crate::modes::handler::{FrameContext, ModeHandler, ModeOutcome};
use crate::tracker::largest_excluding;

/// READ handler.
pub struct ReadMode {
    exclude: Vec<String>,
}

impl ReadMode {
    /// Create the handler. Boxes of `exclude` classes are never read.
    pub fn new(exclude: Vec<String>) -> Self {
        Self { exclude }
    }

    /// Begin a read. Returns the acknowledgement to speak.
    pub fn start(&mut self) -> String {
        self.reset_state();
        "Reading.".to_string()
    }
}

impl ModeHandler for ReadMode {
    fn process(&mut self, cx: &mut FrameContext<'_>) -> ModeOutcome {
        let Some(target) = largest_excluding(cx.detections, &self.exclude) else {
            return ModeOutcome::done("Nothing detected.");
        };

        let text = match &target.text {
            Some(text) => Ok(text.trim().to_string()),
            None => cx
                .ocr
                .extract_text(cx.frame, target)
                .map(|t| t.trim().to_string()),
        };

        match text {
            Ok(text) if !text.is_empty() => ModeOutcome::done(format!("The text reads: {}", text)),
            Ok(_) => match target.label.trim() {
                "" => ModeOutcome::done("No text found."),
                label => ModeOutcome::done(format!("No text found on the {}.", label)),
            },
            Err(e) => {
                log::warn!("read failed: {}", e);
                ModeOutcome::done("I couldn't read the text. Please try again.")
            }
        }
    }

    /// Nothing carries over between frames.
    fn reset_state(&mut self) {}
}
