//! DETAILS: ask the vision-analysis service about the current frame.

use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::frame::Frame;
use crate::integration::{AnalysisHandle, AnalysisState, VisionAnalyzer};
use crate::modes::handler::{FrameContext, ModeHandler, ModeOutcome};
use crate::{Error, Result};

const DEFAULT_PROMPT: &str = "What is the main product in this image? List visible text. \
Give a brief description about the product, brand, ingredients if food, \
and any other useful information in 2-3 lines.";

const FAILED: &str = "Analysis failed. Please try again.";

/// Configuration for DETAILS.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetailsConfig {
    /// Give up on a response after this many seconds.
    pub timeout_secs: u64,
    pub prompt: String,
}

impl Default for DetailsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

struct PendingAnalysis {
    handle: AnalysisHandle,
    started: Instant,
}

/// DETAILS handler. Holds at most one outstanding request.
pub struct DetailsMode {
    config: DetailsConfig,
    pending: Option<PendingAnalysis>,
}

impl DetailsMode {
    /// Create the handler.
    pub fn new(config: DetailsConfig) -> Self {
        Self {
            config,
            pending: None,
        }
    }

    /// Capture `frame` and send it off for analysis.
    ///
    /// Returns immediately. Fails with [`Error::Unavailable`] when the
    /// analyzer cannot be used, in which case nothing is started.
    pub fn start(&mut self, frame: &Frame, analyzer: &mut dyn VisionAnalyzer) -> Result<String> {
        self.reset_state();
        if !analyzer.is_available() {
            return Err(Error::Unavailable("vision analysis"));
        }
        let handle = analyzer.analyze(frame.clone(), &self.config.prompt);
        self.pending = Some(PendingAnalysis {
            handle,
            started: Instant::now(),
        });
        Ok("Analyzing product details. Please wait.".to_string())
    }

    /// Whether a request is outstanding.
    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }
}

impl ModeHandler for DetailsMode {
    /// Cheap poll of the outstanding request; never waits for it.
    fn process(&mut self, _cx: &mut FrameContext<'_>) -> ModeOutcome {
        let timeout = self.timeout();
        let Some(pending) = self.pending.as_mut() else {
            return ModeOutcome::done(FAILED);
        };

        let outcome = match pending.handle.poll() {
            AnalysisState::Pending if pending.started.elapsed() < timeout => {
                return ModeOutcome::pending();
            }
            AnalysisState::Pending => {
                log::warn!("{}", Error::AnalysisTimeout(timeout));
                ModeOutcome::done(FAILED)
            }
            AnalysisState::Ready(text) if text.trim().is_empty() => {
                ModeOutcome::done("No information available.")
            }
            AnalysisState::Ready(text) => ModeOutcome::done(text.trim()),
            AnalysisState::Failed(reason) => {
                log::warn!("analysis failed: {}", reason);
                ModeOutcome::done(FAILED)
            }
        };
        self.reset_state();
        outcome
    }

    /// Abandons any outstanding request; its late answer is discarded.
    fn reset_state(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::{AnalysisResponder, AreaDepth, NoOcr, UnavailableAnalyzer};

    #[derive(Default)]
    struct ManualAnalyzer {
        responder: Option<AnalysisResponder>,
        prompts: Vec<String>,
    }

    impl VisionAnalyzer for ManualAnalyzer {
        fn is_available(&self) -> bool {
            true
        }

        fn analyze(&mut self, _frame: Frame, prompt: &str) -> AnalysisHandle {
            let (responder, handle) = AnalysisHandle::channel();
            self.responder = Some(responder);
            self.prompts.push(prompt.to_string());
            handle
        }
    }

    fn run(mode: &mut DetailsMode) -> ModeOutcome {
        let frame = Frame::blank(64, 48);
        let mut ocr = NoOcr;
        let mut depth = AreaDepth::default();
        let mut cx = FrameContext {
            frame: &frame,
            detections: &[],
            ocr: &mut ocr,
            depth: &mut depth,
        };
        mode.process(&mut cx)
    }

    #[test]
    fn test_unavailable_start_fails() {
        let mut mode = DetailsMode::new(DetailsConfig::default());
        let err = mode.start(&Frame::blank(4, 4), &mut UnavailableAnalyzer).unwrap_err();
        assert!(matches!(err, Error::Unavailable(_)));
        assert!(!mode.is_waiting());
    }

    #[test]
    fn test_polls_until_ready() {
        let mut analyzer = ManualAnalyzer::default();
        let mut mode = DetailsMode::new(DetailsConfig::default());
        mode.start(&Frame::blank(4, 4), &mut analyzer).unwrap();
        assert_eq!(analyzer.prompts, vec![DEFAULT_PROMPT.to_string()]);

        for _ in 0..5 {
            let started = Instant::now();
            assert_eq!(run(&mut mode), ModeOutcome::pending());
            assert!(started.elapsed() < Duration::from_millis(50));
        }

        analyzer
            .responder
            .take()
            .unwrap()
            .respond(Ok("Organic whole milk by Acme.".into()));
        assert_eq!(run(&mut mode), ModeOutcome::done("Organic whole milk by Acme."));
        assert!(!mode.is_waiting());
    }

    #[test]
    fn test_failure_is_generic() {
        let mut analyzer = ManualAnalyzer::default();
        let mut mode = DetailsMode::new(DetailsConfig::default());
        mode.start(&Frame::blank(4, 4), &mut analyzer).unwrap();
        analyzer
            .responder
            .take()
            .unwrap()
            .respond(Err(Error::Analysis("quota exceeded".into())));
        assert_eq!(run(&mut mode), ModeOutcome::done(FAILED));
    }

    #[test]
    fn test_times_out() {
        let mut analyzer = ManualAnalyzer::default();
        let mut mode = DetailsMode::new(DetailsConfig {
            timeout_secs: 0,
            ..DetailsConfig::default()
        });
        mode.start(&Frame::blank(4, 4), &mut analyzer).unwrap();
        assert_eq!(run(&mut mode), ModeOutcome::done(FAILED));
    }

    #[test]
    fn test_reset_abandons_request() {
        let mut analyzer = ManualAnalyzer::default();
        let mut mode = DetailsMode::new(DetailsConfig::default());
        mode.start(&Frame::blank(4, 4), &mut analyzer).unwrap();
        mode.reset_state();
        mode.reset_state();
        assert!(!mode.is_waiting());
        // Late answers go nowhere.
        analyzer.responder.take().unwrap().respond(Ok("late".into()));
    }
}
