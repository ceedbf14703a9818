//! FIND: search for a named object, lock onto it and keep following it.

use serde::Deserialize;

use crate::direction::{DirectionEngine, Guidance};
use crate::modes::handler::{FrameContext, ModeHandler, ModeOutcome};
use crate::tracker::{DetectedBox, IouTracker, Matcher, TrackState, TrackUpdate, normalize};

/// Configuration for FIND.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FindConfig {
    /// Frames without a match before giving up. 0 searches forever.
    pub search_timeout_frames: u32,
    /// Speak again whenever the guidance level changes while locked.
    pub guidance_updates: bool,
}

impl Default for FindConfig {
    fn default() -> Self {
        Self {
            search_timeout_frames: 300,
            guidance_updates: false,
        }
    }
}

/// FIND handler: matcher plus tracker plus direction guidance.
pub struct FindMode {
    config: FindConfig,
    matcher: Matcher,
    tracker: IouTracker,
    engine: DirectionEngine,
    exclude: Vec<String>,
    state: TrackState,
    search_frames: u32,
    last_guidance: Option<Guidance>,
}

impl FindMode {
    /// Create the handler. Classes in `exclude` are never locked unless asked for by name.
    pub fn new(
        config: FindConfig,
        matcher: Matcher,
        tracker: IouTracker,
        engine: DirectionEngine,
        exclude: Vec<String>,
    ) -> Self {
        Self {
            config,
            matcher,
            tracker,
            engine,
            exclude,
            state: TrackState::default(),
            search_frames: 0,
            last_guidance: None,
        }
    }

    /// Begin searching for `query`. Returns the acknowledgement to speak.
    pub fn start(&mut self, query: &str) -> String {
        let query = query.trim();
        self.reset_state();
        self.state = TrackState::new(query);
        format!("Looking for {}.", query)
    }

    /// Current tracking state.
    pub fn state(&self) -> &TrackState {
        &self.state
    }

    /// Boxes the search may lock onto. Excluded classes only take part when
    /// the query names one of them.
    fn candidates(&self, detections: &[DetectedBox]) -> Vec<DetectedBox> {
        let query = normalize(self.state.query());
        let asks_for_excluded = self.exclude.iter().any(|c| normalize(c) == query);
        detections
            .iter()
            .filter(|d| asks_for_excluded || !d.is_class_in(&self.exclude))
            .cloned()
            .collect()
    }

    fn guidance_for(&self, cx: &mut FrameContext<'_>, target: &DetectedBox) -> Guidance {
        let depth = cx.depth.estimate_depth(cx.frame, &target.bbox);
        self.engine
            .guidance(&target.bbox, cx.frame.width(), cx.frame.height(), depth)
    }

    fn search(&mut self, cx: &mut FrameContext<'_>) -> ModeOutcome {
        let found = if cx.detections.is_empty() {
            None
        } else {
            let candidates = self.candidates(cx.detections);
            self.matcher
                .find(self.state.query(), &candidates, cx.frame, &mut *cx.ocr)
                .map(|m| (m.detection.clone(), m.stage))
        };

        let Some((target, stage)) = found else {
            return self.search_missed();
        };

        log::info!(
            "locked onto '{}' for '{}' via {:?} match",
            target.label,
            self.state.query(),
            stage
        );
        self.state.lock(target);
        self.search_frames = 0;
        self.last_guidance = None;
        ModeOutcome::pending()
    }

    /// Speak "Found ..." for a lock that has not been announced yet.
    fn announce(&mut self, cx: &mut FrameContext<'_>) -> ModeOutcome {
        let Some(target) = self.state.target().cloned() else {
            return ModeOutcome::pending();
        };
        let guidance = self.guidance_for(cx, &target);
        self.state.mark_announced();
        self.last_guidance = Some(guidance);
        ModeOutcome::say(format!("Found {}, {}.", self.state.query(), guidance))
    }

    fn search_missed(&mut self) -> ModeOutcome {
        self.search_frames += 1;
        let limit = self.config.search_timeout_frames;
        if limit > 0 && self.search_frames >= limit {
            log::info!(
                "no match for '{}' after {} frames",
                self.state.query(),
                self.search_frames
            );
            return ModeOutcome::done(format!("I couldn't find {}.", self.state.query()));
        }
        ModeOutcome::pending()
    }

    fn follow(&mut self, cx: &mut FrameContext<'_>) -> ModeOutcome {
        match self.tracker.update(&mut self.state, cx.detections) {
            TrackUpdate::Lost => {
                log::info!("lost '{}', searching again", self.state.query());
                self.search_frames = 0;
                self.last_guidance = None;
                ModeOutcome::say(format!("Lost {}. Searching again.", self.state.query()))
            }
            TrackUpdate::Matched { .. } | TrackUpdate::Missed { .. } if self.config.guidance_updates => {
                let Some(target) = self.state.target().cloned() else {
                    return ModeOutcome::pending();
                };
                let guidance = self.guidance_for(cx, &target);
                if self.last_guidance == Some(guidance) {
                    return ModeOutcome::pending();
                }
                self.last_guidance = Some(guidance);
                ModeOutcome::say(guidance.to_string())
            }
            _ => ModeOutcome::pending(),
        }
    }
}

impl ModeHandler for FindMode {
    /// Never completes on its own except when the search times out.
    fn process(&mut self, cx: &mut FrameContext<'_>) -> ModeOutcome {
        let outcome = if self.state.is_locked() {
            self.follow(cx)
        } else {
            self.search(cx)
        };
        if self.state.is_locked() && !self.state.is_announced() {
            return self.announce(cx);
        }
        outcome
    }

    fn reset_state(&mut self) {
        self.state.reset();
        self.search_frames = 0;
        self.last_guidance = None;
    }
}
