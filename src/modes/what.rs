//! WHAT: after a short settling delay, name the main object and where it is.

use serde::Deserialize;

use crate::direction::{DirectionEngine, Horizontal, PositionZone, Vertical};
use crate::integration::text_for;
use crate::modes::handler::{FrameContext, ModeHandler, ModeOutcome};
use crate::tracker::largest_excluding;

/// Configuration for WHAT.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WhatConfig {
    /// Frames to wait so the user can hold the camera still (~1.3s at 30 fps).
    pub wait_frames: u32,
    /// Also read any text on the object and append it.
    pub describe_text: bool,
}

impl Default for WhatConfig {
    fn default() -> Self {
        Self {
            wait_frames: 40,
            describe_text: false,
        }
    }
}

/// WHAT handler.
pub struct WhatMode {
    config: WhatConfig,
    engine: DirectionEngine,
    exclude: Vec<String>,
    waited: u32,
}

fn article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

fn place(zone: PositionZone) -> String {
    match (zone.vertical, zone.horizontal) {
        (Vertical::Middle, Horizontal::Center) => "in the center".to_string(),
        _ => format!("on your {}", zone),
    }
}

impl WhatMode {
    /// Create the handler. Boxes of `exclude` classes are never described.
    pub fn new(config: WhatConfig, engine: DirectionEngine, exclude: Vec<String>) -> Self {
        Self {
            config,
            engine,
            exclude,
            waited: 0,
        }
    }

    /// Begin a new description. Returns the acknowledgement to speak.
    pub fn start(&mut self) -> String {
        self.reset_state();
        "Analyzing object. Please hold still.".to_string()
    }

    /// Frames seen since `start`.
    pub fn frames_waited(&self) -> u32 {
        self.waited
    }
}

impl ModeHandler for WhatMode {
    fn process(&mut self, cx: &mut FrameContext<'_>) -> ModeOutcome {
        self.waited += 1;
        if self.waited < self.config.wait_frames {
            return ModeOutcome::pending();
        }

        let Some(target) = largest_excluding(cx.detections, &self.exclude) else {
            return ModeOutcome::done("Nothing detected.");
        };

        let label = match target.label.trim() {
            "" => "object",
            label => label,
        };
        let zone = self.engine.zone(&target.bbox, cx.frame.width(), cx.frame.height());
        let mut announcement = format!("I see {} {} {}", article(label), label, place(zone));

        if self.config.describe_text {
            let text = text_for(&mut *cx.ocr, cx.frame, target);
            if !text.is_empty() {
                announcement.push_str(&format!(". It says: {}", text));
            }
        }
        log::debug!("what: {}", announcement);
        ModeOutcome::done(announcement)
    }

    fn reset_state(&mut self) {
        self.waited = 0;
    }
}
