//! The mode state machine.

use std::fmt;

use crate::config::SpotterConfig;
use crate::direction::DirectionEngine;
use crate::frame::Frame;
use crate::integration::{AreaDepth, Command, DepthSource};
use crate::modes::details::DetailsMode;
use crate::modes::find::FindMode;
use crate::modes::handler::{FrameContext, ModeHandler, ModeOutcome, Services};
use crate::modes::read::ReadMode;
use crate::modes::what::WhatMode;
use crate::tracker::{DetectedBox, IouTracker, Matcher, TrackState};

const DETAILS_UNAVAILABLE: &str =
    "Detailed analysis is not available. Please configure the vision service.";

/// Which handler, if any, owns incoming frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    Find,
    What,
    Read,
    Details,
}

impl Mode {
    /// True for every mode except `Idle`.
    pub fn is_busy(self) -> bool {
        self != Self::Idle
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Find => "find",
            Self::What => "what",
            Self::Read => "read",
            Self::Details => "details",
        })
    }
}

/// Which mode is running and for how many frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeSession {
    pub mode: Mode,
    pub frames: u32,
}

/// Controller reaction to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Nothing to say.
    Silent,
    /// Speak this acknowledgement or explanation.
    Say(String),
    /// Leave the frame loop.
    Quit,
}

/// Owns the session and the four handlers, and routes commands and frames.
pub struct ModeController {
    session: ModeSession,
    find: FindMode,
    what: WhatMode,
    read: ReadMode,
    details: DetailsMode,
    services: Services,
    depth: Box<dyn DepthSource>,
}

impl ModeController {
    /// Build the handlers from `config`. Without a depth model in `services`,
    /// FIND guidance estimates depth from box area using `config.depth`.
    pub fn new(config: &SpotterConfig, mut services: Services) -> Self {
        let depth: Box<dyn DepthSource> = match services.depth.take() {
            Some(depth) => depth,
            None => Box::new(AreaDepth::new(config.depth.clone())),
        };
        let engine = DirectionEngine::new(config.mirror_horizontal);
        let exclude = config.exclude_classes.clone();
        Self {
            session: ModeSession::default(),
            find: FindMode::new(
                config.find.clone(),
                Matcher::new(config.matcher.clone()),
                IouTracker::new(config.tracker.clone()),
                engine,
                exclude.clone(),
            ),
            what: WhatMode::new(config.what.clone(), engine, exclude.clone()),
            read: ReadMode::new(exclude),
            details: DetailsMode::new(config.details.clone()),
            services,
            depth,
        }
    }

    /// Current mode and frames spent in it.
    pub fn session(&self) -> ModeSession {
        self.session
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.session.mode
    }

    /// Tracking state of the find session, for overlays.
    pub fn track_state(&self) -> &TrackState {
        self.find.state()
    }

    fn handler_mut(&mut self, mode: Mode) -> Option<&mut dyn ModeHandler> {
        match mode {
            Mode::Idle => None,
            Mode::Find => Some(&mut self.find),
            Mode::What => Some(&mut self.what),
            Mode::Read => Some(&mut self.read),
            Mode::Details => Some(&mut self.details),
        }
    }

    /// Reset whatever is running and go idle.
    fn leave(&mut self) {
        let current = self.session.mode;
        if let Some(handler) = self.handler_mut(current) {
            handler.reset_state();
            log::info!("left {} mode after {} frames", current, self.session.frames);
        }
        self.session = ModeSession::default();
    }

    /// Reset the target handler and make it the active mode.
    fn enter(&mut self, mode: Mode) {
        self.leave();
        if let Some(handler) = self.handler_mut(mode) {
            handler.reset_state();
        }
        self.session = ModeSession { mode, frames: 0 };
        log::info!("entered {} mode", mode);
    }

    /// Apply a command. `frame` is the most recent frame, captured by DETAILS.
    pub fn handle_command(&mut self, command: Command, frame: &Frame) -> Reply {
        match command {
            Command::Quit => Reply::Quit,
            Command::Stop => {
                if !self.session.mode.is_busy() {
                    return Reply::Silent;
                }
                self.leave();
                Reply::Say("Stopped.".to_string())
            }
            Command::Find(query) => {
                self.enter(Mode::Find);
                Reply::Say(self.find.start(&query))
            }
            Command::What => {
                self.enter(Mode::What);
                Reply::Say(self.what.start())
            }
            Command::Read => {
                self.enter(Mode::Read);
                Reply::Say(self.read.start())
            }
            Command::Details => {
                self.enter(Mode::Details);
                match self.details.start(frame, &mut *self.services.analyzer) {
                    Ok(ack) => Reply::Say(ack),
                    Err(e) => {
                        log::warn!("details unavailable: {}", e);
                        self.leave();
                        Reply::Say(DETAILS_UNAVAILABLE.to_string())
                    }
                }
            }
        }
    }

    /// Run the active handler once on this frame's detections.
    ///
    /// Returns the utterance to narrate, if any. A completing handler is
    /// reset and the controller goes idle.
    pub fn process_frame(&mut self, frame: &Frame, detections: &[DetectedBox]) -> Option<String> {
        let mode = self.session.mode;
        if !mode.is_busy() {
            return None;
        }
        self.session.frames += 1;

        let mut cx = FrameContext {
            frame,
            detections,
            ocr: &mut *self.services.ocr,
            depth: &mut *self.depth,
        };
        let outcome: ModeOutcome = match mode {
            Mode::Idle => return None,
            Mode::Find => self.find.process(&mut cx),
            Mode::What => self.what.process(&mut cx),
            Mode::Read => self.read.process(&mut cx),
            Mode::Details => self.details.process(&mut cx),
        };

        if outcome.complete {
            log::debug!("{} mode complete", mode);
            self.leave();
        }
        outcome.utterance
    }
}
