//! Real-time decision core for a voice-driven object finder.
//!
//! Each camera frame's detections, plus the latest spoken command, are turned
//! into tracked state and short spoken replies:
//!
//! - [`tracker`]: query matching against class labels and OCR text, and a
//!   single-target IoU tracker.
//! - [`direction`]: 3x3 position zones and near/mid/far guidance phrases.
//! - [`modes`]: the FIND / WHAT / READ / DETAILS handlers and the
//!   [`ModeController`] state machine.
//! - [`integration`]: traits for the external detector, OCR, depth, vision
//!   analysis, narrator and command source, and the per-frame [`Pipeline`].

pub mod config;
pub mod direction;
mod error;
pub mod frame;
pub mod integration;
pub mod modes;
pub mod tracker;

pub use config::SpotterConfig;
pub use direction::{DepthEstimate, DirectionEngine, Guidance, PositionZone};
pub use error::{Error, Result};
pub use frame::Frame;
pub use integration::{
    AnalysisHandle, AnalysisState, Command, CommandQueue, DetectedBoxBuilder, DepthSource, Detector,
    LoopControl, Narrator, OcrEngine, Pipeline, QueuedNarrator, VisionAnalyzer, parse_command,
};
pub use modes::{Mode, ModeController, ModeHandler, ModeOutcome, ModeSession, Reply, Services};
pub use tracker::{DetectedBox, IouTracker, Matcher, Rect, TrackState, TrackerConfig};
