//! Collaborator interfaces and the frame loop that ties them together.
//!
//! Detection, OCR, depth, scene analysis, speech and command recognition all
//! live outside this crate. This module defines the traits they plug into,
//! a few simple implementations, and [`Pipeline`], which runs one loop
//! iteration per captured frame.

mod analysis;
mod builder;
mod command;
mod depth;
mod detector;
mod narrator;
mod ocr;
mod pipeline;

pub use analysis::{AnalysisHandle, AnalysisResponder, AnalysisState, UnavailableAnalyzer, VisionAnalyzer};
pub use builder::DetectedBoxBuilder;
pub use command::{Command, CommandQueue, parse_command};
pub use depth::{AreaDepth, DepthSource, NormalizedDepth};
pub use detector::{Detector, StaticDetector};
pub use narrator::{LogSink, Narrator, NarratorConfig, QueuedNarrator, SpeechSink};
pub use ocr::{NoOcr, OcrEngine, text_for};
pub use pipeline::{LoopControl, Pipeline};
