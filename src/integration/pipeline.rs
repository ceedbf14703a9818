//! Pipeline combining detection, commands and the mode controller.

use crate::frame::Frame;
use crate::modes::{ModeController, Reply};
use crate::tracker::DetectedBox;

use super::{CommandQueue, Detector, Narrator};

/// Whether the frame loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// One iteration of the frame loop per call to [`Pipeline::tick`].
///
/// Single-threaded: the only cross-thread traffic is the command queue
/// (filled by a listener) and the narrator (drained by its speech thread).
pub struct Pipeline<D: Detector, N: Narrator> {
    detector: D,
    narrator: N,
    controller: ModeController,
    commands: CommandQueue,
    detections: Vec<DetectedBox>,
}

impl<D: Detector, N: Narrator> Pipeline<D, N> {
    /// Assemble a pipeline from its parts.
    pub fn new(detector: D, narrator: N, controller: ModeController, commands: CommandQueue) -> Self {
        Self {
            detector,
            narrator,
            controller,
            commands,
            detections: Vec::new(),
        }
    }

    /// Process a single frame.
    ///
    /// Applies at most one queued command, runs detection, then gives the
    /// active mode exactly one look at the result. Detector errors count as
    /// a frame with no detections.
    pub fn tick(&mut self, frame: &Frame) -> LoopControl {
        if let Some(command) = self.commands.try_next() {
            log::debug!("applying command '{}' in {} mode", command, self.controller.mode());
            match self.controller.handle_command(command, frame) {
                Reply::Quit => return LoopControl::Quit,
                Reply::Say(text) => {
                    self.narrator.reset_throttle();
                    self.narrator.speak_once(&text);
                }
                Reply::Silent => {}
            }
        }

        self.detections = match self.detector.detect(frame) {
            Ok(detections) => detections,
            Err(e) => {
                log::warn!("detection failed: {}", e);
                Vec::new()
            }
        };

        if let Some(text) = self.controller.process_frame(frame, &self.detections) {
            self.narrator.speak_once(&text);
        }
        LoopControl::Continue
    }

    /// Detections from the latest tick, for drawing.
    pub fn detections(&self) -> &[DetectedBox] {
        &self.detections
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the narrator.
    pub fn narrator(&self) -> &N {
        &self.narrator
    }

    /// Get a reference to the mode controller, e.g. to draw the tracked box.
    pub fn controller(&self) -> &ModeController {
        &self.controller
    }

    /// Get the command queue, for pushing commands or handing out senders.
    pub fn commands(&self) -> &CommandQueue {
        &self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpotterConfig;
    use crate::integration::Command;
    use crate::modes::{Mode, Services};
    use parking_lot::Mutex;

    struct FlakyDetector {
        calls: u32,
    }

    impl Detector for FlakyDetector {
        type Error = String;

        fn detect(&mut self, _frame: &Frame) -> Result<Vec<DetectedBox>, Self::Error> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                Err("inference timeout".to_string())
            } else {
                Ok(vec![DetectedBox::new("cup", 300.0, 200.0, 340.0, 260.0, 0.8)])
            }
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Narrator for Recorder {
        fn speak_once(&self, text: &str) {
            self.0.lock().push(text.to_string());
        }
    }

    #[test]
    fn test_tick_survives_detector_errors() {
        let commands = CommandQueue::new();
        let controller = ModeController::new(&SpotterConfig::default(), Services::default());
        let mut pipeline = Pipeline::new(FlakyDetector { calls: 0 }, Recorder::default(), controller, commands);
        let frame = Frame::blank(640, 480);

        pipeline.commands().push(Command::Find("cup".into()));
        assert_eq!(pipeline.tick(&frame), LoopControl::Continue);
        assert_eq!(pipeline.detections().len(), 1);
        assert_eq!(pipeline.tick(&frame), LoopControl::Continue);
        assert!(pipeline.detections().is_empty());
        assert_eq!(pipeline.controller().mode(), Mode::Find);
        assert!(pipeline.controller().track_state().is_locked());

        let spoken = pipeline.narrator().0.lock().clone();
        assert_eq!(spoken, vec!["Looking for cup.", "Found cup, ahead, keep going."]);
    }

    #[test]
    fn test_one_command_per_tick() {
        let commands = CommandQueue::new();
        commands.push(Command::What);
        commands.push(Command::Quit);
        let controller = ModeController::new(&SpotterConfig::default(), Services::default());
        let mut pipeline = Pipeline::new(FlakyDetector { calls: 0 }, Recorder::default(), controller, commands);
        let frame = Frame::blank(640, 480);

        assert_eq!(pipeline.tick(&frame), LoopControl::Continue);
        assert_eq!(pipeline.controller().mode(), Mode::What);
        assert_eq!(pipeline.tick(&frame), LoopControl::Quit);
    }
}
