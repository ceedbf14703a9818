use std::io::Cursor;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Sender, bounded};
use parking_lot::Mutex;

use spotter::integration::{AnalysisResponder, LogSink, NarratorConfig, StaticDetector};
use spotter::{
    AnalysisHandle, Command, CommandQueue, DetectedBox, DetectedBoxBuilder, Detector, Frame, LoopControl, Mode, ModeController, Narrator,
    OcrEngine, Pipeline, QueuedNarrator, Reply, Result, Services, SpotterConfig, VisionAnalyzer,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Default)]
struct Spoken(Arc<Mutex<Vec<String>>>);

impl Spoken {
    fn all(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

impl Narrator for Spoken {
    fn speak_once(&self, text: &str) {
        self.0.lock().push(text.to_string());
    }
}

struct FixedOcr(&'static str);

impl OcrEngine for FixedOcr {
    fn extract_text(&mut self, _frame: &Frame, _target: &DetectedBox) -> Result<String> {
        Ok(self.0.to_string())
    }
}

fn pipeline(boxes: Vec<DetectedBox>, services: Services) -> (Pipeline<StaticDetector, Spoken>, Spoken) {
    let spoken = Spoken::default();
    let controller = ModeController::new(&SpotterConfig::default(), services);
    let pipeline = Pipeline::new(
        StaticDetector::new(boxes),
        spoken.clone(),
        controller,
        CommandQueue::new(),
    );
    (pipeline, spoken)
}

#[test]
fn test_what_announces_on_fortieth_frame() {
    init_logging();
    let frame = Frame::blank(640, 480);
    let bottle = DetectedBox::new("bottle", 30.0, 190.0, 150.0, 290.0, 0.9);
    let mut controller = ModeController::new(&SpotterConfig::default(), Services::default());

    controller.handle_command(Command::What, &frame);
    for _ in 0..39 {
        assert_eq!(controller.process_frame(&frame, std::slice::from_ref(&bottle)), None);
        assert_eq!(controller.mode(), Mode::What);
    }
    assert_eq!(
        controller
            .process_frame(&frame, std::slice::from_ref(&bottle))
            .as_deref(),
        Some("I see a bottle on your left")
    );
    assert_eq!(controller.mode(), Mode::Idle);
}

#[test]
fn test_read_completes_on_first_frame() {
    init_logging();
    let cereal = DetectedBox::new("cereal", 200.0, 100.0, 400.0, 400.0, 0.8);
    let (mut pipeline, spoken) = pipeline(
        vec![cereal],
        Services::default().with_ocr(FixedOcr("COCA-COLA CLASSIC")),
    );
    let frame = Frame::blank(640, 480);

    pipeline.commands().push(Command::Read);
    pipeline.tick(&frame);

    assert_eq!(pipeline.controller().mode(), Mode::Idle);
    assert_eq!(spoken.all(), vec!["Reading.", "The text reads: COCA-COLA CLASSIC"]);
}

#[test]
fn test_find_announces_once_per_lock() {
    init_logging();
    let milk = DetectedBox::new("bottle", 20.0, 200.0, 120.0, 300.0, 0.8);
    let person = DetectedBox::new("person", 200.0, 0.0, 600.0, 480.0, 0.95);
    let (mut pipeline, spoken) = pipeline(
        vec![person, milk],
        Services::default().with_ocr(|_: &Frame, d: &DetectedBox| -> Result<String> {
            Ok(if d.label == "bottle" { "MILK 2%".into() } else { String::new() })
        }),
    );
    let frame = Frame::blank(640, 480);

    pipeline.commands().push(Command::Find("milk".into()));
    for _ in 0..60 {
        assert_eq!(pipeline.tick(&frame), LoopControl::Continue);
    }

    assert_eq!(
        spoken.all(),
        vec!["Looking for milk.", "Found milk, on your left, keep going."]
    );
    assert!(pipeline.controller().track_state().is_announced());
    assert_eq!(pipeline.controller().mode(), Mode::Find);
}

#[test]
fn test_find_gives_up_after_timeout() {
    init_logging();
    let frame = Frame::blank(640, 480);
    for timeout in [3u32, 12] {
        let mut config = SpotterConfig::default();
        config.find.search_timeout_frames = timeout;
        let mut controller = ModeController::new(&config, Services::default());

        controller.handle_command(Command::Find("milk".into()), &frame);
        let mut said = None;
        let mut frames = 0;
        while controller.mode() == Mode::Find {
            frames += 1;
            said = controller.process_frame(&frame, &[]);
        }
        assert_eq!(frames, timeout);
        assert_eq!(said.as_deref(), Some("I couldn't find milk."));
    }
}

#[test]
fn test_find_replaces_what_session() {
    init_logging();
    let frame = Frame::blank(640, 480);
    let bottle = vec![DetectedBox::new("bottle", 30.0, 190.0, 150.0, 290.0, 0.9)];
    let mut controller = ModeController::new(&SpotterConfig::default(), Services::default());

    controller.handle_command(Command::What, &frame);
    for _ in 0..30 {
        controller.process_frame(&frame, &bottle);
    }
    controller.handle_command(Command::Find("milk".into()), &frame);
    assert_eq!(controller.session().mode, Mode::Find);
    assert_eq!(controller.session().frames, 0);

    // A fresh WHAT has to wait the full 40 frames again.
    controller.handle_command(Command::What, &frame);
    for _ in 0..39 {
        assert_eq!(controller.process_frame(&frame, &bottle), None);
    }
    assert!(controller.process_frame(&frame, &bottle).is_some());
}

#[test]
fn test_unrecognized_input_changes_nothing() {
    assert_eq!(spotter::parse_command("please dance"), None);
    assert_eq!(spotter::parse_command(""), None);
}

/// Answers from a background thread after a delay.
struct SlowAnalyzer {
    delay: Duration,
}

impl VisionAnalyzer for SlowAnalyzer {
    fn is_available(&self) -> bool {
        true
    }

    fn analyze(&mut self, _frame: Frame, _prompt: &str) -> AnalysisHandle {
        let delay = self.delay;
        AnalysisHandle::spawn(move || {
            thread::sleep(delay);
            Ok("Oat milk, one litre, barista edition.".to_string())
        })
    }
}

#[test]
fn test_details_never_blocks_the_loop() {
    init_logging();
    let (mut pipeline, spoken) = pipeline(
        vec![],
        Services::default().with_analyzer(SlowAnalyzer {
            delay: Duration::from_millis(200),
        }),
    );
    let frame = Frame::blank(640, 480);

    pipeline.commands().push(Command::Details);
    let started = Instant::now();
    pipeline.tick(&frame);
    assert!(started.elapsed() < Duration::from_millis(100));
    assert_eq!(pipeline.controller().mode(), Mode::Details);

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut ticks = 1;
    while pipeline.controller().mode() == Mode::Details && Instant::now() < deadline {
        let t = Instant::now();
        pipeline.tick(&frame);
        assert!(t.elapsed() < Duration::from_millis(100));
        ticks += 1;
        thread::sleep(Duration::from_millis(5));
    }

    assert!(ticks > 1);
    assert_eq!(pipeline.controller().mode(), Mode::Idle);
    assert_eq!(
        spoken.all(),
        vec![
            "Analyzing product details. Please wait.",
            "Oat milk, one litre, barista edition."
        ]
    );
}

/// Hands the responder to the test so it decides when the answer lands.
struct ChannelAnalyzer(Sender<AnalysisResponder>);

impl VisionAnalyzer for ChannelAnalyzer {
    fn is_available(&self) -> bool {
        true
    }

    fn analyze(&mut self, _frame: Frame, _prompt: &str) -> AnalysisHandle {
        let (responder, handle) = AnalysisHandle::channel();
        let _ = self.0.send(responder);
        handle
    }
}

#[test]
fn test_details_completes_on_next_poll_after_response() {
    let (tx, rx) = bounded(1);
    let mut controller = ModeController::new(
        &SpotterConfig::default(),
        Services::default().with_analyzer(ChannelAnalyzer(tx)),
    );
    let frame = Frame::blank(640, 480);

    assert!(matches!(controller.handle_command(Command::Details, &frame), Reply::Say(_)));
    for _ in 0..3 {
        assert_eq!(controller.process_frame(&frame, &[]), None);
    }
    rx.recv().unwrap().respond(Ok("Greek yoghurt.".into()));
    assert_eq!(controller.process_frame(&frame, &[]).as_deref(), Some("Greek yoghurt."));
    assert_eq!(controller.mode(), Mode::Idle);
}

#[test]
fn test_stop_abandons_outstanding_details() {
    let (tx, rx) = bounded(1);
    let mut controller = ModeController::new(
        &SpotterConfig::default(),
        Services::default().with_analyzer(ChannelAnalyzer(tx)),
    );
    let frame = Frame::blank(640, 480);

    controller.handle_command(Command::Details, &frame);
    assert_eq!(controller.handle_command(Command::Stop, &frame), Reply::Say("Stopped.".into()));
    rx.recv().unwrap().respond(Ok("too late".into()));
    assert_eq!(controller.process_frame(&frame, &[]), None);
    assert_eq!(controller.mode(), Mode::Idle);
}

#[test]
fn test_listener_and_narrator_end_to_end() {
    init_logging();
    let commands = CommandQueue::new();
    let listener = commands.listen(Cursor::new("what is this\nsing a song\n"));
    listener.join().unwrap();

    let narrator = QueuedNarrator::spawn(LogSink, NarratorConfig::default());
    let controller = ModeController::new(&SpotterConfig::default(), Services::default());
    let mut pipeline = Pipeline::new(StaticDetector::default(), narrator, controller, commands);
    let frame = Frame::blank(320, 240);

    assert_eq!(pipeline.tick(&frame), LoopControl::Continue);
    assert_eq!(pipeline.controller().mode(), Mode::What);
    // End of input queued a quit behind the recognised command.
    assert_eq!(pipeline.tick(&frame), LoopControl::Quit);
}

/// Mimics a YOLO head: class ids and center-size boxes.
struct RawDetector {
    outputs: Vec<(usize, [f32; 4], f32)>,
}

const COCO_SUBSET: [&str; 4] = ["person", "bottle", "cup", "cell phone"];

impl Detector for RawDetector {
    type Error = String;

    fn detect(&mut self, _frame: &Frame) -> std::result::Result<Vec<DetectedBox>, Self::Error> {
        Ok(self
            .outputs
            .iter()
            .map(|&(class_id, [cx, cy, w, h], score)| {
                DetectedBoxBuilder::new()
                    .class(class_id, &COCO_SUBSET)
                    .center(cx, cy, w, h)
                    .confidence(score)
                    .build()
            })
            .collect())
    }
}

#[test]
fn test_what_through_raw_detector_skips_person() {
    init_logging();
    let spoken = Spoken::default();
    let mut config = SpotterConfig::default();
    config.what.wait_frames = 1;
    let detector = RawDetector {
        outputs: vec![
            (0, [320.0, 240.0, 400.0, 460.0], 0.97),
            (3, [540.0, 60.0, 60.0, 100.0], 0.7),
        ],
    };
    let mut pipeline = Pipeline::new(
        detector,
        spoken.clone(),
        ModeController::new(&config, Services::default()),
        CommandQueue::new(),
    );

    pipeline.commands().push(Command::What);
    pipeline.tick(&Frame::blank(640, 480));

    assert_eq!(
        spoken.all(),
        vec!["Analyzing object. Please hold still.", "I see a cell phone on your top-right"]
    );
}
