//! Narration: the non-blocking speech queue between handlers and TTS.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Sender, TrySendError, bounded};
use parking_lot::Mutex;
use serde::Deserialize;

use crate::Result;

/// Receives utterances from the decision core. Calls never block.
pub trait Narrator {
    /// Queue `text` to be spoken once.
    fn speak_once(&self, text: &str);

    /// Forget throttling history, e.g. when a new mode starts.
    fn reset_throttle(&self) {}
}

/// Synthesises and plays one utterance, blocking until it has been spoken.
pub trait SpeechSink: Send + 'static {
    fn say(&mut self, text: &str) -> Result<()>;
}

/// Sink that writes utterances to the log instead of a speaker.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl SpeechSink for LogSink {
    fn say(&mut self, text: &str) -> Result<()> {
        log::info!("say: {}", text);
        Ok(())
    }
}

/// Configuration for the QueuedNarrator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NarratorConfig {
    /// Utterances waiting behind the one being spoken. Extra ones are dropped.
    pub queue_capacity: usize,
    /// Window in which [`QueuedNarrator::speak`] skips a repeat of the same text.
    pub throttle_ms: u64,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 8,
            throttle_ms: 1000,
        }
    }
}

/// Narrator backed by a bounded queue and a single speaking thread, so at
/// most one utterance is in flight.
pub struct QueuedNarrator {
    sender: Option<Sender<String>>,
    worker: Option<JoinHandle<()>>,
    throttle: Duration,
    last: Mutex<Option<(String, Instant)>>,
}

impl QueuedNarrator {
    /// Start the speech thread feeding `sink`.
    pub fn spawn<S: SpeechSink>(mut sink: S, config: NarratorConfig) -> Self {
        let (sender, receiver) = bounded::<String>(config.queue_capacity.max(1));
        let worker = thread::spawn(move || {
            log::debug!("narrator thread started");
            for text in receiver.iter() {
                if let Err(e) = sink.say(&text) {
                    log::warn!("speech failed for '{}': {}", text, e);
                }
            }
            log::debug!("narrator thread stopped");
        });

        Self {
            sender: Some(sender),
            worker: Some(worker),
            throttle: Duration::from_millis(config.throttle_ms),
            last: Mutex::new(None),
        }
    }

    /// Throttled variant for continuous updates: skipped when `text` equals
    /// the previous throttled utterance and the window has not elapsed.
    pub fn speak(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        {
            let mut last = self.last.lock();
            let now = Instant::now();
            if let Some((prev, at)) = last.as_ref() {
                if prev == text && now.duration_since(*at) < self.throttle {
                    log::trace!("throttled: {}", text);
                    return;
                }
            }
            *last = Some((text.to_string(), now));
        }
        self.enqueue(text);
    }

    fn enqueue(&self, text: &str) {
        let Some(sender) = &self.sender else {
            return;
        };
        match sender.try_send(text.to_string()) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                log::warn!("narration queue full, dropping '{}'", dropped)
            }
            Err(TrySendError::Disconnected(dropped)) => {
                log::warn!("narrator stopped, dropping '{}'", dropped)
            }
        }
    }

    /// Stop accepting utterances and wait for the queue to drain.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("narrator thread panicked");
            }
        }
    }
}

impl Narrator for QueuedNarrator {
    fn speak_once(&self, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.enqueue(text);
        }
    }

    fn reset_throttle(&self) {
        *self.last.lock() = None;
    }
}

impl Drop for QueuedNarrator {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl SpeechSink for Recorder {
        fn say(&mut self, text: &str) -> Result<()> {
            self.0.lock().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_speak_once_is_spoken_in_order() {
        let recorder = Recorder::default();
        let narrator = QueuedNarrator::spawn(recorder.clone(), NarratorConfig::default());
        narrator.speak_once("Looking for milk.");
        narrator.speak_once("Found milk, on your left, keep going.");
        narrator.speak_once("   ");
        narrator.shutdown();

        assert_eq!(
            *recorder.0.lock(),
            vec![
                "Looking for milk.".to_string(),
                "Found milk, on your left, keep going.".to_string()
            ]
        );
    }

    #[test]
    fn test_speak_is_throttled_until_reset() {
        let recorder = Recorder::default();
        let narrator = QueuedNarrator::spawn(
            recorder.clone(),
            NarratorConfig {
                queue_capacity: 8,
                throttle_ms: 60_000,
            },
        );
        narrator.speak("left");
        narrator.speak("left");
        narrator.reset_throttle();
        narrator.speak("left");
        narrator.shutdown();

        assert_eq!(recorder.0.lock().len(), 2);
    }
}
