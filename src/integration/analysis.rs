//! Vision-analysis collaborator and the poll handle for its slow responses.

use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};

use crate::frame::Frame;
use crate::{Error, Result};

/// Remote scene analysis with multi-second latency.
///
/// `analyze` must return immediately; the answer arrives through the
/// returned [`AnalysisHandle`].
pub trait VisionAnalyzer {
    /// False when the service cannot be used at all, e.g. no credentials.
    fn is_available(&self) -> bool;

    /// Start analysing `frame` with `prompt`.
    fn analyze(&mut self, frame: Frame, prompt: &str) -> AnalysisHandle;
}

/// Where an analysis request currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisState {
    Pending,
    Ready(String),
    Failed(String),
}

/// Poll-based handle to an in-flight analysis.
///
/// Polling never blocks. Once the state leaves `Pending` it stays put.
#[derive(Debug)]
pub struct AnalysisHandle {
    receiver: Receiver<Result<String>>,
    state: AnalysisState,
}

/// Sending half of an [`AnalysisHandle`]. Dropping it unanswered fails the request.
#[derive(Debug)]
pub struct AnalysisResponder {
    sender: Sender<Result<String>>,
}

impl AnalysisResponder {
    /// Deliver the result. Consumes the responder, so a request is answered at most once.
    pub fn respond(self, result: Result<String>) {
        // The handle may already be gone if the mode was cancelled.
        let _ = self.sender.send(result);
    }
}

impl AnalysisHandle {
    /// Connected responder/handle pair.
    pub fn channel() -> (AnalysisResponder, AnalysisHandle) {
        let (sender, receiver) = bounded(1);
        (
            AnalysisResponder { sender },
            AnalysisHandle {
                receiver,
                state: AnalysisState::Pending,
            },
        )
    }

    /// Run `job` on its own thread and hand back a handle to its result.
    pub fn spawn<F>(job: F) -> AnalysisHandle
    where
        F: FnOnce() -> Result<String> + Send + 'static,
    {
        let (responder, handle) = Self::channel();
        thread::spawn(move || responder.respond(job()));
        handle
    }

    /// Handle that has already failed.
    pub fn failed(reason: impl Into<String>) -> AnalysisHandle {
        let (responder, handle) = Self::channel();
        responder.respond(Err(Error::Analysis(reason.into())));
        handle
    }

    /// Check for a response without waiting.
    pub fn poll(&mut self) -> &AnalysisState {
        if self.state == AnalysisState::Pending {
            match self.receiver.try_recv() {
                Ok(Ok(text)) => self.state = AnalysisState::Ready(text),
                Ok(Err(e)) => self.state = AnalysisState::Failed(e.to_string()),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.state = AnalysisState::Failed(Error::ChannelClosed("analysis").to_string())
                }
            }
        }
        &self.state
    }
}

/// Analyzer for setups without a vision service configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableAnalyzer;

impl VisionAnalyzer for UnavailableAnalyzer {
    fn is_available(&self) -> bool {
        false
    }

    fn analyze(&mut self, _frame: Frame, _prompt: &str) -> AnalysisHandle {
        AnalysisHandle::failed(Error::Unavailable("vision analysis").to_string())
    }
}
