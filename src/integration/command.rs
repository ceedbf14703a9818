//! Spoken commands and the queue that carries them to the frame loop.

use std::fmt;
use std::io::BufRead;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

/// A recognised user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Find(String),
    What,
    Read,
    Details,
    Stop,
    Quit,
}

impl Command {
    /// Verb used in logs and `Display`.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Find(_) => "find",
            Self::What => "what",
            Self::Read => "read",
            Self::Details => "details",
            Self::Stop => "stop",
            Self::Quit => "quit",
        }
    }

    /// Only `find` carries an argument.
    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::Find(query) => Some(query),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.argument() {
            Some(arg) => write!(f, "{} {}", self.action(), arg),
            None => f.write_str(self.action()),
        }
    }
}

const WHAT_PHRASES: &[&str] = &["what is this", "what does this say", "what is it"];
const READ_PHRASES: &[&str] = &["read", "read this"];
const DETAILS_PHRASES: &[&str] = &[
    "tell me more",
    "tell me more about this",
    "tell me more about this product",
    "more details",
    "more information",
];
const STOP_PHRASES: &[&str] = &["stop", "cancel"];
const QUIT_PHRASES: &[&str] = &["quit", "exit"];

/// Map recognised speech to a command. Anything unknown yields `None`.
pub fn parse_command(text: &str) -> Option<Command> {
    let lowered = text.to_lowercase();
    let text = lowered
        .trim()
        .trim_end_matches(['.', '!', '?'])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if let Some(query) = text.strip_prefix("find ") {
        let query = query.trim();
        return (!query.is_empty()).then(|| Command::Find(query.to_string()));
    }

    let phrase = text.as_str();
    if WHAT_PHRASES.contains(&phrase) {
        Some(Command::What)
    } else if READ_PHRASES.contains(&phrase) {
        Some(Command::Read)
    } else if DETAILS_PHRASES.contains(&phrase) {
        Some(Command::Details)
    } else if STOP_PHRASES.contains(&phrase) {
        Some(Command::Stop)
    } else if QUIT_PHRASES.contains(&phrase) {
        Some(Command::Quit)
    } else {
        None
    }
}

/// FIFO of parsed commands between a listener thread and the frame loop.
///
/// The queue itself is the only consumer and is not `Clone`; producers get
/// their own handle from [`CommandQueue::sender`].
#[derive(Debug)]
pub struct CommandQueue {
    sender: Sender<Command>,
    receiver: Receiver<Command>,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    /// Empty queue.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Producer handle for a listener.
    pub fn sender(&self) -> Sender<Command> {
        self.sender.clone()
    }

    /// Enqueue from the consumer side, e.g. a keyboard shortcut.
    pub fn push(&self, command: Command) {
        // The queue owns a receiver, so the channel cannot be disconnected.
        let _ = self.sender.send(command);
    }

    /// Oldest pending command, if any. Never waits.
    pub fn try_next(&self) -> Option<Command> {
        match self.receiver.try_recv() {
            Ok(command) => Some(command),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Listen for recognised text lines on a background thread.
    ///
    /// Unknown lines are skipped. End of input or a read error queues `Quit`.
    pub fn listen<R>(&self, reader: R) -> JoinHandle<()>
    where
        R: BufRead + Send + 'static,
    {
        let sender = self.sender();
        thread::spawn(move || {
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        log::warn!("command input failed: {}", e);
                        break;
                    }
                };
                match parse_command(&line) {
                    Some(command) => {
                        log::info!("heard command: {}", command);
                        if sender.send(command).is_err() {
                            return;
                        }
                    }
                    None => log::debug!("ignoring unrecognised input '{}'", line.trim()),
                }
            }
            let _ = sender.send(Command::Quit);
        })
    }
}
