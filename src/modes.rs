//! Mode handlers and the controller that switches between them.

mod controller;
mod details;
mod find;
mod handler;
mod read;
mod what;

pub use controller::{Mode, ModeController, ModeSession, Reply};
pub use details::{DetailsConfig, DetailsMode};
pub use find::{FindConfig, FindMode};
pub use handler::{FrameContext, ModeHandler, ModeOutcome, Services};
pub use read::ReadMode;
pub use what::{WhatConfig, WhatMode};
