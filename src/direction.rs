//! Spoken position and guidance derived from where a box sits in the frame.

mod depth;
mod engine;
mod zone;

pub use depth::{DepthConfig, DepthEstimate};
pub use engine::{DirectionEngine, Guidance};
pub use zone::{Horizontal, PositionZone, Vertical};
