use std::fmt;

use crate::direction::depth::DepthEstimate;
use crate::direction::zone::{Horizontal, PositionZone};
use crate::tracker::Rect;

/// Discrete guidance level for a target.
///
/// Two equal values speak the same phrase, which is what callers compare
/// to avoid repeating themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guidance {
    /// Far away: direction only.
    Heading(Horizontal),
    /// Getting close: direction plus encouragement.
    Approach(Horizontal),
    /// Close enough to reach, whatever the side.
    Stop,
}

impl Guidance {
    /// Combine a zone and a depth band.
    pub fn from_parts(zone: PositionZone, depth: DepthEstimate) -> Self {
        match depth {
            DepthEstimate::Far => Self::Heading(zone.horizontal),
            DepthEstimate::Mid => Self::Approach(zone.horizontal),
            DepthEstimate::Near => Self::Stop,
        }
    }
}

fn side(h: Horizontal) -> &'static str {
    match h {
        Horizontal::Left => "on your left",
        Horizontal::Center => "ahead",
        Horizontal::Right => "on your right",
    }
}

impl fmt::Display for Guidance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heading(h) => write!(f, "{}, keep going", side(*h)),
            Self::Approach(h) => write!(f, "{}, almost there", side(*h)),
            Self::Stop => f.write_str("stop, it's right in front of you"),
        }
    }
}

/// Stateless mapping from box position plus depth to [`Guidance`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionEngine {
    mirror: bool,
}

impl DirectionEngine {
    /// Create an engine; `mirror` swaps left and right.
    pub fn new(mirror: bool) -> Self {
        Self { mirror }
    }

    /// Zone of `rect` in a `width` x `height` frame.
    pub fn zone(&self, rect: &Rect, width: u32, height: u32) -> PositionZone {
        PositionZone::of(rect, width, height, self.mirror)
    }

    /// Guidance for `rect` at the given depth.
    pub fn guidance(&self, rect: &Rect, width: u32, height: u32, depth: DepthEstimate) -> Guidance {
        Guidance::from_parts(self.zone(rect, width, height), depth)
    }
}
