//! Depth collaborator.

use crate::direction::{DepthConfig, DepthEstimate};
use crate::frame::Frame;
use crate::tracker::Rect;

/// Estimates how far away the region under a box is.
pub trait DepthSource {
    fn estimate_depth(&mut self, frame: &Frame, region: &Rect) -> DepthEstimate;
}

/// Depth from box size alone, for when no depth model is loaded.
#[derive(Debug, Clone, Default)]
pub struct AreaDepth {
    config: DepthConfig,
}

impl AreaDepth {
    /// Area-based estimate using the given band edges.
    pub fn new(config: DepthConfig) -> Self {
        Self { config }
    }
}

impl DepthSource for AreaDepth {
    fn estimate_depth(&mut self, frame: &Frame, region: &Rect) -> DepthEstimate {
        DepthEstimate::from_area_fraction(frame.area_fraction(region), &self.config)
    }
}

/// Adapts a normalised depth reader (0 close, 1 far) such as a monocular
/// depth model. Regions the reader cannot score fall back to box area.
pub struct NormalizedDepth<F> {
    reader: F,
    config: DepthConfig,
}

impl<F> NormalizedDepth<F>
where
    F: FnMut(&Frame, &Rect) -> Option<f32>,
{
    /// Wrap `reader`; `config` supplies both the depth and the area bands.
    pub fn new(reader: F, config: DepthConfig) -> Self {
        Self { reader, config }
    }
}

impl<F> DepthSource for NormalizedDepth<F>
where
    F: FnMut(&Frame, &Rect) -> Option<f32>,
{
    fn estimate_depth(&mut self, frame: &Frame, region: &Rect) -> DepthEstimate {
        match (self.reader)(frame, region) {
            Some(depth) => DepthEstimate::from_normalized(depth, &self.config),
            None => DepthEstimate::from_area_fraction(frame.area_fraction(region), &self.config),
        }
    }
}
