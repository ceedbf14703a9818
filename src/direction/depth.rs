use serde::Deserialize;

/// Coarse distance to a target. Only meaningful relative to other frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthEstimate {
    Near,
    Mid,
    Far,
}

/// Band edges for turning raw depth signals into a [`DepthEstimate`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DepthConfig {
    /// Box area fraction at or above which the target counts as near.
    pub near_area: f32,
    /// Box area fraction at or above which the target counts as mid range.
    pub mid_area: f32,
    /// Normalised depth (0 close, 1 far) at or below which the target is near.
    pub near_depth: f32,
    /// Normalised depth at or below which the target is mid range.
    pub mid_depth: f32,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            near_area: 0.25,
            mid_area: 0.10,
            near_depth: 0.25,
            mid_depth: 0.50,
        }
    }
}

impl DepthEstimate {
    /// From the share of the frame a box covers. Bigger means closer.
    pub fn from_area_fraction(fraction: f32, config: &DepthConfig) -> Self {
        if fraction >= config.near_area {
            Self::Near
        } else if fraction >= config.mid_area {
            Self::Mid
        } else {
            Self::Far
        }
    }

    /// From a normalised depth map value where 0 is close and 1 is far.
    pub fn from_normalized(depth: f32, config: &DepthConfig) -> Self {
        if depth <= config.near_depth {
            Self::Near
        } else if depth <= config.mid_depth {
            Self::Mid
        } else {
            Self::Far
        }
    }
}
