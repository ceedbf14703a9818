//! Single-target IoU tracker.

use serde::Deserialize;

use crate::tracker::detection::DetectedBox;
use crate::tracker::rect::{Rect, iou_batch};
use crate::tracker::track_state::TrackState;

/// Configuration for the IouTracker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Minimum IoU for a detection to count as the locked target.
    pub iou_threshold: f32,
    /// Consecutive frames without a match tolerated before the lock drops.
    pub max_missed_frames: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.3,
            max_missed_frames: 10,
        }
    }
}

/// Outcome of one tracker update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackUpdate {
    /// No lock was held; nothing happened.
    Idle,
    /// The locked box moved to the detection with this IoU.
    Matched { iou: f32 },
    /// No detection cleared the threshold; last known box retained.
    Missed { missed_frames: u32 },
    /// Tolerance exceeded, the lock was dropped this frame.
    Lost,
}

/// Follows one locked box across frames by geometric overlap only.
///
/// Class labels are ignored after the lock, so a target whose label flickers
/// between frames is kept as long as its box overlaps.
#[derive(Debug, Clone, Default)]
pub struct IouTracker {
    config: TrackerConfig,
}

impl IouTracker {
    /// Create a tracker with the given configuration.
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    /// Get the tracker configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Advance `state` by one frame.
    ///
    /// The detection overlapping the locked box the most replaces it when the
    /// IoU reaches the threshold. Otherwise the frame counts as a miss.
    pub fn update(&self, state: &mut TrackState, detections: &[DetectedBox]) -> TrackUpdate {
        if !state.is_locked() {
            return TrackUpdate::Idle;
        }
        let Some(previous) = state.target().map(|t| t.bbox) else {
            return TrackUpdate::Idle;
        };

        match self.best_candidate(&previous, detections) {
            Some((idx, iou)) if iou >= self.config.iou_threshold => {
                state.refresh(detections[idx].clone());
                TrackUpdate::Matched { iou }
            }
            _ => {
                let missed_frames = state.miss();
                if missed_frames > self.config.max_missed_frames {
                    log::debug!(
                        "lock on '{}' dropped after {} missed frames",
                        state.query(),
                        missed_frames
                    );
                    state.unlock();
                    TrackUpdate::Lost
                } else {
                    TrackUpdate::Missed { missed_frames }
                }
            }
        }
    }

    /// Index and IoU of the detection overlapping `previous` the most.
    fn best_candidate(&self, previous: &Rect, detections: &[DetectedBox]) -> Option<(usize, f32)> {
        if detections.is_empty() {
            return None;
        }
        let rects: Vec<Rect> = detections.iter().map(|d| d.bbox).collect();
        let ious = iou_batch(std::slice::from_ref(previous), &rects);

        ious.row(0)
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}
