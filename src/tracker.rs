mod detection;
mod iou_tracker;
mod matching;
mod rect;
mod track_state;

pub use detection::{DetectedBox, largest_excluding};
pub use iou_tracker::{IouTracker, TrackUpdate, TrackerConfig};
pub use matching::{Match, MatchStage, Matcher, MatcherConfig, normalize};
pub use rect::{Rect, iou_batch};
pub use track_state::TrackState;
