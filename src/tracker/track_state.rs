use crate::tracker::detection::DetectedBox;

/// Tracking record for a single find session.
///
/// `announced` can only be set while `locked` is true, and the lock can only
/// be taken with a concrete target box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackState {
    target: Option<DetectedBox>,
    locked: bool,
    announced: bool,
    missed_frames: u32,
    query: String,
}

impl TrackState {
    /// Fresh, unlocked state for `query`.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// What the user asked to find.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Last known target box. Kept after the lock drops so it can still be drawn.
    pub fn target(&self) -> Option<&DetectedBox> {
        self.target.as_ref()
    }

    /// Whether a target is currently being followed.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether the current lock has already been spoken.
    pub fn is_announced(&self) -> bool {
        self.announced
    }

    pub fn missed_frames(&self) -> u32 {
        self.missed_frames
    }

    /// Commit to `target`. Clears the announcement so the new lock is announced once.
    pub fn lock(&mut self, target: DetectedBox) {
        self.target = Some(target);
        self.locked = true;
        self.announced = false;
        self.missed_frames = 0;
    }

    /// Record that the lock was announced. Returns false (and changes nothing)
    /// when there is no lock to announce.
    pub fn mark_announced(&mut self) -> bool {
        if self.locked {
            self.announced = true;
        }
        self.locked
    }

    pub(crate) fn refresh(&mut self, target: DetectedBox) {
        self.target = Some(target);
        self.missed_frames = 0;
    }

    pub(crate) fn miss(&mut self) -> u32 {
        self.missed_frames = self.missed_frames.saturating_add(1);
        self.missed_frames
    }

    /// Drop the lock, keeping the query and the last known box.
    pub fn unlock(&mut self) {
        self.locked = false;
        self.announced = false;
        self.missed_frames = 0;
    }

    /// Back to the unstarted value. Safe to call any number of times.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announce_requires_lock() {
        let mut state = TrackState::new("milk");
        assert!(!state.mark_announced());
        assert!(!state.is_announced());

        state.lock(DetectedBox::new("bottle", 0.0, 0.0, 10.0, 10.0, 0.9));
        assert!(state.mark_announced());
        assert!(state.is_announced());

        state.unlock();
        assert!(!state.is_announced());
        assert!(state.target().is_some());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = TrackState::new("milk");
        state.lock(DetectedBox::new("bottle", 0.0, 0.0, 10.0, 10.0, 0.9));
        state.mark_announced();
        state.miss();

        for _ in 0..3 {
            state.reset();
            assert_eq!(state, TrackState::default());
        }
    }
}
