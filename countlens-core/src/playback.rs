//! Playback synchronization for the video path: derive the active
//! detection frame from the current playback time.

#[derive(Debug, Clone)]
pub struct PlaybackSync {
    fps: Option<f64>,
    total_frames: Option<u64>,
    frame_index: u64,
}

impl PlaybackSync {
    pub fn new(fps: Option<f64>, total_frames: Option<u64>) -> Self {
        Self {
            fps: fps.filter(|f| f.is_finite() && *f > 0.0),
            total_frames: total_frames.filter(|&n| n > 0),
            frame_index: 0,
        }
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Recompute the frame index as `floor(seconds × fps)`, clamped to
    /// `[0, total_frames − 1]`. Returns whether the index changed. With
    /// `fps` or `total_frames` missing the index keeps its last value —
    /// a defined degraded mode, not a failure.
    pub fn on_time_update(&mut self, seconds: f64) -> bool {
        let (Some(fps), Some(total_frames)) = (self.fps, self.total_frames) else {
            return false;
        };
        let raw = (seconds.max(0.0) * fps).floor() as u64;
        let next = raw.min(total_frames - 1);
        if next == self.frame_index {
            return false;
        }
        self.frame_index = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_follows_playback_time() {
        let mut sync = PlaybackSync::new(Some(30.0), Some(90));
        assert!(sync.on_time_update(2.05));
        // floor(2.05 * 30) = 61, within [0, 89]
        assert_eq!(sync.frame_index(), 61);
    }

    #[test]
    fn frame_index_clamps_to_last_frame() {
        let mut sync = PlaybackSync::new(Some(30.0), Some(90));
        sync.on_time_update(10.0);
        assert_eq!(sync.frame_index(), 89);
    }

    #[test]
    fn repeated_time_in_same_frame_reports_no_change() {
        let mut sync = PlaybackSync::new(Some(30.0), Some(90));
        assert!(sync.on_time_update(1.0));
        assert!(!sync.on_time_update(1.01));
        assert_eq!(sync.frame_index(), 30);
    }

    #[test]
    fn missing_metadata_freezes_the_index() {
        let mut sync = PlaybackSync::new(None, Some(90));
        assert!(!sync.on_time_update(5.0));
        assert_eq!(sync.frame_index(), 0);

        let mut sync = PlaybackSync::new(Some(30.0), None);
        assert!(!sync.on_time_update(5.0));
        assert_eq!(sync.frame_index(), 0);
    }

    #[test]
    fn negative_time_clamps_to_first_frame() {
        let mut sync = PlaybackSync::new(Some(30.0), Some(90));
        sync.on_time_update(4.0);
        assert!(sync.on_time_update(-1.0));
        assert_eq!(sync.frame_index(), 0);
    }
}
