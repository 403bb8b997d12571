use std::time::Duration;

/// Configuration for the counting-region overlay with tunable defaults.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Initial region position, as fractions of the display size.
    pub default_region_x: f32,
    pub default_region_y: f32,

    /// Region size, as fractions of the display size. Fixed for the
    /// lifetime of a session; only the position is draggable.
    pub region_width: f32,
    pub region_height: f32,

    /// Vertical clearance above the region reserved for the count badge.
    pub badge_clearance_px: f32,

    /// Minimum interval between applied drag moves on the video path,
    /// where redraws compete with playback updates. `None` disables
    /// throttling (image path).
    pub video_move_throttle: Option<Duration>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            default_region_x: 0.15,
            default_region_y: 0.15,
            region_width: 0.35,
            region_height: 0.30,
            badge_clearance_px: 30.0,
            video_move_throttle: Some(Duration::from_millis(16)),
        }
    }
}
