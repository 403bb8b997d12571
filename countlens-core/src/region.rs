//! Region state: the single source of truth for the counting region's
//! normalized geometry. Written only through the drag path; everything
//! else derives pixel geometry from it per event.

use crate::config::OverlayConfig;
use crate::geometry::{to_pixel_region, DisplaySize, NormalizedRegion, PixelRect};

#[derive(Debug, Clone)]
pub struct RegionState {
    region: NormalizedRegion,
    badge_clearance_px: f32,
}

impl RegionState {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            region: NormalizedRegion {
                x: config.default_region_x,
                y: config.default_region_y,
                w: config.region_width,
                h: config.region_height,
            },
            badge_clearance_px: config.badge_clearance_px,
        }
    }

    pub fn region(&self) -> NormalizedRegion {
        self.region
    }

    pub fn pixel_rect(&self, display: DisplaySize) -> PixelRect {
        to_pixel_region(self.region, display)
    }

    /// Move the region so its top-left corner sits at `(x, y)` display
    /// pixels, clamped so the region (and the badge strip above it) stays
    /// inside the display. Clamping always uses the display size passed
    /// with the triggering event, never one captured earlier.
    pub fn set_top_left_px(&mut self, x: f32, y: f32, display: DisplaySize) {
        if !display.is_valid() {
            return;
        }
        let width_px = self.region.w * display.width;
        let height_px = self.region.h * display.height;

        let max_x = (display.width - width_px).max(0.0);
        let min_y = self.badge_clearance_px.max(0.0);
        let max_y = (display.height - height_px).max(min_y);

        let clamped_x = x.clamp(0.0, max_x);
        let clamped_y = y.clamp(min_y, max_y);

        self.region.x = clamped_x / display.width;
        self.region.y = clamped_y / display.height;
    }
}
