//! Pure coordinate conversions between the three spaces the overlay deals
//! with: normalized region fractions, on-screen display pixels, and the
//! media's native resolution.

use serde::{Deserialize, Serialize};

/// Region expressed as fractions of the display size, independent of how
/// large the media is currently rendered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRegion {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Axis-aligned rectangle in display pixels (top-left + size).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// Corner-form rectangle in the media's native pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeRect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Live on-screen size of the media element. Derived per event, never
/// stored across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

impl DisplaySize {
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Scale a normalized region into display pixels. A zero-sized display
/// yields a degenerate zero-area rect, not an error.
pub fn to_pixel_region(region: NormalizedRegion, display: DisplaySize) -> PixelRect {
    PixelRect {
        x: region.x * display.width,
        y: region.y * display.height,
        width: region.w * display.width,
        height: region.h * display.height,
    }
}

/// Map a display-pixel rectangle into native media coordinates. The
/// display size must be the one measured when `rect` was computed; a
/// stale pair produces a transient mismatch that self-corrects on the
/// next redraw.
pub fn to_native_rect(
    rect: PixelRect,
    display: DisplaySize,
    native_width: f32,
    native_height: f32,
) -> NativeRect {
    if !display.is_valid() {
        // Geometry not available yet; callers treat a zero rect as empty.
        return NativeRect {
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
        };
    }
    let scale_x = native_width / display.width;
    let scale_y = native_height / display.height;
    NativeRect {
        x1: rect.x * scale_x,
        y1: rect.y * scale_y,
        x2: (rect.x + rect.width) * scale_x,
        y2: (rect.y + rect.height) * scale_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_region_scales_linearly() {
        let region = NormalizedRegion {
            x: 0.15,
            y: 0.15,
            w: 0.35,
            h: 0.3,
        };
        let display = DisplaySize {
            width: 400.0,
            height: 300.0,
        };
        let rect = to_pixel_region(region, display);
        assert_eq!(rect.x, 60.0);
        assert_eq!(rect.y, 45.0);
        assert_eq!(rect.width, 140.0);
        assert_eq!(rect.height, 90.0);
    }

    #[test]
    fn zero_display_yields_degenerate_rect() {
        let region = NormalizedRegion {
            x: 0.5,
            y: 0.5,
            w: 0.2,
            h: 0.2,
        };
        let rect = to_pixel_region(
            region,
            DisplaySize {
                width: 0.0,
                height: 0.0,
            },
        );
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 0.0);
    }

    #[test]
    fn native_rect_round_trips_through_pixel_space() {
        let display = DisplaySize {
            width: 640.0,
            height: 360.0,
        };
        let (native_w, native_h) = (1920.0, 1080.0);
        let region = NormalizedRegion {
            x: 0.25,
            y: 0.1,
            w: 0.4,
            h: 0.5,
        };
        let rect = to_pixel_region(region, display);
        let native = to_native_rect(rect, display, native_w, native_h);

        // Map the native corners back to display pixels and compare.
        let back_x = native.x1 / (native_w / display.width);
        let back_y = native.y1 / (native_h / display.height);
        assert!((back_x - rect.x).abs() < 1e-3);
        assert!((back_y - rect.y).abs() < 1e-3);
        assert!((native.x2 - native.x1 - region.w * native_w).abs() < 1e-2);
        assert!((native.y2 - native.y1 - region.h * native_h).abs() < 1e-2);
    }

    #[test]
    fn invalid_display_maps_to_empty_native_rect() {
        let rect = PixelRect {
            x: 10.0,
            y: 10.0,
            width: 50.0,
            height: 50.0,
        };
        let native = to_native_rect(
            rect,
            DisplaySize {
                width: 0.0,
                height: 240.0,
            },
            1920.0,
            1080.0,
        );
        assert_eq!(native.x2, 0.0);
        assert_eq!(native.y2, 0.0);
    }

    #[test]
    fn contains_is_inclusive_on_edges() {
        let rect = PixelRect {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
        };
        assert!(rect.contains(10.0, 20.0));
        assert!(rect.contains(110.0, 70.0));
        assert!(!rect.contains(9.9, 20.0));
        assert!(!rect.contains(110.1, 70.0));
    }
}
