//! Containment evaluation: how many detections fall inside the counting
//! region. Membership is decided by the bounding-box center, not by area
//! overlap, so a box half outside the region still counts if its centroid
//! is inside.

use crate::geometry::NativeRect;
use crate::payload::Detection;

/// Count detections whose bounding-box center lies within `rect`,
/// inclusive on both bounds. Pure and order-independent; an empty slice
/// yields 0.
pub fn count_in_region(detections: &[Detection], rect: NativeRect) -> usize {
    detections
        .iter()
        .filter(|det| {
            let (cx, cy) = det.center();
            cx >= rect.x1 && cx <= rect.x2 && cy >= rect.y1 && cy <= rect.y2
        })
        .count()
}
