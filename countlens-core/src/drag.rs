//! Drag controller: turns pointer/touch input into region moves.
//!
//! Mouse and touch events are unified into a plain `{x, y}` point before
//! they reach this state machine, so one controller serves both input
//! modalities. The machine has two states, Idle and Dragging; a down-point
//! that misses the region is not a state change.

use std::time::{Duration, Instant};

use crate::geometry::PixelRect;

/// Pointer or touch position in display pixels, relative to the overlay
/// canvas origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragPhase {
    Idle,
    Dragging {
        /// Offset from the down-point to the region's top-left corner,
        /// preserved for the whole gesture so the region does not jump to
        /// re-center under the cursor.
        grab_dx: f32,
        grab_dy: f32,
    },
}

#[derive(Debug)]
pub struct DragController {
    phase: DragPhase,
    /// Minimum interval between applied moves; `None` applies every move.
    move_throttle: Option<Duration>,
    last_applied: Option<Instant>,
}

impl DragController {
    pub fn new(move_throttle: Option<Duration>) -> Self {
        Self {
            phase: DragPhase::Idle,
            move_throttle,
            last_applied: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Idle → Dragging when the down-point hits the current pixel region.
    /// Returns whether a drag started.
    pub fn pointer_down(&mut self, point: PointerPoint, region: PixelRect) -> bool {
        if self.is_dragging() {
            return false;
        }
        if !region.contains(point.x, point.y) {
            return false;
        }
        self.phase = DragPhase::Dragging {
            grab_dx: point.x - region.x,
            grab_dy: point.y - region.y,
        };
        self.last_applied = None;
        true
    }

    /// Dragging → Dragging: propose a new top-left corner for the region,
    /// in display pixels. Clamping against the live display size is the
    /// region state's job. Returns `None` while idle or when the move is
    /// swallowed by the throttle window.
    pub fn pointer_move(&mut self, point: PointerPoint, now: Instant) -> Option<(f32, f32)> {
        let DragPhase::Dragging { grab_dx, grab_dy } = self.phase else {
            return None;
        };
        if let (Some(throttle), Some(last)) = (self.move_throttle, self.last_applied) {
            if now.duration_since(last) < throttle {
                return None;
            }
        }
        self.last_applied = Some(now);
        Some((point.x - grab_dx, point.y - grab_dy))
    }

    /// Dragging → Idle on pointer-up.
    pub fn pointer_up(&mut self) {
        self.release();
    }

    /// The pointer leaving the tracked element is an implicit up, so the
    /// machine cannot stick in Dragging when the cursor exits the window.
    pub fn pointer_leave(&mut self) {
        self.release();
    }

    fn release(&mut self) {
        self.phase = DragPhase::Idle;
        self.last_applied = None;
    }
}
