//! Viewer session: one owner per result payload, wiring region state,
//! drag handling, playback sync, containment counting and the renderer
//! together. Everything here runs on discrete event callbacks; redraw
//! demand is tracked as a flag so the app layer can coalesce scheduling.

use std::io::Cursor;
use std::time::Instant;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use image::RgbaImage;
use log::debug;
use serde::Serialize;

use crate::config::OverlayConfig;
use crate::counting::count_in_region;
use crate::drag::{DragController, PointerPoint};
use crate::geometry::{to_native_rect, DisplaySize, PixelRect};
use crate::payload::{Detection, ResultPayload};
use crate::playback::PlaybackSync;
use crate::region::RegionState;
use crate::render::{OverlayRenderer, OverlayStyle};

/// Snapshot of the overlay for one redraw: live count, the region's
/// display-pixel rectangle, and the active video frame (if any).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayFrame {
    pub count: usize,
    pub region: PixelRect,
    pub frame_index: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaKind {
    Image,
    Video,
}

pub struct ViewerSession {
    payload: ResultPayload,
    region: RegionState,
    drag: DragController,
    playback: Option<PlaybackSync>,
    display: Option<DisplaySize>,
    native: Option<(f32, f32)>,
    renderer: OverlayRenderer,
    redraw_needed: bool,
}

impl ViewerSession {
    pub fn new(payload: ResultPayload, config: &OverlayConfig) -> Self {
        let (playback, throttle, native) = match &payload {
            ResultPayload::Image(image) => {
                // The annotated image carries its own native dimensions;
                // decode them up front so the image path can draw without
                // waiting for a media-loaded report.
                let native = data_uri_dimensions(&image.annotated_image);
                if native.is_none() {
                    debug!("annotated image dimensions unavailable; waiting for media_loaded");
                }
                (None, None, native)
            }
            ResultPayload::Video(video) => (
                Some(PlaybackSync::new(video.fps, video.total_frames)),
                config.video_move_throttle,
                None,
            ),
        };

        Self {
            payload,
            region: RegionState::new(config),
            drag: DragController::new(throttle),
            playback,
            display: None,
            native,
            renderer: OverlayRenderer::new(OverlayStyle::default()),
            redraw_needed: false,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self.payload {
            ResultPayload::Image(_) => MediaKind::Image,
            ResultPayload::Video(_) => MediaKind::Video,
        }
    }

    pub fn payload(&self) -> &ResultPayload {
        &self.payload
    }

    // ── geometry events ──────────────────────────────────────────────

    /// Window resize / layout change: record the new on-screen size of
    /// the media element. The normalized region value is untouched;
    /// dependents re-derive pixel geometry from it.
    pub fn set_display_size(&mut self, width: f32, height: f32) {
        let display = DisplaySize { width, height };
        self.display = Some(display);
        self.renderer
            .resize(width.max(0.0) as u32, height.max(0.0) as u32);
        self.redraw_needed = true;
    }

    /// Native media dimensions, reported by the frontend once the media
    /// element has decoded enough to know them (image load / video
    /// metadata). For the image path this is usually already known.
    pub fn set_native_size(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.native = Some((width, height));
            self.redraw_needed = true;
        }
    }

    // ── pointer events ───────────────────────────────────────────────

    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        let Some(display) = self.display else {
            return false;
        };
        let started = self
            .drag
            .pointer_down(PointerPoint { x, y }, self.region.pixel_rect(display));
        if started {
            self.redraw_needed = true;
        }
        started
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, now: Instant) {
        let Some(display) = self.display else {
            return;
        };
        if let Some((corner_x, corner_y)) = self.drag.pointer_move(PointerPoint { x, y }, now) {
            self.region.set_top_left_px(corner_x, corner_y, display);
            self.redraw_needed = true;
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.drag.pointer_leave();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    // ── playback events ──────────────────────────────────────────────

    /// Video `timeupdate`: derive the active frame index. A no-op for
    /// image sessions and in degraded mode (missing fps/frame count).
    pub fn playback_time(&mut self, seconds: f64) {
        if let Some(playback) = self.playback.as_mut() {
            if playback.on_time_update(seconds) {
                self.redraw_needed = true;
            }
        }
    }

    pub fn frame_index(&self) -> Option<u64> {
        self.playback.as_ref().map(|p| p.frame_index())
    }

    // ── derived state ────────────────────────────────────────────────

    /// Detections feeding the containment count: the whole set for an
    /// image, the active frame's record for a video.
    pub fn active_detections(&self) -> &[Detection] {
        match &self.payload {
            ResultPayload::Image(image) => &image.detections,
            ResultPayload::Video(video) => {
                let index = self
                    .playback
                    .as_ref()
                    .map(|p| p.frame_index())
                    .unwrap_or(0);
                video.detections_for_frame(index)
            }
        }
    }

    /// Current overlay snapshot, or `None` while display or native
    /// geometry is still missing (silent skip, never an error).
    pub fn overlay_frame(&self) -> Option<OverlayFrame> {
        let display = self.display.filter(DisplaySize::is_valid)?;
        let (native_w, native_h) = self.native?;
        let region = self.region.pixel_rect(display);
        let native_rect = to_native_rect(region, display, native_w, native_h);
        Some(OverlayFrame {
            count: count_in_region(self.active_detections(), native_rect),
            region,
            frame_index: self.frame_index(),
        })
    }

    /// Rasterize the current overlay frame. Returns the canvas, or
    /// `None` while geometry is missing.
    pub fn render(&mut self) -> Option<&RgbaImage> {
        let frame = self.overlay_frame()?;
        self.renderer.render(frame.region, frame.count);
        Some(self.renderer.canvas())
    }

    pub fn renderer(&self) -> &OverlayRenderer {
        &self.renderer
    }

    /// Consume the pending-redraw flag. The app layer calls this from
    /// its coalesced render task so one draw covers any number of
    /// preceding events.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_needed)
    }
}

/// Dimensions of a base64 image data URI, without a full pixel decode.
fn data_uri_dimensions(data_uri: &str) -> Option<(f32, f32)> {
    let encoded = data_uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)?;
    let bytes = BASE64_STANDARD.decode(encoded.trim()).ok()?;
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;
    let (w, h) = reader.into_dimensions().ok()?;
    Some((w as f32, h as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{FrameRecord, ImageResult, VideoResult};

    fn det(bbox: [f32; 4]) -> Detection {
        Detection {
            label: "bottle".into(),
            confidence: 0.9,
            bbox,
            class_id: None,
        }
    }

    fn image_session(detections: Vec<Detection>) -> ViewerSession {
        let payload = ResultPayload::Image(ImageResult {
            model_used: "YoloV11s".into(),
            annotated_image: "data:image/png;base64,AA".into(),
            detections,
        });
        ViewerSession::new(payload, &OverlayConfig::default())
    }

    fn video_session(frames: Vec<FrameRecord>, fps: Option<f64>, total: Option<u64>) -> ViewerSession {
        let payload = ResultPayload::Video(VideoResult {
            model_used: "YoloV11s".into(),
            video: "data:video/mp4;base64,AA".into(),
            detections_per_frame: frames,
            total_frames: total,
            fps,
        });
        ViewerSession::new(payload, &OverlayConfig::default())
    }

    #[test]
    fn overlay_is_withheld_until_geometry_is_known() {
        let mut session = image_session(vec![det([50.0, 50.0, 150.0, 150.0])]);
        assert!(session.overlay_frame().is_none());

        session.set_display_size(400.0, 300.0);
        // Native dims still unknown (the fake data URI has no header).
        assert!(session.overlay_frame().is_none());

        session.set_native_size(400.0, 300.0);
        let frame = session.overlay_frame().expect("geometry complete");
        // Default region [60,45]-[200,135] contains center (100,100).
        assert_eq!(frame.count, 1);
    }

    #[test]
    fn pointer_events_before_geometry_are_no_ops() {
        let mut session = image_session(vec![]);
        assert!(!session.pointer_down(100.0, 80.0));
        session.pointer_move(120.0, 90.0, Instant::now());
        assert!(!session.is_dragging());
    }

    #[test]
    fn drag_moves_the_region_and_changes_the_count() {
        let mut session = image_session(vec![det([50.0, 50.0, 150.0, 150.0])]);
        session.set_display_size(400.0, 300.0);
        session.set_native_size(400.0, 300.0);
        assert_eq!(session.overlay_frame().unwrap().count, 1);

        // Grab the region center and drag it to the far right.
        assert!(session.pointer_down(130.0, 90.0));
        session.pointer_move(380.0, 90.0, Instant::now());
        session.pointer_up();

        let frame = session.overlay_frame().unwrap();
        assert!(frame.region.x > 200.0);
        assert_eq!(frame.count, 0);
    }

    #[test]
    fn video_count_follows_the_active_frame() {
        let frames = vec![
            FrameRecord {
                frame_index: 0,
                detections: vec![det([50.0, 50.0, 150.0, 150.0])],
            },
            FrameRecord {
                frame_index: 61,
                detections: vec![det([50.0, 50.0, 150.0, 150.0]), det([60.0, 60.0, 160.0, 160.0])],
            },
        ];
        let mut session = video_session(frames, Some(30.0), Some(90));
        session.set_display_size(400.0, 300.0);
        session.set_native_size(400.0, 300.0);
        assert_eq!(session.overlay_frame().unwrap().count, 1);

        session.playback_time(2.05);
        let frame = session.overlay_frame().unwrap();
        assert_eq!(frame.frame_index, Some(61));
        assert_eq!(frame.count, 2);

        // Frames without a record count zero.
        session.playback_time(1.0);
        assert_eq!(session.overlay_frame().unwrap().count, 0);
    }

    #[test]
    fn degraded_video_keeps_its_last_frame_index() {
        let frames = vec![FrameRecord {
            frame_index: 0,
            detections: vec![det([50.0, 50.0, 150.0, 150.0])],
        }];
        let mut session = video_session(frames, None, None);
        session.set_display_size(400.0, 300.0);
        session.set_native_size(400.0, 300.0);

        session.playback_time(5.0);
        assert_eq!(session.frame_index(), Some(0));
        assert_eq!(session.overlay_frame().unwrap().count, 1);
    }

    #[test]
    fn pointer_down_raises_the_redraw_flag_exactly_once() {
        let mut session = image_session(vec![]);
        session.set_display_size(400.0, 300.0);
        session.set_native_size(400.0, 300.0);
        session.take_redraw();

        assert!(session.pointer_down(100.0, 80.0));
        assert!(session.take_redraw());
        // Fully consumed: the next event starts from a clean flag and
        // cannot inherit stale redraw demand.
        assert!(!session.take_redraw());
    }

    #[test]
    fn resize_requests_a_redraw_without_moving_the_region() {
        let mut session = image_session(vec![]);
        session.set_display_size(400.0, 300.0);
        session.set_native_size(400.0, 300.0);
        session.take_redraw();

        let before = session.overlay_frame().unwrap().region;
        session.set_display_size(800.0, 600.0);
        assert!(session.take_redraw());
        let after = session.overlay_frame().unwrap().region;
        // Same normalized value, twice the pixel geometry.
        assert!((after.x - before.x * 2.0).abs() < 1e-3);
        assert!((after.width - before.width * 2.0).abs() < 1e-3);
    }

    #[test]
    fn render_rasterizes_once_geometry_is_ready() {
        let mut session = image_session(vec![]);
        assert!(session.render().is_none());
        session.set_display_size(200.0, 150.0);
        session.set_native_size(200.0, 150.0);
        let canvas = session.render().expect("canvas");
        assert_eq!(canvas.width(), 200);
        assert_eq!(canvas.height(), 150);
    }
}
