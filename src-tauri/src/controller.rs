use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use countlens_core::{MediaHandle, MediaKind, OverlayConfig, ResultPayload, ViewerSession};
use log::{info, warn};
use serde::Serialize;
use tauri::{AppHandle, Emitter};
use tokio::sync::Mutex;

/// Returned to the frontend after a payload loads: what to mount in the
/// media element and what kind of session started.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    pub kind: MediaKind,
    pub model_used: String,
    /// Source for the `<img>`/`<video>` element: a temp-file path for
    /// materialized video, a data URI otherwise.
    pub media_src: String,
    pub detection_count: usize,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct OverlayUpdatedEvent {
    count: usize,
    region: countlens_core::PixelRect,
    frame_index: Option<u64>,
    /// PNG data URI of the rendered overlay canvas.
    overlay_png: String,
}

/// Owns the active viewer session and pushes rendered overlay frames to
/// the webview. Any number of input events may arrive between two
/// redraws; scheduling is coalesced so each burst produces one frame,
/// drawn from the state current at draw time.
#[derive(Clone)]
pub struct ViewerController {
    session: Arc<Mutex<Option<ViewerSession>>>,
    media: Arc<Mutex<Option<MediaHandle>>>,
    app_handle: AppHandle,
    redraw_pending: Arc<AtomicBool>,
    config: OverlayConfig,
}

impl ViewerController {
    pub fn new(app_handle: AppHandle) -> Self {
        Self {
            session: Arc::new(Mutex::new(None)),
            media: Arc::new(Mutex::new(None)),
            app_handle,
            redraw_pending: Arc::new(AtomicBool::new(false)),
            config: OverlayConfig::default(),
        }
    }

    /// Replace the active session with one built from a raw service
    /// response body. The previous session's media handle drops here,
    /// which removes its temp file.
    pub async fn load_result(&self, body: String) -> Result<LoadSummary> {
        let payload = ResultPayload::from_json(&body)?;

        let (media_src, detection_count, media) = match &payload {
            ResultPayload::Image(image) => {
                (image.annotated_image.clone(), image.detections.len(), None)
            }
            ResultPayload::Video(video) => {
                let handle = MediaHandle::materialize_video(&video.video);
                let total: usize = video
                    .detections_per_frame
                    .iter()
                    .map(|record| record.detections.len())
                    .sum();
                (handle.as_src(), total, Some(handle))
            }
        };

        let session = ViewerSession::new(payload, &self.config);
        let summary = LoadSummary {
            kind: session.kind(),
            model_used: session.payload().model_used().to_string(),
            media_src,
            detection_count,
        };
        info!(
            "loaded {:?} result from {} ({} detections)",
            summary.kind, summary.model_used, detection_count
        );

        *self.media.lock().await = media;
        *self.session.lock().await = Some(session);
        self.schedule_redraw();
        Ok(summary)
    }

    pub async fn display_resized(&self, width: f32, height: f32) -> Result<()> {
        self.with_session(|session| session.set_display_size(width, height))
            .await
    }

    pub async fn media_loaded(&self, native_width: f32, native_height: f32) -> Result<()> {
        self.with_session(|session| session.set_native_size(native_width, native_height))
            .await
    }

    pub async fn pointer_down(&self, x: f32, y: f32) -> Result<bool> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or_else(|| anyhow!("no active session"))?;
        let started = session.pointer_down(x, y);
        let wants_redraw = session.take_redraw();
        drop(guard);
        if wants_redraw {
            self.schedule_redraw();
        }
        Ok(started)
    }

    pub async fn pointer_move(&self, x: f32, y: f32) -> Result<()> {
        self.with_session(|session| session.pointer_move(x, y, Instant::now()))
            .await
    }

    pub async fn pointer_up(&self) -> Result<()> {
        self.with_session(ViewerSession::pointer_up).await
    }

    pub async fn pointer_leave(&self) -> Result<()> {
        self.with_session(ViewerSession::pointer_leave).await
    }

    pub async fn playback_time(&self, seconds: f64) -> Result<()> {
        self.with_session(|session| session.playback_time(seconds))
            .await
    }

    async fn with_session(&self, f: impl FnOnce(&mut ViewerSession)) -> Result<()> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or_else(|| anyhow!("no active session"))?;
        f(session);
        let wants_redraw = session.take_redraw();
        drop(guard);
        if wants_redraw {
            self.schedule_redraw();
        }
        Ok(())
    }

    /// Request a redraw. If one is already queued this is a no-op; the
    /// queued draw reads whatever state is current when it runs, so the
    /// latest event always wins.
    fn schedule_redraw(&self) {
        if self.redraw_pending.swap(true, Ordering::AcqRel) {
            return;
        }
        let controller = self.clone();
        tauri::async_runtime::spawn(async move {
            let mut guard = controller.session.lock().await;
            controller.redraw_pending.store(false, Ordering::Release);
            let Some(session) = guard.as_mut() else {
                return;
            };
            session.take_redraw();
            let Some(frame) = session.overlay_frame() else {
                // Display or native geometry not reported yet.
                return;
            };
            session.render();
            let overlay_png = match session.renderer().to_png_base64() {
                Ok(png) => png,
                Err(err) => {
                    warn!("overlay frame could not be encoded: {err:#}");
                    return;
                }
            };
            let event = OverlayUpdatedEvent {
                count: frame.count,
                region: frame.region,
                frame_index: frame.frame_index,
                overlay_png,
            };
            drop(guard);
            if let Err(err) = controller.app_handle.emit("overlay-updated", &event) {
                warn!("failed to emit overlay update: {err}");
            }
        });
    }
}
