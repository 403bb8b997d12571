//! Boundary types for result payloads from the inference service.
//!
//! The service distinguishes image and video results only by which fields
//! are present. That ambiguity is resolved here, once: `ResultPayload` is
//! an explicit tagged union and the rest of the crate never checks field
//! presence again. A body with neither or both shapes is rejected.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// One labeled, confidence-scored bounding box in the native pixel
/// coordinates of the image or video frame it was produced from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    /// `[x1, y1, x2, y2]` corners.
    pub bbox: [f32; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<i64>,
}

impl Detection {
    /// Bounding-box centroid; containment is decided on this point.
    pub fn center(&self) -> (f32, f32) {
        let [x1, y1, x2, y2] = self.bbox;
        ((x1 + x2) / 2.0, (y1 + y2) / 2.0)
    }
}

/// Detections for one specific video frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame_index: u64,
    pub detections: Vec<Detection>,
}

#[derive(Debug, Clone)]
pub struct ImageResult {
    pub model_used: String,
    /// Data URI of the annotated image.
    pub annotated_image: String,
    pub detections: Vec<Detection>,
}

#[derive(Debug, Clone)]
pub struct VideoResult {
    pub model_used: String,
    /// Data URI of the annotated video (base64 mp4).
    pub video: String,
    /// Sorted by `frame_index`.
    pub detections_per_frame: Vec<FrameRecord>,
    pub total_frames: Option<u64>,
    pub fps: Option<f64>,
}

impl VideoResult {
    /// Detections for a frame index, empty when no record exists.
    pub fn detections_for_frame(&self, frame_index: u64) -> &[Detection] {
        match self
            .detections_per_frame
            .binary_search_by_key(&frame_index, |record| record.frame_index)
        {
            Ok(pos) => &self.detections_per_frame[pos].detections,
            Err(_) => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub enum ResultPayload {
    Image(ImageResult),
    Video(VideoResult),
}

/// Wire shape as the service sends it; both result kinds share it.
#[derive(Debug, Deserialize)]
struct RawResultPayload {
    model_used: String,
    annotated_image: Option<String>,
    detections: Option<Vec<Detection>>,
    video: Option<String>,
    detections_per_frame: Option<Vec<FrameRecord>>,
    total_frames: Option<u64>,
    fps: Option<f64>,
}

impl ResultPayload {
    pub fn from_json(body: &str) -> Result<Self> {
        let raw: RawResultPayload =
            serde_json::from_str(body).map_err(|e| anyhow!("malformed result payload: {e}"))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawResultPayload) -> Result<Self> {
        match (raw.annotated_image, raw.video) {
            (Some(_), Some(_)) => Err(anyhow!(
                "result payload carries both an annotated image and a video"
            )),
            (None, None) => Err(anyhow!(
                "result payload carries neither an annotated image nor a video"
            )),
            (Some(annotated_image), None) => Ok(ResultPayload::Image(ImageResult {
                model_used: raw.model_used,
                annotated_image,
                detections: raw.detections.unwrap_or_default(),
            })),
            (None, Some(video)) => {
                let mut detections_per_frame = raw.detections_per_frame.unwrap_or_default();
                // The contract says ordered; sort anyway so frame lookup
                // can binary-search.
                detections_per_frame.sort_by_key(|record| record.frame_index);
                // A zero frame count leaves nothing to clamp to; treat it
                // like an absent field.
                let total_frames = raw.total_frames.filter(|&n| n > 0);
                Ok(ResultPayload::Video(VideoResult {
                    model_used: raw.model_used,
                    video,
                    detections_per_frame,
                    total_frames,
                    fps: raw.fps,
                }))
            }
        }
    }

    pub fn model_used(&self) -> &str {
        match self {
            ResultPayload::Image(image) => &image.model_used,
            ResultPayload::Video(video) => &video.model_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(label: &str, bbox: [f32; 4]) -> String {
        format!(
            r#"{{"label":"{label}","confidence":0.9,"class_id":1,"bbox":[{},{},{},{}]}}"#,
            bbox[0], bbox[1], bbox[2], bbox[3]
        )
    }

    #[test]
    fn image_payload_parses_into_image_variant() {
        let body = format!(
            r#"{{"model_used":"YoloV11s","annotated_image":"data:image/png;base64,AAAA","detections":[{}]}}"#,
            detection("bottle", [50.0, 50.0, 150.0, 150.0])
        );
        let payload = ResultPayload::from_json(&body).unwrap();
        match payload {
            ResultPayload::Image(image) => {
                assert_eq!(image.model_used, "YoloV11s");
                assert_eq!(image.detections.len(), 1);
                assert_eq!(image.detections[0].center(), (100.0, 100.0));
            }
            ResultPayload::Video(_) => panic!("expected image payload"),
        }
    }

    #[test]
    fn video_payload_parses_and_sorts_frames() {
        let body = format!(
            r#"{{"model_used":"YoloV11n","video":"data:video/mp4;base64,AAAA",
                "total_frames":90,"fps":30.0,
                "detections_per_frame":[
                  {{"frame_index":5,"detections":[{}]}},
                  {{"frame_index":2,"detections":[]}}
                ]}}"#,
            detection("can", [0.0, 0.0, 10.0, 10.0])
        );
        let payload = ResultPayload::from_json(&body).unwrap();
        let ResultPayload::Video(video) = payload else {
            panic!("expected video payload");
        };
        assert_eq!(video.detections_per_frame[0].frame_index, 2);
        assert_eq!(video.detections_for_frame(5).len(), 1);
        assert!(video.detections_for_frame(3).is_empty());
    }

    #[test]
    fn payload_with_both_shapes_is_rejected() {
        let body = r#"{"model_used":"m","annotated_image":"data:,","video":"data:,"}"#;
        assert!(ResultPayload::from_json(body).is_err());
    }

    #[test]
    fn payload_with_neither_shape_is_rejected() {
        let body = r#"{"model_used":"m","detections":[]}"#;
        assert!(ResultPayload::from_json(body).is_err());
    }

    #[test]
    fn zero_total_frames_degrades_to_absent() {
        let body = r#"{"model_used":"m","video":"data:,","total_frames":0,"fps":30.0}"#;
        let ResultPayload::Video(video) = ResultPayload::from_json(body).unwrap() else {
            panic!("expected video payload");
        };
        assert_eq!(video.total_frames, None);
    }

    #[test]
    fn missing_detections_defaults_to_empty() {
        let body = r#"{"model_used":"m","annotated_image":"data:image/png;base64,AA"}"#;
        let ResultPayload::Image(image) = ResultPayload::from_json(body).unwrap() else {
            panic!("expected image payload");
        };
        assert!(image.detections.is_empty());
    }
}
