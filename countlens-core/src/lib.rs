//! Core logic for the countlens overlay: coordinate conversion, region
//! and drag state, containment counting, playback/frame sync, overlay
//! rasterization, and media materialization. No windowing or webview
//! code lives here; the app shell drives a [`ViewerSession`] with
//! discrete events and ships the rendered frames out.

pub mod config;
pub mod counting;
pub mod drag;
pub mod geometry;
pub mod media;
pub mod payload;
pub mod playback;
pub mod region;
pub mod render;
pub mod viewer;

pub use config::OverlayConfig;
pub use counting::count_in_region;
pub use drag::{DragController, PointerPoint};
pub use geometry::{to_native_rect, to_pixel_region, DisplaySize, NativeRect, NormalizedRegion, PixelRect};
pub use media::MediaHandle;
pub use payload::{Detection, FrameRecord, ImageResult, ResultPayload, VideoResult};
pub use playback::PlaybackSync;
pub use region::RegionState;
pub use render::{OverlayRenderer, OverlayStyle};
pub use viewer::{MediaKind, OverlayFrame, ViewerSession};
