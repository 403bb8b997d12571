//! Playable-media handle for the video path.
//!
//! The service delivers the annotated video as a base64 data URI. Handing
//! multi-megabyte data URIs straight to a `<video>` element is slow and
//! keeps the whole payload pinned in the webview, so the bytes are decoded
//! once into a scoped temp file that is deleted when the handle drops
//! (payload replacement or teardown). If decoding fails the original data
//! URI is served as-is — a diagnostic is logged, the view keeps working.

use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use log::warn;
use tempfile::NamedTempFile;

#[derive(Debug)]
pub enum MediaHandle {
    /// Decoded media on disk; the file is removed on drop.
    TempFile(NamedTempFile),
    /// Fallback: the raw data URI, presented directly.
    DataUri(String),
}

impl MediaHandle {
    /// Decode a `data:video/mp4;base64,...` URI into a temp file. Any
    /// failure degrades to the data-URI fallback instead of erroring.
    pub fn materialize_video(data_uri: &str) -> Self {
        match write_decoded_temp(data_uri) {
            Ok(file) => MediaHandle::TempFile(file),
            Err(err) => {
                warn!("video payload could not be materialized ({err:#}); serving data URI");
                MediaHandle::DataUri(data_uri.to_string())
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            MediaHandle::TempFile(file) => Some(file.path()),
            MediaHandle::DataUri(_) => None,
        }
    }

    /// Source string for the frontend media element: a filesystem path
    /// for decoded media, the original URI otherwise.
    pub fn as_src(&self) -> String {
        match self {
            MediaHandle::TempFile(file) => file.path().to_string_lossy().into_owned(),
            MediaHandle::DataUri(uri) => uri.clone(),
        }
    }
}

fn write_decoded_temp(data_uri: &str) -> Result<NamedTempFile> {
    let encoded = data_uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or_else(|| anyhow!("not a base64 data URI"))?;

    let bytes = BASE64_STANDARD
        .decode(encoded.trim())
        .context("failed to decode base64 video payload")?;
    if bytes.is_empty() {
        return Err(anyhow!("decoded video payload is empty"));
    }

    let mut file = tempfile::Builder::new()
        .prefix("countlens-")
        .suffix(".mp4")
        .tempfile()
        .context("failed to create media temp file")?;
    file.write_all(&bytes)
        .context("failed to write media temp file")?;
    file.flush()?;
    Ok(file)
}
