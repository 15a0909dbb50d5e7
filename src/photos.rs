//! Photo attachments for accident reports.
//!
//! Before submission a photo is a file on disk; once read it becomes a
//! `data:` URL string, which is the only form that gets persisted. Reads for
//! one submission are gathered together and either all succeed or the
//! whole submission is abandoned.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::future::try_join_all;

use crate::error::PhotoError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoRef {
    /// Attached but not yet read.
    File(PathBuf),
    /// Already encoded, ready to store.
    DataUrl(String),
}

impl PhotoRef {
    pub fn as_data_url(&self) -> Option<&str> {
        match self {
            PhotoRef::DataUrl(url) => Some(url),
            PhotoRef::File(_) => None,
        }
    }
}

/// Keep only the persistable references; unread files are dropped.
pub fn storable(photos: &[PhotoRef]) -> Vec<String> {
    let kept: Vec<String> = photos
        .iter()
        .filter_map(|p| p.as_data_url().map(str::to_string))
        .collect();
    if kept.len() < photos.len() {
        log::debug!(
            "Dropping {} unread photo attachment(s) at save time",
            photos.len() - kept.len()
        );
    }
    kept
}

/// Encode bytes as a `data:` URL with a media type guessed from `path`.
pub fn encode_data_url(path: &Path, bytes: &[u8]) -> String {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    format!("data:{};base64,{}", mime.essence_str(), STANDARD.encode(bytes))
}

/// Read one file into a `data:` URL.
pub async fn read_data_url(path: &Path) -> Result<String, PhotoError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| PhotoError::from_io(path.to_path_buf(), e))?;
    Ok(encode_data_url(path, &bytes))
}

/// Turn every reference into a `data:` URL, reading files concurrently.
///
/// Order is preserved. Any single failure fails the whole batch; nothing
/// partial is returned.
pub async fn resolve_all(photos: Vec<PhotoRef>) -> Result<Vec<String>, PhotoError> {
    let reads = photos.into_iter().map(|photo| async move {
        match photo {
            PhotoRef::DataUrl(url) => Ok(url),
            PhotoRef::File(path) => read_data_url(&path).await,
        }
    });
    try_join_all(reads).await
}
