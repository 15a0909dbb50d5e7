//! Error types for local storage, photo intake and geolocation.
//!
//! None of these are fatal to the application. Store loaders swallow
//! `StorageError` and fall back to defaults; the command layer turns the
//! rest into user-facing strings.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create data directory: {0}")]
    CreateDir(std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while turning an attached photo into a persistable data URL.
#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("Photo not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read photo {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PhotoError {
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            PhotoError::NotFound(path)
        } else {
            PhotoError::Read { path, source }
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("위치 서비스를 지원하지 않습니다.")]
    Unsupported,

    #[error("위치 권한이 거부되었습니다.")]
    PermissionDenied,

    #[error("위치를 가져올 수 없습니다. ({0}초 초과)")]
    Timeout(u64),

    #[error("위치를 가져올 수 없습니다: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_error_not_found_is_classified() {
        let err = PhotoError::from_io(
            PathBuf::from("/nope.jpg"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, PhotoError::NotFound(_)));
    }

    #[test]
    fn test_photo_error_other_io_is_read() {
        let err = PhotoError::from_io(
            PathBuf::from("/locked.jpg"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked"),
        );
        assert!(matches!(err, PhotoError::Read { .. }));
        assert!(err.to_string().contains("/locked.jpg"));
    }

    #[test]
    fn test_location_timeout_message_mentions_seconds() {
        assert!(LocationError::Timeout(10).to_string().contains("10"));
    }
}
