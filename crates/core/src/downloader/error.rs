//! Error types for the downloader module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while downloading a scan image.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The image service answered with a non-success status.
    #[error("Image {scan_id} not available: HTTP {status}")]
    HttpStatus { scan_id: String, status: u16 },

    /// Scan name cannot be used as a file name.
    #[error("Invalid scan name: {0:?}")]
    InvalidName(String),

    /// Failed to write the image file.
    #[error("Failed to write {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Body stream broke off while writing.
    #[error("Download of {scan_id} interrupted: {reason}")]
    Interrupted { scan_id: String, reason: String },
}

impl DownloadError {
    /// Creates a write failed error.
    pub fn write_failed(path: PathBuf, source: std::io::Error) -> Self {
        Self::WriteFailed { path, source }
    }

    /// Whether the upstream service refused the image.
    pub fn is_http_status(&self) -> bool {
        matches!(self, Self::HttpStatus { .. })
    }

    /// Whether the image service was contacted before the failure.
    ///
    /// Only a rejected scan name fails before any request is sent.
    pub fn reached_service(&self) -> bool {
        !matches!(self, Self::InvalidName(_))
    }
}
