//! Trait definitions for the downloader module.

use async_trait::async_trait;
use bytes::Bytes;

use super::error::DownloadError;

/// Streaming body of one image response.
#[async_trait]
pub trait ImageBody: Send {
    /// Next chunk of the body, or `None` once it is exhausted.
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, DownloadError>;
}

/// A service that serves scan images by identifier.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Returns the name of this source implementation.
    fn name(&self) -> &str;

    /// Start fetching the image of `scan_id`.
    ///
    /// Fails with [`DownloadError::HttpStatus`] when the service refuses the
    /// request; the body is only handed out for successful responses.
    async fn open(&self, scan_id: &str) -> Result<Box<dyn ImageBody>, DownloadError>;
}
