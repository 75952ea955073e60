//! Mock image source for testing.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::downloader::{DownloadError, ImageBody, ImageSource};

/// Mock implementation of the ImageSource trait.
///
/// Provides controllable behavior for testing:
/// - Serve configurable image bodies, optionally split into chunks
/// - Refuse images with an HTTP status
/// - Break a body off after a number of chunks
/// - Track requested scan ids for assertions
///
/// Scans without a configured image answer with HTTP 404.
#[derive(Debug)]
pub struct MockImageSource {
    images: Arc<RwLock<HashMap<String, Vec<Bytes>>>>,
    statuses: Arc<RwLock<HashMap<String, u16>>>,
    interrupts: Arc<RwLock<HashMap<String, usize>>>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl Default for MockImageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockImageSource {
    /// Create a new mock source without images.
    pub fn new() -> Self {
        Self {
            images: Arc::new(RwLock::new(HashMap::new())),
            statuses: Arc::new(RwLock::new(HashMap::new())),
            interrupts: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Serve `data` as a single chunk.
    pub async fn set_image(&self, scan_id: &str, data: Vec<u8>) {
        self.set_image_chunks(scan_id, vec![data]).await;
    }

    /// Serve the body as the given chunks, in order.
    pub async fn set_image_chunks(&self, scan_id: &str, chunks: Vec<Vec<u8>>) {
        self.images.write().await.insert(
            scan_id.to_string(),
            chunks.into_iter().map(Bytes::from).collect(),
        );
    }

    /// Answer requests for `scan_id` with `status`.
    pub async fn set_status(&self, scan_id: &str, status: u16) {
        self.statuses
            .write()
            .await
            .insert(scan_id.to_string(), status);
    }

    /// Fail the body of `scan_id` after `chunks` chunks were handed out.
    pub async fn interrupt_after_chunks(&self, scan_id: &str, chunks: usize) {
        self.interrupts
            .write()
            .await
            .insert(scan_id.to_string(), chunks);
    }

    /// Get the scan ids that were opened, in order.
    pub async fn recorded_requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl ImageSource for MockImageSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn open(&self, scan_id: &str) -> Result<Box<dyn ImageBody>, DownloadError> {
        self.requests.write().await.push(scan_id.to_string());

        if let Some(status) = self.statuses.read().await.get(scan_id) {
            return Err(DownloadError::HttpStatus {
                scan_id: scan_id.to_string(),
                status: *status,
            });
        }

        let chunks = self
            .images
            .read()
            .await
            .get(scan_id)
            .cloned()
            .ok_or_else(|| DownloadError::HttpStatus {
                scan_id: scan_id.to_string(),
                status: 404,
            })?;
        let interrupt_after = self.interrupts.read().await.get(scan_id).copied();

        Ok(Box::new(MockBody {
            scan_id: scan_id.to_string(),
            chunks: chunks.into(),
            remaining_before_interrupt: interrupt_after,
        }))
    }
}

struct MockBody {
    scan_id: String,
    chunks: VecDeque<Bytes>,
    remaining_before_interrupt: Option<usize>,
}

#[async_trait]
impl ImageBody for MockBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, DownloadError> {
        if let Some(remaining) = self.remaining_before_interrupt.as_mut() {
            if *remaining == 0 {
                return Err(DownloadError::Interrupted {
                    scan_id: self.scan_id.clone(),
                    reason: "mock connection reset".to_string(),
                });
            }
            *remaining -= 1;
        }
        Ok(self.chunks.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_body_yields_chunks_in_order() {
        let source = MockImageSource::new();
        source
            .set_image_chunks("a", vec![b"1".to_vec(), b"2".to_vec()])
            .await;

        let mut body = source.open("a").await.unwrap();
        assert_eq!(body.next_chunk().await.unwrap(), Some(Bytes::from_static(b"1")));
        assert_eq!(body.next_chunk().await.unwrap(), Some(Bytes::from_static(b"2")));
        assert_eq!(body.next_chunk().await.unwrap(), None);
        assert_eq!(source.recorded_requests().await, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_image_is_404() {
        let source = MockImageSource::new();
        let err = source.open("missing").await.err().unwrap();
        assert!(matches!(err, DownloadError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_interrupt_after_chunks() {
        let source = MockImageSource::new();
        source
            .set_image_chunks("a", vec![b"1".to_vec(), b"2".to_vec()])
            .await;
        source.interrupt_after_chunks("a", 1).await;

        let mut body = source.open("a").await.unwrap();
        assert!(body.next_chunk().await.unwrap().is_some());
        assert!(matches!(
            body.next_chunk().await,
            Err(DownloadError::Interrupted { .. })
        ));
    }
}
