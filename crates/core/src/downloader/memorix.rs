//! HTTP image source for the archive's full-size scan downloads.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use tracing::debug;

use crate::config::ImagesConfig;

use super::error::DownloadError;
use super::traits::{ImageBody, ImageSource};

/// Fetches `<base_url>/<scan id>.jpg`.
pub struct MemorixImageSource {
    client: Client,
    base_url: String,
}

impl MemorixImageSource {
    pub fn new(config: &ImagesConfig) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn image_url(&self, scan_id: &str) -> String {
        format!("{}/{}.jpg", self.base_url, urlencoding::encode(scan_id))
    }
}

#[async_trait]
impl ImageSource for MemorixImageSource {
    fn name(&self) -> &str {
        "memorix"
    }

    async fn open(&self, scan_id: &str) -> Result<Box<dyn ImageBody>, DownloadError> {
        let url = self.image_url(scan_id);
        debug!(scan_id = scan_id, "Requesting scan image");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus {
                scan_id: scan_id.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(Box::new(ResponseBody {
            scan_id: scan_id.to_string(),
            response,
        }))
    }
}

struct ResponseBody {
    scan_id: String,
    response: Response,
}

#[async_trait]
impl ImageBody for ResponseBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, DownloadError> {
        self.response
            .chunk()
            .await
            .map_err(|e| DownloadError::Interrupted {
                scan_id: self.scan_id.clone(),
                reason: e.to_string(),
            })
    }
}
