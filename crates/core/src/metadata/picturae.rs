//! HTTP client for the archive's scan metadata service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::MetadataConfig;

use super::envelope::decode_scan_page;
use super::types::{PageRequest, ScanPage};
use super::{MetadataError, ScanSource};

/// Scan metadata client.
///
/// Issues `GET <base_url>/<collection>/<path>` with the credential, language,
/// callback and paging parameters, and decodes the callback-wrapped body.
pub struct PicturaeClient {
    client: Client,
    config: MetadataConfig,
}

impl PicturaeClient {
    /// Create a new client.
    pub fn new(config: MetadataConfig) -> Result<Self, MetadataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// URL of the metadata resource for one inventory.
    fn build_url(&self, collection_id: &str, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(collection_id),
            urlencoding::encode(path)
        )
    }
}

#[async_trait]
impl ScanSource for PicturaeClient {
    fn name(&self) -> &str {
        "picturae"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<ScanPage, MetadataError> {
        let url = self.build_url(&request.collection_id, &request.path);
        let start = request.start.to_string();
        let limit = request.limit.to_string();

        debug!(
            collection = %request.collection_id,
            path = %request.path,
            start = request.start,
            limit = request.limit,
            "Fetching scan metadata page"
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.config.api_key.as_str()),
                ("lang", self.config.lang.as_str()),
                ("findingAid", request.collection_id.as_str()),
                ("path", request.path.as_str()),
                ("callback", self.config.callback.as_str()),
                ("start", start.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        decode_scan_page(&body, &self.config.callback)
    }
}
