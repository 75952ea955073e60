//! Retrieval of finding-aid documents.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::FindingAidConfig;

use super::EadError;

/// Something that can produce the XML text of a finding aid.
#[async_trait]
pub trait FindingAidSource: Send + Sync {
    /// Returns the name of this source implementation.
    fn name(&self) -> &str;

    /// Fetch the raw EAD document at `url`.
    async fn fetch(&self, url: &str) -> Result<String, EadError>;
}

/// Fetches finding aids over HTTP.
pub struct HttpFindingAidSource {
    client: Client,
}

impl HttpFindingAidSource {
    pub fn new(config: &FindingAidConfig) -> Result<Self, EadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FindingAidSource for HttpFindingAidSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<String, EadError> {
        debug!(url = url, "Fetching finding aid");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EadError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Reads finding aids from the local filesystem; the "url" is a file path.
#[derive(Debug, Default)]
pub struct FileFindingAidSource;

#[async_trait]
impl FindingAidSource for FileFindingAidSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self, url: &str) -> Result<String, EadError> {
        let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| EadError::Io { path, source })
    }
}
