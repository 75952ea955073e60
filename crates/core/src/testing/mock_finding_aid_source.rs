//! Mock finding-aid source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ead::{EadError, FindingAidSource};

/// Mock implementation of the FindingAidSource trait.
///
/// Serves documents registered per URL; unknown URLs answer with an API 404.
#[derive(Debug)]
pub struct MockFindingAidSource {
    documents: Arc<RwLock<HashMap<String, String>>>,
    failing: Arc<RwLock<HashMap<String, u16>>>,
    fetches: Arc<RwLock<Vec<String>>>,
}

impl Default for MockFindingAidSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFindingAidSource {
    /// Create a new mock source without documents.
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            failing: Arc::new(RwLock::new(HashMap::new())),
            fetches: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Serve `xml` for `url`.
    pub async fn set_document(&self, url: &str, xml: &str) {
        self.documents
            .write()
            .await
            .insert(url.to_string(), xml.to_string());
    }

    /// Answer `url` with an error status.
    pub async fn fail_url(&self, url: &str, status: u16) {
        self.failing.write().await.insert(url.to_string(), status);
    }

    /// Get the fetched URLs, in order.
    pub async fn recorded_fetches(&self) -> Vec<String> {
        self.fetches.read().await.clone()
    }
}

#[async_trait]
impl FindingAidSource for MockFindingAidSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &str) -> Result<String, EadError> {
        self.fetches.write().await.push(url.to_string());

        if let Some(status) = self.failing.read().await.get(url) {
            return Err(EadError::Api {
                status: *status,
                message: "mock failure".to_string(),
            });
        }

        self.documents
            .read()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| EadError::Api {
                status: 404,
                message: format!("no document at {}", url),
            })
    }
}
